pub mod evolution;
pub mod moves;
pub mod rewards;

pub use evolution::perform_pending_evolutions;
pub use moves::{ItemUseOutcome, SkillBookOutcome};
pub use rewards::{RewardCalculator, VictoryRewards};

/// Levels stop here; experience past it is discarded.
pub const MAX_LEVEL: u32 = 100;
