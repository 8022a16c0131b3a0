use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Thematic tag carried by skills and matched against a combatant's
/// advantage/disadvantage sets for type effectiveness.
///
/// Ordered so tag sets iterate deterministically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum AttributeTag {
    Networking,
    Empathy,
    Content,
    Stamina,
    #[strum(serialize = "Problem Solving")]
    ProblemSolving,
    Courage,
    Integrity,
    Resilience,
    Patience,
}
