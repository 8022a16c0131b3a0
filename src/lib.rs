//! Crewmon Battle Engine
//!
//! Turn-based battles for a creature-collecting RPG: a skill catalog, levelled
//! combatants, the turn resolver with capture and flee, and the reward and
//! evolution flow that runs once a battle is won. Catalogs are plain values
//! built from RON and handed to the controller; nothing is global.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod game_data;
pub mod items;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod skill_data;
pub mod species;
pub mod status_effects;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    AttributeTag, BaseStats, BossEntry, BossReward, BossTable, BossTier, EvolutionData,
    EvolutionMethod, GrowthCurve, ItemData, ItemEffect, ItemRarity, SkillCategory,
    SkillDefinition, SkillEffect, SpeciesData,
};

// --- From this crate's modules (`src/`) ---

// Battle flow.
pub use battle::ai::{Behavior, GreedyAutopilot};
pub use battle::controller::{
    BattleController, BattleInfo, BattleOutcome, EncounterRequest, TurnReport, TurnStatus,
};
pub use battle::engine::{resolve_turn, validate_player_action, TurnResolution};
pub use battle::state::{
    ActionRejection, BattleCategory, BattleEnd, BattleEvent, BattleSession, EventBus,
    RejectionKind, Side, TurnPhase, TurnRng,
};

// Entities and catalogs.
pub use combatant::{Combatant, DerivedStats};
pub use config::BattleConfig;
pub use errors::{BattleError, CatalogError, ConfigError, PersistenceError, ProgressionError};
pub use game_data::GameData;
pub use items::{Inventory, ItemCatalog};
pub use persistence::RosterSnapshot;
pub use player::{BallType, BattlePlayerRoster, PlayerAction};
pub use skill_data::SkillCatalog;
pub use species::SpeciesCatalog;
