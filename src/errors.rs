use schema::SkillCategory;
use thiserror::Error;

/// Errors raised while building or querying the static catalogs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("unknown skill: {0}")]
    UnknownSkill(String),
    #[error("unknown species: {0}")]
    UnknownSpecies(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("malformed {kind} data: {details}")]
    Malformed { kind: &'static str, details: String },
    #[error("duplicate {kind} entry: {name}")]
    Duplicate { kind: &'static str, name: String },
    #[error("skill {skill} is declared as {category} but carries an effect of another category")]
    CategoryMismatch {
        skill: String,
        category: SkillCategory,
    },
    #[error("species {species} starts with {count} skills (max 4)")]
    TooManySkills { species: String, count: usize },
}

/// Errors raised by skill learning and evolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgressionError {
    #[error("{combatant} already knows {skill}")]
    SkillAlreadyKnown { combatant: String, skill: String },
    #[error("{combatant}'s move list is full; a skill must be forgotten first")]
    MoveListFull { combatant: String },
    #[error("move slot {0} does not exist")]
    InvalidMoveSlot(usize),
    #[error("{0} cannot evolve")]
    NoEvolution(String),
    #[error("{combatant} cannot evolve with {item}")]
    WrongEvolutionItem { combatant: String, item: String },
    #[error("roster member {0} does not exist")]
    InvalidMember(usize),
    #[error("inventory slot {0} does not exist")]
    InvalidInventorySlot(usize),
    #[error("no skill is waiting to be learned")]
    NothingPending,
    #[error("{item} has no effect on {combatant}")]
    NoEffect { item: String, combatant: String },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Faults inside turn resolution. These abort the battle; player mistakes
/// are reported as `ActionRejection` values instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("no battle is in progress")]
    NoSession,
    #[error("a battle is already in progress")]
    SessionActive,
    #[error("the roster has no combatant able to fight")]
    NoUsableCombatant,
    #[error("active roster index {0} is out of range")]
    MissingActiveCombatant(usize),
    #[error("no enemy could be generated for {0}")]
    NoEnemyAvailable(String),
    #[error("inconsistent battle state: {0}")]
    InconsistentState(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid battle config: {0}")]
    Parse(String),
    #[error("invalid battle config value for {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("binary snapshot error: {0}")]
    Binary(String),
    #[error("json snapshot error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub type BattleResult<T> = Result<T, BattleError>;

pub type ProgressionResult<T> = Result<T, ProgressionError>;
