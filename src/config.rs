//! Tunable constants of the battle engine.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

const EMBEDDED_CONFIG: &str = include_str!("../data/battle_config.ron");

/// Every number the engine balances around. `Default` carries the shipped
/// values; a RON document may override any subset of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    // SP economy
    pub base_max_sp: u32,
    pub extended_max_sp: u32,
    pub sp_gain_on_attack: u32,
    pub sp_gain_on_defend: u32,

    // Flee
    pub boss_flee_chance: f64,
    pub base_flee_chance: f64,
    pub flee_chance_per_level: f64,
    pub min_flee_chance: f64,
    pub max_flee_chance: f64,

    // Capture
    pub capture_hp_scale: f64,
    pub capture_chance_per_level: f64,
    pub capture_base_chance: f64,

    // Experience
    pub exp_per_defeated_level: f64,
    pub exp_bonus_per_level: f64,
    pub exp_bonus_cap: f64,
    pub exp_penalty_per_level: f64,
    pub exp_multiplier_floor: f64,
    pub boss_exp_multiplier: f64,

    // Encounters and loot
    pub wild_drop_chance: f64,
    pub default_wild_level: u32,
    pub boss_companion_level: u32,
    pub mini_bosses_per_stage_unlock: u32,

    /// Fainted roster members come back with 1 HP once a battle ends.
    pub revive_fainted_after_battle: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            base_max_sp: 100,
            extended_max_sp: 120,
            sp_gain_on_attack: 15,
            sp_gain_on_defend: 10,
            boss_flee_chance: 0.1,
            base_flee_chance: 0.5,
            flee_chance_per_level: 0.05,
            min_flee_chance: 0.3,
            max_flee_chance: 0.9,
            capture_hp_scale: 0.5,
            capture_chance_per_level: 0.1,
            capture_base_chance: 0.1,
            exp_per_defeated_level: 7.0,
            exp_bonus_per_level: 0.1,
            exp_bonus_cap: 0.5,
            exp_penalty_per_level: 0.05,
            exp_multiplier_floor: 0.3,
            boss_exp_multiplier: 2.5,
            wild_drop_chance: 0.8,
            default_wild_level: 5,
            boss_companion_level: 10,
            mini_bosses_per_stage_unlock: 3,
            revive_fainted_after_battle: true,
        }
    }
}

impl BattleConfig {
    /// The config shipped in `data/battle_config.ron`.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_ron_str(EMBEDDED_CONFIG)
    }

    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: BattleConfig =
            ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.extended_max_sp < self.base_max_sp {
            return Err(ConfigError::OutOfRange {
                field: "extended_max_sp",
                reason: format!("{} is below base_max_sp {}", self.extended_max_sp, self.base_max_sp),
            });
        }
        if self.min_flee_chance > self.max_flee_chance {
            return Err(ConfigError::OutOfRange {
                field: "min_flee_chance",
                reason: "exceeds max_flee_chance".to_string(),
            });
        }
        let probabilities = [
            ("boss_flee_chance", self.boss_flee_chance),
            ("wild_drop_chance", self.wild_drop_chance),
            ("min_flee_chance", self.min_flee_chance),
            ("max_flee_chance", self.max_flee_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    reason: format!("{} is not a probability", value),
                });
            }
        }
        if self.mini_bosses_per_stage_unlock == 0 {
            return Err(ConfigError::OutOfRange {
                field: "mini_bosses_per_stage_unlock",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
