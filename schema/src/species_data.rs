use crate::AttributeTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter};

/// Experience curve shape. `total_experience` is the cumulative experience
/// needed to reach a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum GrowthCurve {
    Fast,
    MediumFast,
    MediumSlow,
    Slow,
}

impl GrowthCurve {
    pub fn total_experience(self, level: u32) -> i64 {
        let n = level as i64;
        match self {
            GrowthCurve::Fast => (4 * n * n * n) / 5,
            GrowthCurve::MediumFast => n * n * n,
            // floor(6n^3/5 - 15n^2 + 100n - 140), kept in integers
            GrowthCurve::MediumSlow => {
                (6 * n * n * n - 75 * n * n + 500 * n - 700).div_euclid(5)
            }
            GrowthCurve::Slow => (5 * n * n * n) / 4,
        }
    }

    /// Experience needed to advance from `level` to `level + 1`.
    pub fn cost_to_next(self, level: u32) -> i64 {
        self.total_experience(level + 1) - self.total_experience(level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionMethod {
    Level(u32),
    Item(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionData {
    pub evolves_into: String,
    pub method: EvolutionMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub name: String,
    pub growth_curve: GrowthCurve,
    pub base_stats: BaseStats,
    /// Starting move list, at most four entries.
    pub skills: Vec<String>,
    #[serde(default)]
    pub advantage_tags: BTreeSet<AttributeTag>,
    #[serde(default)]
    pub disadvantage_tags: BTreeSet<AttributeTag>,
    #[serde(default)]
    pub evolution: Option<EvolutionData>,
    /// Whether the species shows up in random wild encounters.
    #[serde(default = "default_true")]
    pub wild: bool,
    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}
