use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl ItemRarity {
    /// Relative weight in the wild drop table.
    pub fn drop_weight(self) -> u32 {
        match self {
            ItemRarity::Common => 60,
            ItemRarity::Uncommon => 25,
            ItemRarity::Rare => 12,
            ItemRarity::Epic => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    HealHp { amount: u32 },
    HealPercentage { percentage: f64 },
    RestoreSp { amount: u32 },
    /// One-time raise of the holder's SP ceiling.
    ExtendMaxSp,
    CaptureBalls { count: u32 },
    MasterBalls { count: u32 },
    Revive { hp_percentage: f64 },
    /// Triggers item-gated evolution; matched by item name.
    EvolutionItem,
    /// Opens into a skill book for a random ultimate skill.
    SkillBlindBox,
    SkillBook { skill: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub effect: ItemEffect,
    #[serde(default)]
    pub price: u32,
    pub rarity: ItemRarity,
    /// Eligible for the wild-battle drop table.
    #[serde(default)]
    pub droppable: bool,
    #[serde(default)]
    pub description: String,
}
