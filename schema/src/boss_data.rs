use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossTier {
    MiniBoss,
    StageBoss,
}

/// Fixed bundle granted for defeating a boss.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossReward {
    #[serde(default)]
    pub companion: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub currency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEntry {
    pub species: String,
    pub level: u32,
    pub tier: BossTier,
    /// Stage this boss guards; ignored for mini-bosses.
    #[serde(default)]
    pub stage: u32,
    #[serde(default)]
    pub reward: BossReward,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossTable {
    pub bosses: Vec<BossEntry>,
}
