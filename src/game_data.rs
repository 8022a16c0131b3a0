//! The bundle of read-only catalogs a battle needs.

use crate::errors::{CatalogError, CatalogResult};
use crate::items::ItemCatalog;
use crate::skill_data::SkillCatalog;
use crate::species::SpeciesCatalog;
use schema::{BossEntry, BossTable, BossTier};
use std::sync::Arc;

const EMBEDDED_BOSSES: &str = include_str!("../data/bosses.ron");

/// Cheap to clone; every catalog sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GameData {
    pub skills: Arc<SkillCatalog>,
    pub species: Arc<SpeciesCatalog>,
    pub items: Arc<ItemCatalog>,
    pub bosses: Arc<BossTable>,
}

impl GameData {
    /// Loads and cross-checks the data files shipped with the crate.
    pub fn embedded() -> CatalogResult<Self> {
        Self::new(
            SkillCatalog::embedded()?,
            SpeciesCatalog::embedded()?,
            ItemCatalog::embedded()?,
            parse_boss_table(EMBEDDED_BOSSES)?,
        )
    }

    pub fn new(
        skills: SkillCatalog,
        species: SpeciesCatalog,
        items: ItemCatalog,
        bosses: BossTable,
    ) -> CatalogResult<Self> {
        species.validate_against(&skills)?;
        for boss in &bosses.bosses {
            species.lookup(&boss.species)?;
            if let Some(companion) = &boss.reward.companion {
                species.lookup(companion)?;
            }
            for item in &boss.reward.items {
                items.get(item)?;
            }
        }
        Ok(Self {
            skills: Arc::new(skills),
            species: Arc::new(species),
            items: Arc::new(items),
            bosses: Arc::new(bosses),
        })
    }

    pub fn bosses_of_tier(&self, tier: BossTier) -> Vec<&BossEntry> {
        self.bosses.bosses.iter().filter(|b| b.tier == tier).collect()
    }

    /// The stage boss for `stage`, or the first stage boss when the table has
    /// none for it.
    pub fn stage_boss(&self, stage: u32) -> Option<&BossEntry> {
        let stage_bosses = self.bosses_of_tier(BossTier::StageBoss);
        stage_bosses
            .iter()
            .find(|b| b.stage == stage)
            .or_else(|| stage_bosses.first())
            .copied()
    }
}

pub fn parse_boss_table(source: &str) -> CatalogResult<BossTable> {
    ron::from_str(source).map_err(|e| CatalogError::Malformed {
        kind: "boss",
        details: e.to_string(),
    })
}
