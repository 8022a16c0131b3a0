//! The read-only skill registry.
//!
//! Built once from RON and then shared (usually behind an `Arc`) by the
//! controller and every combatant lookup. There is no global instance; tests
//! build their own catalogs from inline RON.

use crate::errors::{CatalogError, CatalogResult};
use schema::SkillDefinition;
use std::collections::HashMap;

const EMBEDDED_SKILLS: &str = include_str!("../data/skills.ron");

#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    skills: HashMap<String, SkillDefinition>,
    /// Names in load order, so iteration is deterministic.
    order: Vec<String>,
}

impl SkillCatalog {
    pub fn embedded() -> CatalogResult<Self> {
        Self::from_ron_str(EMBEDDED_SKILLS)
    }

    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let definitions: Vec<SkillDefinition> =
            ron::from_str(source).map_err(|e| CatalogError::Malformed {
                kind: "skill",
                details: e.to_string(),
            })?;
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<SkillDefinition>) -> CatalogResult<Self> {
        let mut catalog = Self::default();
        for definition in definitions {
            if !definition.effect.fits_category(definition.category) {
                return Err(CatalogError::CategoryMismatch {
                    skill: definition.name,
                    category: definition.category,
                });
            }
            if catalog.skills.contains_key(&definition.name) {
                return Err(CatalogError::Duplicate {
                    kind: "skill",
                    name: definition.name,
                });
            }
            catalog.order.push(definition.name.clone());
            catalog.skills.insert(definition.name.clone(), definition);
        }
        tracing::debug!(count = catalog.order.len(), "skill catalog loaded");
        Ok(catalog)
    }

    pub fn lookup(&self, name: &str) -> CatalogResult<&SkillDefinition> {
        self.skills
            .get(name)
            .ok_or_else(|| CatalogError::UnknownSkill(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn sp_cost(&self, name: &str) -> CatalogResult<u32> {
        self.lookup(name).map(|skill| skill.sp_cost)
    }

    pub fn is_ultimate(&self, name: &str) -> CatalogResult<bool> {
        self.lookup(name).map(SkillDefinition::is_ultimate)
    }

    /// Every ultimate skill, in load order. Feeds the skill blind box.
    pub fn ultimates(&self) -> Vec<&SkillDefinition> {
        self.iter().filter(|skill| skill.is_ultimate()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.order.iter().filter_map(|name| self.skills.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
