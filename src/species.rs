//! Species registry and combatant construction.

use crate::combatant::{Combatant, MAX_MOVE_SLOTS};
use crate::errors::{CatalogError, CatalogResult};
use crate::skill_data::SkillCatalog;
use schema::SpeciesData;
use std::collections::HashMap;
use std::fmt;

const EMBEDDED_SPECIES: &str = include_str!("../data/species.ron");

#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: HashMap<String, SpeciesData>,
    order: Vec<String>,
}

impl SpeciesCatalog {
    pub fn embedded() -> CatalogResult<Self> {
        Self::from_ron_str(EMBEDDED_SPECIES)
    }

    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let entries: Vec<SpeciesData> = ron::from_str(source).map_err(|e| CatalogError::Malformed {
            kind: "species",
            details: e.to_string(),
        })?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<SpeciesData>) -> CatalogResult<Self> {
        let mut catalog = Self::default();
        for data in entries {
            if data.skills.len() > MAX_MOVE_SLOTS {
                return Err(CatalogError::TooManySkills {
                    species: data.name,
                    count: data.skills.len(),
                });
            }
            if catalog.species.contains_key(&data.name) {
                return Err(CatalogError::Duplicate {
                    kind: "species",
                    name: data.name,
                });
            }
            catalog.order.push(data.name.clone());
            catalog.species.insert(data.name.clone(), data);
        }
        tracing::debug!(count = catalog.order.len(), "species catalog loaded");
        Ok(catalog)
    }

    /// Checks every skill and evolution target referenced by a species.
    pub fn validate_against(&self, skills: &SkillCatalog) -> CatalogResult<()> {
        for data in self.iter() {
            for skill in &data.skills {
                skills.lookup(skill)?;
            }
            if let Some(evolution) = &data.evolution {
                self.lookup(&evolution.evolves_into)?;
            }
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> CatalogResult<&SpeciesData> {
        self.species
            .get(name)
            .ok_or_else(|| CatalogError::UnknownSpecies(name.to_string()))
    }

    pub fn create_combatant(&self, name: &str, level: u32) -> CatalogResult<Combatant> {
        self.lookup(name).map(|data| Combatant::new(data, level))
    }

    /// Species that may show up in wild encounters, in load order.
    pub fn wild_species(&self) -> Vec<&SpeciesData> {
        self.iter().filter(|data| data.wild).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesData> {
        self.order.iter().filter_map(|name| self.species.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Wraps species data for a multi-line summary.
pub struct SpeciesSummary<'a>(pub &'a SpeciesData);

impl fmt::Display for SpeciesSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0;
        writeln!(f, "{} ({} growth)", data.name, data.growth_curve)?;
        writeln!(f, "--------------------")?;
        if !data.description.is_empty() {
            writeln!(f, "{}", data.description)?;
            writeln!(f, "--------------------")?;
        }

        const LABEL_WIDTH: usize = 12;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", data.base_stats.hp)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", data.base_stats.attack)?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", data.base_stats.defense)?;

        let join = |tags: &std::collections::BTreeSet<schema::AttributeTag>| {
            tags.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
        };
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Resists", join(&data.advantage_tags))?;
        writeln!(f, "{:<LABEL_WIDTH$} : {}", "Weak to", join(&data.disadvantage_tags))?;
        write!(f, "{:<LABEL_WIDTH$} : {}", "Skills", data.skills.join(", "))
    }
}
