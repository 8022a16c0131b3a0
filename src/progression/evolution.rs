use crate::combatant::Combatant;
use crate::errors::{ProgressionError, ProgressionResult};
use crate::species::SpeciesCatalog;
use schema::{EvolutionMethod, SpeciesData};

impl Combatant {
    /// True when this combatant's evolution is unlocked by `item`.
    pub fn can_evolve_with_item(&self, item: &str) -> bool {
        matches!(
            self.evolution.as_ref().map(|e| &e.method),
            Some(EvolutionMethod::Item(required)) if required == item
        )
    }

    /// Item-gated evolution. Returns the announcement line.
    pub fn evolve_with_item(
        &mut self,
        item: &str,
        species: &SpeciesCatalog,
    ) -> ProgressionResult<String> {
        if !self.can_evolve_with_item(item) {
            return Err(match self.evolution {
                None => ProgressionError::NoEvolution(self.species_name.clone()),
                Some(_) => ProgressionError::WrongEvolutionItem {
                    combatant: self.species_name.clone(),
                    item: item.to_string(),
                },
            });
        }
        let target = self.evolution_target(species)?;
        Ok(self.evolve_into(target))
    }

    /// Carries out a level evolution flagged by `check_evolution_eligibility`.
    pub fn evolve_pending(&mut self, species: &SpeciesCatalog) -> ProgressionResult<Option<String>> {
        if !self.evolution_pending {
            return Ok(None);
        }
        let target = self.evolution_target(species)?;
        Ok(Some(self.evolve_into(target)))
    }

    fn evolution_target<'a>(&self, species: &'a SpeciesCatalog) -> ProgressionResult<&'a SpeciesData> {
        let evolution = self
            .evolution
            .as_ref()
            .ok_or_else(|| ProgressionError::NoEvolution(self.species_name.clone()))?;
        Ok(species.lookup(&evolution.evolves_into)?)
    }

    /// Becomes `target`: new species, stats, moves, tags and evolution data.
    /// Level, experience and HP ratio carry over.
    pub fn evolve_into(&mut self, target: &SpeciesData) -> String {
        let from = std::mem::replace(&mut self.species_name, target.name.clone());
        self.growth_curve = target.growth_curve;
        self.base_stats = target.base_stats;
        self.recompute_stats();
        self.set_moves(&target.skills);
        self.advantage_tags = target.advantage_tags.clone();
        self.disadvantage_tags = target.disadvantage_tags.clone();
        self.evolution = target.evolution.clone();
        self.evolution_pending = false;
        tracing::info!(from = %from, into = %target.name, "evolved");

        // A form reached above its own evolution level is flagged right away.
        let _ = self.check_evolution_eligibility();
        format!("{} evolved into {}!", from, target.name)
    }
}

/// Runs every pending level evolution on the roster, once each.
pub fn perform_pending_evolutions(
    team: &mut [Combatant],
    species: &SpeciesCatalog,
) -> ProgressionResult<Vec<(String, String)>> {
    let mut evolved = Vec::new();
    for member in team.iter_mut() {
        let from = member.species_name.clone();
        if member.evolve_pending(species)?.is_some() {
            evolved.push((from, member.species_name.clone()));
        }
    }
    Ok(evolved)
}
