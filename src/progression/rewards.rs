use crate::battle::state::{BattleCategory, BattleEvent, EventBus, TurnRng};
use crate::config::BattleConfig;
use crate::errors::ProgressionResult;
use crate::game_data::GameData;
use crate::player::BattlePlayerRoster;
use schema::{BossEntry, BossTier};

/// Shown when a wild battle drops nothing.
const CONSOLATION_MESSAGES: [&str; 3] = [
    "The enemy left nothing behind. Better luck next time!",
    "You searched the area but found nothing useful.",
    "No loot this time, but the experience was worth it.",
];

/// Everything a victory handed out, for the battle outcome summary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VictoryRewards {
    /// Experience granted to each living member.
    pub exp_gained: u64,
    pub leveled_up: Vec<String>,
    pub evolution_messages: Vec<String>,
    pub loot_items: Vec<String>,
    pub currency_gained: u32,
    pub companion: Option<String>,
    pub stage_advanced: bool,
    pub stage_boss_unlocked: bool,
}

/// Calculator for experience, loot and boss bundles.
pub struct RewardCalculator<'a> {
    config: &'a BattleConfig,
}

impl<'a> RewardCalculator<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// Scales experience by the level gap between the defeated enemy and
    /// the victor. Higher enemies pay up to +50%, lower ones down to 30%.
    pub fn experience_multiplier(&self, defeated_level: u32, victor_level: u32) -> f64 {
        let diff = defeated_level as f64 - victor_level as f64;
        if diff > 0.0 {
            1.0 + (self.config.exp_bonus_per_level * diff).min(self.config.exp_bonus_cap)
        } else {
            (1.0 + self.config.exp_penalty_per_level * diff).max(self.config.exp_multiplier_floor)
        }
    }

    /// Formula: floor(defeatedLevel * 7 * multiplier), times 2.5 for bosses.
    pub fn experience_for_victory(
        &self,
        defeated_level: u32,
        victor_level: u32,
        category: BattleCategory,
    ) -> u64 {
        let multiplier = self.experience_multiplier(defeated_level, victor_level);
        let base =
            (defeated_level as f64 * self.config.exp_per_defeated_level * multiplier).floor();
        if category.is_boss() {
            (base * self.config.boss_exp_multiplier).floor() as u64
        } else {
            base as u64
        }
    }

    /// Applies every reward for beating `defeated_level` in `category`.
    /// `victor_level` is the level of whoever was active at the end.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_victory(
        &self,
        category: BattleCategory,
        defeated_level: u32,
        victor_level: u32,
        boss: Option<&BossEntry>,
        roster: &mut BattlePlayerRoster,
        data: &GameData,
        rng: &mut TurnRng,
        bus: &mut EventBus,
    ) -> ProgressionResult<VictoryRewards> {
        let mut rewards = VictoryRewards {
            exp_gained: self.experience_for_victory(defeated_level, victor_level, category),
            ..Default::default()
        };
        self.distribute_experience(rewards.exp_gained, roster, &mut rewards, bus);

        if category.is_boss() {
            self.grant_boss_bundle(category, boss, roster, data, &mut rewards, bus)?;
        } else {
            self.roll_wild_loot(roster, data, rng, &mut rewards, bus);
        }

        tracing::info!(
            exp = rewards.exp_gained,
            loot = rewards.loot_items.len(),
            currency = rewards.currency_gained,
            "victory rewards applied"
        );
        Ok(rewards)
    }

    fn distribute_experience(
        &self,
        amount: u64,
        roster: &mut BattlePlayerRoster,
        rewards: &mut VictoryRewards,
        bus: &mut EventBus,
    ) {
        for member in roster.team_mut().iter_mut().filter(|m| !m.is_fainted()) {
            bus.push(BattleEvent::ExperienceGained {
                target: member.species_name.clone(),
                amount,
            });
            let gain = member.gain_experience(amount);
            if gain.leveled_up {
                bus.push(BattleEvent::LevelUp {
                    target: member.species_name.clone(),
                    new_level: member.level,
                });
                rewards.leveled_up.push(member.species_name.clone());
            }
            if !gain.evolution_messages.is_empty() {
                if let Some(evolution) = &member.evolution {
                    bus.push(BattleEvent::EvolutionReady {
                        target: member.species_name.clone(),
                        into: evolution.evolves_into.clone(),
                    });
                }
                rewards.evolution_messages.extend(gain.evolution_messages);
            }
        }
    }

    fn roll_wild_loot(
        &self,
        roster: &mut BattlePlayerRoster,
        data: &GameData,
        rng: &mut TurnRng,
        rewards: &mut VictoryRewards,
        bus: &mut EventBus,
    ) {
        let dropped = if rng.roll(self.config.wild_drop_chance, "wild loot drop") {
            data.items.roll_drop(rng)
        } else {
            None
        };
        match dropped {
            Some(item) => {
                bus.push(BattleEvent::LootDropped {
                    item: item.name.clone(),
                });
                rewards.loot_items.push(item.name.clone());
                roster.inventory.add(item);
            }
            None => {
                let index = rng.choose_index(CONSOLATION_MESSAGES.len(), "consolation message");
                bus.push(BattleEvent::NoLoot {
                    message: CONSOLATION_MESSAGES[index].to_string(),
                });
            }
        }
    }

    fn grant_boss_bundle(
        &self,
        category: BattleCategory,
        boss: Option<&BossEntry>,
        roster: &mut BattlePlayerRoster,
        data: &GameData,
        rewards: &mut VictoryRewards,
        bus: &mut EventBus,
    ) -> ProgressionResult<()> {
        if let Some(boss) = boss {
            if let Some(companion) = &boss.reward.companion {
                let recruit = data
                    .species
                    .create_combatant(companion, self.config.boss_companion_level)?;
                match roster.add_member(recruit) {
                    Ok(_) => {
                        bus.push(BattleEvent::CompanionJoined {
                            species: companion.clone(),
                            level: self.config.boss_companion_level,
                        });
                        rewards.companion = Some(companion.clone());
                    }
                    Err(_) => bus.push(BattleEvent::CompanionTurnedAway {
                        species: companion.clone(),
                    }),
                }
            }

            for name in &boss.reward.items {
                let item = data.items.get(name)?.clone();
                bus.push(BattleEvent::ItemReceived {
                    item: item.name.clone(),
                });
                rewards.loot_items.push(item.name.clone());
                roster.inventory.add(item);
            }

            if boss.reward.currency > 0 {
                roster.currency = roster.currency.saturating_add(boss.reward.currency);
                rewards.currency_gained = boss.reward.currency;
                bus.push(BattleEvent::CurrencyGained {
                    amount: boss.reward.currency,
                    total: roster.currency,
                });
            }
        }

        let tier = boss.map(|b| b.tier).unwrap_or(match category {
            BattleCategory::StageBoss => BossTier::StageBoss,
            _ => BossTier::MiniBoss,
        });
        match tier {
            BossTier::StageBoss => {
                roster.stage += 1;
                rewards.stage_advanced = true;
                bus.push(BattleEvent::StageAdvanced {
                    new_stage: roster.stage,
                });
            }
            BossTier::MiniBoss => {
                roster.mini_bosses_defeated += 1;
                let unlocked =
                    roster.mini_bosses_defeated % self.config.mini_bosses_per_stage_unlock == 0;
                rewards.stage_boss_unlocked = unlocked;
                bus.push(BattleEvent::MiniBossDefeated {
                    total: roster.mini_bosses_defeated,
                    stage_boss_unlocked: unlocked,
                });
            }
        }
        Ok(())
    }
}
