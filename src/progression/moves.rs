//! Skill learning and out-of-battle item use.

use crate::battle::state::TurnRng;
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::errors::{ProgressionError, ProgressionResult};
use crate::game_data::GameData;
use crate::items::ItemCatalog;
use crate::player::{BallType, BattlePlayerRoster, PendingSkillLearning};
use crate::skill_data::SkillCatalog;
use schema::ItemEffect;

#[derive(Debug, Clone, PartialEq)]
pub enum SkillBookOutcome {
    Learned {
        combatant: String,
        skill: String,
    },
    /// All four slots are taken; the roster now holds a pending request.
    ForgetRequired {
        combatant: String,
        skill: String,
        current: Vec<String>,
    },
    Replaced {
        combatant: String,
        forgotten: String,
        learned: String,
    },
    /// The player kept every move. The book stays in the inventory.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemUseOutcome {
    Healed { target: String, amount: u32, new_hp: u32 },
    SpRestored { target: String, amount: u32, new_sp: u32 },
    MaxSpExtended { target: String, new_max: u32 },
    Revived { target: String, hp: u32 },
    BallsAdded { ball: BallType, count: u32, total: u32 },
    Evolved { message: String },
    SkillBookObtained { book: String },
    SkillBook(SkillBookOutcome),
}

impl Combatant {
    /// Learns `skill` into a free slot. Never evicts an existing move.
    pub fn learn_skill(&mut self, skill: &str, catalog: &SkillCatalog) -> ProgressionResult<()> {
        catalog.lookup(skill)?;
        if self.knows(skill) {
            return Err(ProgressionError::SkillAlreadyKnown {
                combatant: self.species_name.clone(),
                skill: skill.to_string(),
            });
        }
        if !self.push_move(skill.to_string()) {
            return Err(ProgressionError::MoveListFull {
                combatant: self.species_name.clone(),
            });
        }
        Ok(())
    }

    /// Replaces the move in `slot` with `skill`; returns the forgotten move.
    pub fn forget_and_learn(
        &mut self,
        slot: usize,
        skill: &str,
        catalog: &SkillCatalog,
    ) -> ProgressionResult<String> {
        catalog.lookup(skill)?;
        if self.knows(skill) {
            return Err(ProgressionError::SkillAlreadyKnown {
                combatant: self.species_name.clone(),
                skill: skill.to_string(),
            });
        }
        self.replace_move(slot, skill.to_string())
            .ok_or(ProgressionError::InvalidMoveSlot(slot))
    }
}

/// Whether a restorative item would change anything on `member`.
pub fn restorative_applies(effect: &ItemEffect, member: &Combatant, config: &BattleConfig) -> bool {
    match effect {
        ItemEffect::HealHp { .. } | ItemEffect::HealPercentage { .. } => {
            !member.is_fainted() && member.hp() < member.max_hp()
        }
        ItemEffect::RestoreSp { .. } => member.sp() < member.max_sp(),
        ItemEffect::ExtendMaxSp => {
            !member.sp_extended() && config.extended_max_sp > member.max_sp()
        }
        ItemEffect::Revive { .. } => member.is_fainted(),
        _ => false,
    }
}

/// Applies a healing, SP or revive item to one combatant. Nothing changes
/// when the item would have no effect.
pub fn apply_restorative(
    item_name: &str,
    effect: &ItemEffect,
    member: &mut Combatant,
    config: &BattleConfig,
) -> ProgressionResult<ItemUseOutcome> {
    if !restorative_applies(effect, member, config) {
        return Err(ProgressionError::NoEffect {
            item: item_name.to_string(),
            combatant: member.species_name.clone(),
        });
    }
    let target = member.species_name.clone();
    let outcome = match effect {
        ItemEffect::HealHp { amount } => {
            let healed = member.heal(*amount);
            ItemUseOutcome::Healed { target, amount: healed, new_hp: member.hp() }
        }
        ItemEffect::HealPercentage { percentage } => {
            let amount = (member.max_hp() as f64 * percentage).floor().max(1.0) as u32;
            let healed = member.heal(amount);
            ItemUseOutcome::Healed { target, amount: healed, new_hp: member.hp() }
        }
        ItemEffect::RestoreSp { amount } => {
            let gained = member.gain_sp(*amount);
            ItemUseOutcome::SpRestored { target, amount: gained, new_sp: member.sp() }
        }
        ItemEffect::ExtendMaxSp => {
            member.extend_max_sp(config.extended_max_sp);
            ItemUseOutcome::MaxSpExtended { target, new_max: member.max_sp() }
        }
        ItemEffect::Revive { hp_percentage } => {
            let hp = (member.max_hp() as f64 * hp_percentage).floor() as u32;
            member.revive(hp);
            ItemUseOutcome::Revived { target, hp: member.hp() }
        }
        _ => {
            return Err(ProgressionError::NoEffect {
                item: item_name.to_string(),
                combatant: member.species_name.clone(),
            })
        }
    };
    Ok(outcome)
}

impl BattlePlayerRoster {
    /// Uses the item in inventory `slot` on roster member `member_index`
    /// outside of battle. The item is consumed only when it did something;
    /// a skill book that needs a forget choice stays until that is resolved.
    pub fn use_item(
        &mut self,
        slot: usize,
        member_index: usize,
        data: &GameData,
        config: &BattleConfig,
        rng: &mut TurnRng,
    ) -> ProgressionResult<ItemUseOutcome> {
        let item = self
            .inventory
            .get(slot)
            .cloned()
            .ok_or(ProgressionError::InvalidInventorySlot(slot))?;
        if member_index >= self.len() {
            return Err(ProgressionError::InvalidMember(member_index));
        }

        let outcome = match &item.effect {
            ItemEffect::CaptureBalls { count } => {
                let total = self.add_balls(BallType::Normal, *count);
                ItemUseOutcome::BallsAdded { ball: BallType::Normal, count: *count, total }
            }
            ItemEffect::MasterBalls { count } => {
                let total = self.add_balls(BallType::Master, *count);
                ItemUseOutcome::BallsAdded { ball: BallType::Master, count: *count, total }
            }
            ItemEffect::EvolutionItem => {
                let member = self
                    .member_mut(member_index)
                    .ok_or(ProgressionError::InvalidMember(member_index))?;
                let message = member.evolve_with_item(&item.name, &data.species)?;
                ItemUseOutcome::Evolved { message }
            }
            ItemEffect::SkillBlindBox => {
                let ultimates = data.skills.ultimates();
                if ultimates.is_empty() {
                    return Err(ProgressionError::NoEffect {
                        item: item.name.clone(),
                        combatant: self.player_name.clone(),
                    });
                }
                let pick = ultimates[rng.choose_index(ultimates.len(), "skill blind box")];
                let book = ItemCatalog::skill_book(&pick.name);
                let name = book.name.clone();
                self.inventory.remove(slot);
                self.inventory.add(book);
                tracing::info!(book = %name, "blind box opened");
                return Ok(ItemUseOutcome::SkillBookObtained { book: name });
            }
            ItemEffect::SkillBook { skill } => {
                return self
                    .learn_from_book(slot, member_index, skill, &data.skills)
                    .map(ItemUseOutcome::SkillBook);
            }
            effect => {
                let member = self
                    .member_mut(member_index)
                    .ok_or(ProgressionError::InvalidMember(member_index))?;
                apply_restorative(&item.name, effect, member, config)?
            }
        };
        self.inventory.remove(slot);
        Ok(outcome)
    }

    fn learn_from_book(
        &mut self,
        slot: usize,
        member_index: usize,
        skill: &str,
        catalog: &SkillCatalog,
    ) -> ProgressionResult<SkillBookOutcome> {
        let member = self
            .member_mut(member_index)
            .ok_or(ProgressionError::InvalidMember(member_index))?;
        match member.learn_skill(skill, catalog) {
            Ok(()) => {
                let combatant = member.species_name.clone();
                self.inventory.remove(slot);
                Ok(SkillBookOutcome::Learned {
                    combatant,
                    skill: skill.to_string(),
                })
            }
            Err(ProgressionError::MoveListFull { combatant }) => {
                let current = member.moves().to_vec();
                self.pending_skill_learning = Some(PendingSkillLearning {
                    member_index,
                    skill: skill.to_string(),
                    book_slot: slot,
                });
                Ok(SkillBookOutcome::ForgetRequired {
                    combatant,
                    skill: skill.to_string(),
                    current,
                })
            }
            Err(other) => Err(other),
        }
    }

    /// Finishes a pending skill book. `Some(slot)` forgets that move and
    /// consumes the book; `None` cancels and keeps it.
    pub fn resolve_forget(
        &mut self,
        forget: Option<usize>,
        catalog: &SkillCatalog,
    ) -> ProgressionResult<SkillBookOutcome> {
        let pending = self
            .pending_skill_learning
            .take()
            .ok_or(ProgressionError::NothingPending)?;
        let Some(move_slot) = forget else {
            return Ok(SkillBookOutcome::Cancelled);
        };

        let book_matches = matches!(
            self.inventory.get(pending.book_slot).map(|item| &item.effect),
            Some(ItemEffect::SkillBook { skill }) if *skill == pending.skill
        );
        if !book_matches {
            return Err(ProgressionError::InvalidInventorySlot(pending.book_slot));
        }

        let member = self
            .member_mut(pending.member_index)
            .ok_or(ProgressionError::InvalidMember(pending.member_index))?;
        let forgotten = match member.forget_and_learn(move_slot, &pending.skill, catalog) {
            Ok(forgotten) => forgotten,
            Err(err) => {
                // A bad slot choice leaves the request open for another try.
                if matches!(err, ProgressionError::InvalidMoveSlot(_)) {
                    self.pending_skill_learning = Some(pending);
                }
                return Err(err);
            }
        };
        let combatant = member.species_name.clone();
        self.inventory.remove(pending.book_slot);
        Ok(SkillBookOutcome::Replaced {
            combatant,
            forgotten,
            learned: pending.skill,
        })
    }
}
