//! Decision making for both sides: the enemy's random skill pick and a
//! greedy autopilot that can drive the player side.

use crate::battle::state::{BattleSession, TurnRng};
use crate::combatant::Combatant;
use crate::game_data::GameData;
use crate::player::{BattlePlayerRoster, PlayerAction};
use ordered_float::OrderedFloat;
use schema::{SkillDefinition, SkillEffect};

/// A trait for any system that can decide on a player action.
pub trait Behavior {
    fn decide_action(
        &self,
        session: &BattleSession,
        roster: &BattlePlayerRoster,
        data: &GameData,
    ) -> PlayerAction;
}

/// Uniform pick over the enemy's whole move list. Affordability is not
/// considered here: an unaffordable pick fails for SP when it is cast.
pub fn choose_enemy_skill(enemy: &Combatant, rng: &mut TurnRng) -> Option<usize> {
    match enemy.moves().len() {
        0 => None,
        len => Some(rng.choose_index(len, "enemy skill choice")),
    }
}

/// Picks the affordable move with the best rough payoff. Flees when nothing
/// useful is left.
#[derive(Debug, Default)]
pub struct GreedyAutopilot;

impl GreedyAutopilot {
    pub fn new() -> Self {
        Self
    }

    fn expected_type_multiplier(skill: &SkillDefinition, target: &Combatant) -> f64 {
        let tags = &skill.attribute_tags;
        if tags.iter().any(|t| target.disadvantage_tags.contains(t)) {
            2.15
        } else if tags.iter().any(|t| target.advantage_tags.contains(t)) {
            0.35
        } else {
            1.0
        }
    }

    fn score_skill(
        &self,
        skill: &SkillDefinition,
        user: &Combatant,
        target: &Combatant,
        roster: &BattlePlayerRoster,
    ) -> Option<f64> {
        if user.sp() < skill.sp_cost {
            return None;
        }
        if skill.battle_unique && user.used_battle_unique.contains(&skill.name) {
            return None;
        }
        let attack = user.effective_attack();
        let mitigation = target.effective_defense() / 2.0;
        let type_multiplier = Self::expected_type_multiplier(skill, target);
        let low_hp = user.hp_fraction() < 0.4;

        let score = match &skill.effect {
            SkillEffect::DirectDamage(p) => {
                let share = p
                    .base_damage_percentage
                    .or_else(|| Some((p.damage_percentage_min? + p.damage_percentage_max?) / 2.0))
                    .unwrap_or(0.0);
                let raw = if share > 0.0 {
                    attack * share
                } else {
                    p.flat_damage.unwrap_or(0) as f64
                };
                (raw * type_multiplier - mitigation).max(1.0)
            }
            SkillEffect::MultiHit(p) => attack * p.damage_percentage * p.hit_count as f64 * type_multiplier,
            SkillEffect::SpecialAttack(p) => {
                if p.execute_threshold > 0.0 && target.hp_fraction() < p.execute_threshold {
                    target.hp() as f64 * 1.5
                } else if p.base_damage > 0 {
                    p.base_damage as f64
                } else if p.ignore_defense_damage_max > 0 {
                    (p.ignore_defense_damage_min + p.ignore_defense_damage_max) as f64 / 2.0
                } else {
                    skill.power as f64
                }
            }
            SkillEffect::PowerAttack => {
                let level_factor = user.level as f64 * 0.4 + 2.0;
                (level_factor * skill.power as f64 * attack / target.effective_defense().max(1.0) / 50.0 + 2.0)
                    * type_multiplier
                    * 0.925
            }
            SkillEffect::DamageOverTime(p) => {
                let per_turn = p
                    .dot_damage
                    .map(f64::from)
                    .unwrap_or_else(|| attack * p.dot_percentage.unwrap_or(0.0));
                per_turn * p.turns as f64 * 0.7
            }
            SkillEffect::DirectHeal(p) if low_hp => user.max_hp() as f64 * p.heal_percentage,
            SkillEffect::HealOverTime(p) if low_hp => {
                user.max_hp() as f64 * p.heal_percentage * p.turns as f64 * 0.7
            }
            SkillEffect::TeamHeal(p) if low_hp => user.max_hp() as f64 * p.team_heal_percentage,
            SkillEffect::Revive(_) => {
                if roster.first_fainted_index().is_some() {
                    60.0
                } else {
                    return None;
                }
            }
            SkillEffect::DelayedUltimate(p) => attack * p.delayed_damage_percentage * 0.6,
            SkillEffect::TeamSacrificeRevival(_) => {
                let hurt = roster
                    .team()
                    .iter()
                    .filter(|m| !m.is_fainted() && m.hp_fraction() < 0.5)
                    .count();
                if hurt >= 2 {
                    40.0
                } else {
                    return None;
                }
            }
            SkillEffect::DirectHeal(_) | SkillEffect::HealOverTime(_) | SkillEffect::TeamHeal(_) => 0.5,
            // Buffs and debuffs: worth something, never more than a real hit.
            _ => {
                if user.status.stat_modifier.is_some() {
                    0.5
                } else {
                    3.0
                }
            }
        };
        Some(score)
    }
}

impl Behavior for GreedyAutopilot {
    fn decide_action(
        &self,
        session: &BattleSession,
        roster: &BattlePlayerRoster,
        data: &GameData,
    ) -> PlayerAction {
        let Some(user) = roster.active() else {
            return PlayerAction::Flee;
        };
        let target = &session.enemy;

        let best = user
            .moves()
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                let skill = data.skills.lookup(name).ok()?;
                let score = self.score_skill(skill, user, target, roster)?;
                Some((index, score))
            })
            .max_by_key(|(_, score)| OrderedFloat(*score));

        match best {
            Some((index, _)) => PlayerAction::Attack(index),
            None => PlayerAction::Flee,
        }
    }
}
