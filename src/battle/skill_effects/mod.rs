// Skill resolution: one handler per effect variant, split by concern.

mod damage_effects;
mod healing_effects;
mod special_effects;
mod stat_effects;

use crate::battle::state::{BattleEvent, EventBus, Side, SkillFailure, TurnRng};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::errors::{BattleError, BattleResult};
use crate::status_effects::{ModifierSource, StatModifier};
use schema::{SkillDefinition, SkillEffect};

use self::{damage_effects::*, healing_effects::*, special_effects::*, stat_effects::*};

/// Who is casting what, from which side.
#[derive(Debug, Clone, Copy)]
pub struct SkillContext<'a> {
    pub skill: &'a SkillDefinition,
    pub caster_index: usize,
    pub caster_side: Side,
    pub config: &'a BattleConfig,
}

impl SkillContext<'_> {
    pub fn target_side(&self) -> Side {
        self.caster_side.opponent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillOutcome {
    /// The skill went off. `primary` is its headline number: damage dealt,
    /// HP healed or the per-turn amount registered.
    Resolved { primary: u32 },
    /// Nothing changed.
    InsufficientSp { required: u32, available: u32 },
    /// Nothing changed and no SP was spent.
    Failed(SkillFailure),
}

/// Resolves `skill` cast by `allies[caster_index]` against `target`.
///
/// SP is checked and deducted before any effect applies; an unaffordable or
/// impossible skill leaves every combatant untouched.
#[allow(clippy::too_many_arguments)]
pub fn use_skill(
    skill: &SkillDefinition,
    caster_index: usize,
    allies: &mut [Combatant],
    target: &mut Combatant,
    caster_side: Side,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<SkillOutcome> {
    let caster = allies.get(caster_index).ok_or_else(|| {
        BattleError::InconsistentState(format!("caster index {} out of range", caster_index))
    })?;
    if caster.is_fainted() {
        return Err(BattleError::InconsistentState(format!(
            "{} cannot act while fainted",
            caster.species_name
        )));
    }
    let caster_name = caster.species_name.clone();

    if skill.battle_unique && caster.used_battle_unique.contains(&skill.name) {
        bus.push(BattleEvent::SkillFailed {
            user: caster_name,
            skill: skill.name.clone(),
            reason: SkillFailure::AlreadyUsedThisBattle,
        });
        return Ok(SkillOutcome::Failed(SkillFailure::AlreadyUsedThisBattle));
    }

    if caster.sp() < skill.sp_cost {
        let available = caster.sp();
        bus.push(BattleEvent::InsufficientSp {
            user: caster_name,
            skill: skill.name.clone(),
            required: skill.sp_cost,
            available,
        });
        return Ok(SkillOutcome::InsufficientSp {
            required: skill.sp_cost,
            available,
        });
    }

    if matches!(skill.effect, SkillEffect::Revive(_))
        && find_revive_target(allies, caster_index).is_none()
    {
        bus.push(BattleEvent::SkillFailed {
            user: caster_name,
            skill: skill.name.clone(),
            reason: SkillFailure::NoFaintedAlly,
        });
        return Ok(SkillOutcome::Failed(SkillFailure::NoFaintedAlly));
    }

    let caster = &mut allies[caster_index];
    if !caster.spend_sp(skill.sp_cost) {
        return Err(BattleError::InconsistentState(format!(
            "{} could not pay for {}",
            caster_name, skill.name
        )));
    }
    if skill.battle_unique {
        caster.used_battle_unique.insert(skill.name.clone());
    }

    bus.push(BattleEvent::SkillUsed {
        side: caster_side,
        user: caster_name.clone(),
        skill: skill.name.clone(),
    });
    bus.push(BattleEvent::SkillQuote {
        user: caster_name,
        quote: skill.flavor_quote.clone(),
    });
    tracing::debug!(skill = %skill.name, sp_cost = skill.sp_cost, "skill resolving");

    let ctx = SkillContext {
        skill,
        caster_index,
        caster_side,
        config,
    };

    let primary = match &skill.effect {
        SkillEffect::DirectDamage(params) => {
            apply_direct_damage(params, &ctx, &mut allies[caster_index], target, rng, bus)
        }
        SkillEffect::DamageOverTime(params) => {
            apply_damage_over_time(params, &ctx, &allies[caster_index], target, rng, bus)
        }
        SkillEffect::MultiHit(params) => {
            apply_multi_hit(params, &ctx, &allies[caster_index], target, rng, bus)
        }
        SkillEffect::PowerAttack => {
            apply_power_attack(&ctx, &allies[caster_index], target, rng, bus)
        }
        SkillEffect::DirectHeal(params) => apply_direct_heal(params, &mut allies[caster_index], bus),
        SkillEffect::HealOverTime(params) => {
            apply_heal_over_time(params, &ctx, &mut allies[caster_index], bus)
        }
        SkillEffect::TeamHeal(params) => apply_team_heal(params, &ctx, allies, bus),
        SkillEffect::HotDot(params) => {
            apply_hot_dot(params, &ctx, &mut allies[caster_index], target, bus)
        }
        SkillEffect::SelfBuff(params) => apply_self_buff(params, &ctx, &mut allies[caster_index], bus),
        SkillEffect::EnemyDebuff(params) => {
            apply_enemy_debuff(params, &ctx, target, rng, bus)
        }
        SkillEffect::TeamBuff(params) => apply_team_buff(params, &ctx, allies, bus),
        SkillEffect::TeamDebuff(params) => apply_team_debuff(params, &ctx, target, bus),
        SkillEffect::MixedBuffDebuff(params) => {
            apply_mixed_buff_debuff(params, &ctx, &mut allies[caster_index], target, bus)
        }
        SkillEffect::SpecialAttack(params) => {
            apply_special_attack(params, &ctx, &mut allies[caster_index], target, rng, bus)
        }
        SkillEffect::Revive(params) => apply_revive(params, &ctx, allies, bus),
        SkillEffect::TeamSacrificeRevival(params) => {
            apply_team_sacrifice_revival(params, &ctx, allies, bus)
        }
        SkillEffect::DelayedUltimate(params) => {
            apply_delayed_ultimate(params, &ctx, &mut allies[caster_index], bus)
        }
    };

    Ok(SkillOutcome::Resolved { primary })
}

/// First fainted ally other than the caster.
pub(crate) fn find_revive_target(allies: &[Combatant], caster_index: usize) -> Option<usize> {
    allies
        .iter()
        .enumerate()
        .find(|(index, ally)| *index != caster_index && ally.is_fainted())
        .map(|(index, _)| index)
}

/// `turns` of 0 means the modifier lasts for the rest of the battle.
fn modifier_duration(turns: u32) -> Option<u32> {
    (turns > 0).then_some(turns)
}

/// Writes into the target's single modifier slot, replacing whatever was
/// there, and logs it.
fn set_modifier(
    target: &mut Combatant,
    attack_multiplier: f64,
    defense_multiplier: f64,
    turns: Option<u32>,
    ctx: &SkillContext<'_>,
    source: ModifierSource,
    bus: &mut EventBus,
) {
    target.status.set_modifier(StatModifier {
        attack_multiplier,
        defense_multiplier,
        turns_remaining: turns,
        source_name: ctx.skill.name.clone(),
        source,
    });
    bus.push(BattleEvent::StatModifierApplied {
        target: target.species_name.clone(),
        source: ctx.skill.name.clone(),
        attack_multiplier,
        defense_multiplier,
        turns,
    });
}
