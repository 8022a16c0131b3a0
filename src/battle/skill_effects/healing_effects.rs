use super::SkillContext;
use crate::battle::state::{BattleEvent, EventBus};
use crate::combatant::Combatant;
use crate::status_effects::ContinuousEffect;
use schema::{HealParams, HotDotParams, TeamHealParams};

fn percentage_of_max(combatant: &Combatant, percentage: f64) -> u32 {
    (combatant.max_hp() as f64 * percentage).floor() as u32
}

fn register_heal_over_time(
    recipient: &mut Combatant,
    per_turn: u32,
    turns: u32,
    source: &str,
    caster: &str,
    bus: &mut EventBus,
) {
    recipient.status.continuous_heal.push(ContinuousEffect {
        amount_per_turn: per_turn,
        turns_remaining: turns,
        source_name: source.to_string(),
        caster: caster.to_string(),
    });
    bus.push(BattleEvent::ContinuousHealApplied {
        target: recipient.species_name.clone(),
        source: source.to_string(),
        amount_per_turn: per_turn,
        turns,
    });
}

pub(super) fn apply_direct_heal(params: &HealParams, caster: &mut Combatant, bus: &mut EventBus) -> u32 {
    let amount = percentage_of_max(caster, params.heal_percentage);
    caster.receive_heal(amount, bus)
}

pub(super) fn apply_heal_over_time(
    params: &HealParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    let per_turn = percentage_of_max(caster, params.heal_percentage).max(1);
    let name = caster.species_name.clone();
    register_heal_over_time(caster, per_turn, params.turns.max(1), &ctx.skill.name, &name, bus);
    per_turn
}

/// Heals every living ally by a share of their own max HP, at once for a
/// single turn or spread over `turns` turn ends.
pub(super) fn apply_team_heal(
    params: &TeamHealParams,
    ctx: &SkillContext<'_>,
    allies: &mut [Combatant],
    bus: &mut EventBus,
) -> u32 {
    let caster = allies[ctx.caster_index].species_name.clone();
    let mut total = 0;
    for ally in allies.iter_mut().filter(|a| !a.is_fainted()) {
        let amount = percentage_of_max(ally, params.team_heal_percentage);
        if params.turns <= 1 {
            total += ally.receive_heal(amount, bus);
        } else {
            let per_turn = amount.max(1);
            register_heal_over_time(ally, per_turn, params.turns, &ctx.skill.name, &caster, bus);
            total += per_turn;
        }
    }
    total
}

/// Heal over time on the caster plus damage over time on the target.
pub(super) fn apply_hot_dot(
    params: &HotDotParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    target: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    let turns = params.turns.max(1);
    let heal = percentage_of_max(caster, params.heal_percentage).max(1);
    let caster_name = caster.species_name.clone();
    register_heal_over_time(caster, heal, turns, &ctx.skill.name, &caster_name, bus);

    let dot = (caster.effective_attack() * params.dot_percentage).floor().max(1.0) as u32;
    target.status.continuous_damage.push(ContinuousEffect {
        amount_per_turn: dot,
        turns_remaining: turns,
        source_name: ctx.skill.name.clone(),
        caster: caster_name,
    });
    bus.push(BattleEvent::ContinuousDamageApplied {
        target: target.species_name.clone(),
        source: ctx.skill.name.clone(),
        amount_per_turn: dot,
        turns,
    });
    dot
}
