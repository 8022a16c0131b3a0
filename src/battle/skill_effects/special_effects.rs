use super::{find_revive_target, modifier_duration, set_modifier, SkillContext};
use crate::battle::state::{BattleEvent, EventBus, TurnRng};
use crate::combatant::Combatant;
use crate::status_effects::{DelayedEffect, DelayedEffectKind, EffectTarget, ModifierSource};
use schema::{DelayedUltimateParams, ReviveParams, SpecialAttackParams, TeamSacrificeParams};

/// Ultimate damage in priority order: execute, flat base damage, rolled
/// defense-ignoring damage, then the skill's power. Any HP cost is paid
/// afterwards and never drops the caster below 1.
pub(super) fn apply_special_attack(
    params: &SpecialAttackParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let dealt = if params.execute_threshold > 0.0 && target.hp_fraction() < params.execute_threshold {
        bus.push(BattleEvent::Executed {
            target: target.species_name.clone(),
        });
        let remaining = target.hp();
        target.receive_damage(remaining, ctx.target_side(), bus)
    } else if params.base_damage > 0 {
        target.receive_damage(params.base_damage, ctx.target_side(), bus)
    } else if params.ignore_defense_damage_min > 0 && params.ignore_defense_damage_max > 0 {
        let damage = rng.range_u32(
            params.ignore_defense_damage_min,
            params.ignore_defense_damage_max,
            "defense-ignoring damage",
        );
        target.receive_damage(damage, ctx.target_side(), bus)
    } else if ctx.skill.power > 0 {
        target.receive_damage(ctx.skill.power, ctx.target_side(), bus)
    } else {
        0
    };

    if params.self_hp_cost > 0.0 {
        let cost = (caster.hp() as f64 * params.self_hp_cost).floor() as u32;
        caster.pay_hp(cost, bus);
    }

    dealt
}

/// Brings back the first fainted ally other than the caster. The caller has
/// already checked that one exists.
pub(super) fn apply_revive(
    params: &ReviveParams,
    ctx: &SkillContext<'_>,
    allies: &mut [Combatant],
    bus: &mut EventBus,
) -> u32 {
    let Some(index) = find_revive_target(allies, ctx.caster_index) else {
        return 0;
    };
    let ally = &mut allies[index];
    let hp = (ally.max_hp() as f64 * params.revive_hp_percentage).floor() as u32;
    ally.revive(hp);
    bus.push(BattleEvent::Revived {
        target: ally.species_name.clone(),
        hp: ally.hp(),
    });
    ally.hp()
}

/// The team-sacrifice combo: full heal for every other living ally, caster
/// drops to 1 HP, attack boosts for the rest of the battle and a delayed
/// heal back on the caster.
pub(super) fn apply_team_sacrifice_revival(
    params: &TeamSacrificeParams,
    ctx: &SkillContext<'_>,
    allies: &mut [Combatant],
    bus: &mut EventBus,
) -> u32 {
    let mut healed_total = 0;
    for (index, ally) in allies.iter_mut().enumerate() {
        if index == ctx.caster_index || ally.is_fainted() {
            continue;
        }
        let missing = ally.max_hp() - ally.hp();
        healed_total += ally.receive_heal(missing, bus);
        set_modifier(
            ally,
            1.0 + params.ally_attack_buff,
            1.0,
            None,
            ctx,
            ModifierSource::Team,
            bus,
        );
    }

    let caster = &mut allies[ctx.caster_index];
    let sacrifice = caster.hp().saturating_sub(1);
    caster.pay_hp(sacrifice, bus);
    set_modifier(
        caster,
        params.caster_attack_multiplier,
        1.0,
        None,
        ctx,
        ModifierSource::Team,
        bus,
    );

    let trigger_turn = caster.battle_turn_counter + params.delayed_heal_turns;
    let value = (caster.max_hp() as f64 * params.delayed_heal_percentage).floor() as u32;
    schedule(caster, DelayedEffectKind::Heal, value, trigger_turn, EffectTarget::Caster, ctx, bus);

    healed_total
}

/// Multi-turn ultimate: a self buff now and a hit on whoever is the
/// opponent when it lands. Optionally the caster falls at the same moment.
pub(super) fn apply_delayed_ultimate(
    params: &DelayedUltimateParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    let value = (caster.effective_attack() * params.delayed_damage_percentage).floor() as u32;

    set_modifier(
        caster,
        params.attack_multiplier,
        params.defense_multiplier,
        modifier_duration(params.turns),
        ctx,
        ModifierSource::SelfCast,
        bus,
    );

    let trigger_turn = caster.battle_turn_counter + params.delayed_turns;
    schedule(caster, DelayedEffectKind::Damage, value, trigger_turn, EffectTarget::Opponent, ctx, bus);
    if params.self_sacrifice {
        caster.status.delayed_effects.push(DelayedEffect {
            kind: DelayedEffectKind::SelfSacrifice,
            value: 0,
            trigger_turn,
            source_name: ctx.skill.name.clone(),
            caster: caster.species_name.clone(),
            target: EffectTarget::Caster,
        });
    }
    value
}

fn schedule(
    caster: &mut Combatant,
    kind: DelayedEffectKind,
    value: u32,
    trigger_turn: u32,
    target: EffectTarget,
    ctx: &SkillContext<'_>,
    bus: &mut EventBus,
) {
    caster.status.delayed_effects.push(DelayedEffect {
        kind,
        value,
        trigger_turn,
        source_name: ctx.skill.name.clone(),
        caster: caster.species_name.clone(),
        target,
    });
    bus.push(BattleEvent::DelayedEffectScheduled {
        caster: caster.species_name.clone(),
        source: ctx.skill.name.clone(),
        trigger_turn,
    });
}
