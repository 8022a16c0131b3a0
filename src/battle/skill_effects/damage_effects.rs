use super::{modifier_duration, set_modifier, SkillContext};
use crate::battle::state::{BattleEvent, EventBus, StatusNote, TurnRng};
use crate::combatant::Combatant;
use crate::status_effects::{ContinuousEffect, ModifierSource};
use schema::{DamageOverTimeParams, DirectDamageParams, MultiHitParams};

/// Attack-scaled hit: percentage (fixed or rolled) or flat base, then crit,
/// type effectiveness, half-defense mitigation and a floor of 1.
pub(super) fn apply_direct_damage(
    params: &DirectDamageParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let attack = caster.effective_attack();
    let percentage = match (
        params.base_damage_percentage,
        params.damage_percentage_min,
        params.damage_percentage_max,
    ) {
        (Some(fixed), _, _) => Some(fixed),
        (None, Some(min), Some(max)) => Some(rng.range_f64(min, max, "damage percentage")),
        _ => None,
    };
    let mut raw = match percentage {
        Some(p) => attack * p,
        None => params.flat_damage.unwrap_or(0) as f64,
    };

    if rng.roll(params.crit_chance, "critical hit") {
        raw *= params.crit_multiplier;
        bus.push(BattleEvent::CriticalHit {
            attacker: caster.species_name.clone(),
        });
    }

    let type_multiplier = target.calculate_type_effectiveness(&ctx.skill.attribute_tags, rng);
    bus.push(BattleEvent::TypeEffectiveness {
        multiplier: type_multiplier,
    });
    raw *= type_multiplier;

    let mitigation = (target.effective_defense() / 2.0).floor();
    let mut damage = (raw - mitigation).floor().max(1.0) as u32;

    if let Some(hp_percentage) = params.current_hp_damage_percentage {
        let alternative = (target.hp() as f64 * hp_percentage).floor() as u32;
        damage = damage.max(alternative);
    }

    let dealt = target.receive_damage(damage, ctx.target_side(), bus);

    if let Some(debuff) = &params.self_debuff {
        if rng.roll(debuff.chance, "self debuff") {
            set_modifier(
                caster,
                debuff.attack_multiplier,
                debuff.defense_multiplier,
                modifier_duration(debuff.turns),
                ctx,
                ModifierSource::SelfCast,
                bus,
            );
        }
    }

    if let Some(defense_cut) = params.enemy_defense_debuff {
        if !target.is_fainted() {
            set_modifier(
                target,
                1.0,
                1.0 - defense_cut,
                modifier_duration(params.enemy_defense_debuff_turns),
                ctx,
                ModifierSource::Enemy,
                bus,
            );
        }
    }

    if params.self_damage > 0 {
        caster.pay_hp(params.self_damage, bus);
    }

    dealt
}

/// Registers damage over time on the target. The first tick lands at the
/// next turn end, never during the cast.
pub(super) fn apply_damage_over_time(
    params: &DamageOverTimeParams,
    ctx: &SkillContext<'_>,
    caster: &Combatant,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let per_turn = match (params.dot_damage, params.dot_percentage) {
        (Some(flat), _) => flat,
        (None, Some(p)) => (caster.effective_attack() * p).floor() as u32,
        (None, None) => 0,
    }
    .max(1);

    if params.turns > 0 {
        target.status.continuous_damage.push(ContinuousEffect {
            amount_per_turn: per_turn,
            turns_remaining: params.turns,
            source_name: ctx.skill.name.clone(),
            caster: caster.species_name.clone(),
        });
        bus.push(BattleEvent::ContinuousDamageApplied {
            target: target.species_name.clone(),
            source: ctx.skill.name.clone(),
            amount_per_turn: per_turn,
            turns: params.turns,
        });
    }

    note_status(params.paralyze_chance, StatusNote::Paralyzed, target, rng, bus);
    note_status(params.petrify_chance, StatusNote::Petrified, target, rng, bus);

    per_turn
}

/// Sequential hits of a share of attack. Type effectiveness is rolled once
/// and defense is ignored. Stops early once the target faints.
pub(super) fn apply_multi_hit(
    params: &MultiHitParams,
    ctx: &SkillContext<'_>,
    caster: &Combatant,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let attack = caster.effective_attack();
    let type_multiplier = target.calculate_type_effectiveness(&ctx.skill.attribute_tags, rng);
    bus.push(BattleEvent::TypeEffectiveness {
        multiplier: type_multiplier,
    });

    let mut total = 0;
    for _ in 0..params.hit_count {
        if target.is_fainted() {
            break;
        }
        let mut share = params.damage_percentage;
        if rng.roll(params.bonus_damage_chance, "multi-hit bonus") {
            share += params.bonus_damage_percentage;
        }
        let damage = (attack * share * type_multiplier).floor().max(1.0) as u32;
        total += target.receive_damage(damage, ctx.target_side(), bus);
    }
    total
}

/// Generic move driven by the skill's power.
pub(super) fn apply_power_attack(
    ctx: &SkillContext<'_>,
    caster: &Combatant,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let (damage, type_multiplier) =
        caster.compute_move_damage(ctx.skill.power, &ctx.skill.attribute_tags, target, rng);
    bus.push(BattleEvent::TypeEffectiveness {
        multiplier: type_multiplier,
    });
    target.receive_damage(damage, ctx.target_side(), bus)
}

/// Message-only status: a successful roll logs a note and nothing else.
pub(super) fn note_status(
    chance: f64,
    note: StatusNote,
    target: &Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) {
    if target.is_fainted() {
        return;
    }
    if rng.roll(chance, "status note") {
        bus.push(BattleEvent::StatusNoted {
            target: target.species_name.clone(),
            note,
        });
    }
}
