use super::damage_effects::note_status;
use super::{modifier_duration, set_modifier, SkillContext};
use crate::battle::state::{EventBus, StatusNote, TurnRng};
use crate::combatant::Combatant;
use crate::status_effects::ModifierSource;
use schema::{EnemyDebuffParams, MixedBuffDebuffParams, StatChangeParams, TeamBuffParams, TeamDebuffParams};

pub(super) fn apply_self_buff(
    params: &StatChangeParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    set_modifier(
        caster,
        params.attack_multiplier,
        params.defense_multiplier,
        modifier_duration(params.turns),
        ctx,
        ModifierSource::SelfCast,
        bus,
    );
    0
}

/// Optional flat hit, then the debuff lands in the target's modifier slot.
pub(super) fn apply_enemy_debuff(
    params: &EnemyDebuffParams,
    ctx: &SkillContext<'_>,
    target: &mut Combatant,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> u32 {
    let dealt = if params.direct_damage > 0 {
        target.receive_damage(params.direct_damage, ctx.target_side(), bus)
    } else {
        0
    };
    if target.is_fainted() {
        return dealt;
    }
    set_modifier(
        target,
        params.target_attack_multiplier,
        params.target_defense_multiplier,
        modifier_duration(params.turns),
        ctx,
        ModifierSource::Enemy,
        bus,
    );
    note_status(params.charm_chance, StatusNote::Charmed, target, rng, bus);
    dealt
}

/// Buffs every living ally, caster included. An HP cost is charged per ally
/// and never knocks anyone out.
pub(super) fn apply_team_buff(
    params: &TeamBuffParams,
    ctx: &SkillContext<'_>,
    allies: &mut [Combatant],
    bus: &mut EventBus,
) -> u32 {
    let mut buffed = 0;
    for ally in allies.iter_mut().filter(|a| !a.is_fainted()) {
        set_modifier(
            ally,
            params.team_attack_multiplier,
            params.team_defense_multiplier,
            modifier_duration(params.turns),
            ctx,
            ModifierSource::Team,
            bus,
        );
        if params.team_hp_cost > 0.0 {
            let cost = (ally.max_hp() as f64 * params.team_hp_cost).floor() as u32;
            ally.pay_hp(cost, bus);
        }
        buffed += 1;
    }
    buffed
}

pub(super) fn apply_team_debuff(
    params: &TeamDebuffParams,
    ctx: &SkillContext<'_>,
    target: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    let dealt = if params.direct_damage > 0 {
        target.receive_damage(params.direct_damage, ctx.target_side(), bus)
    } else {
        0
    };
    if !target.is_fainted() && params.target_attack_multiplier != 1.0 {
        set_modifier(
            target,
            params.target_attack_multiplier,
            1.0,
            modifier_duration(params.turns),
            ctx,
            ModifierSource::Enemy,
            bus,
        );
    }
    dealt
}

pub(super) fn apply_mixed_buff_debuff(
    params: &MixedBuffDebuffParams,
    ctx: &SkillContext<'_>,
    caster: &mut Combatant,
    target: &mut Combatant,
    bus: &mut EventBus,
) -> u32 {
    let turns = modifier_duration(params.turns);
    set_modifier(
        caster,
        params.self_attack_multiplier,
        params.self_defense_multiplier,
        turns,
        ctx,
        ModifierSource::SelfCast,
        bus,
    );
    if !target.is_fainted() {
        set_modifier(
            target,
            params.target_attack_multiplier,
            params.target_defense_multiplier,
            turns,
            ctx,
            ModifierSource::Enemy,
            bus,
        );
    }
    0
}
