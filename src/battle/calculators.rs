use crate::battle::state::{BattleCategory, BattleEvent, EventBus, TurnRng};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use schema::SkillDefinition;

/// Flee chance: fixed in boss battles, otherwise
/// clamp(0.5 + 0.05 * (playerLevel - enemyLevel), 0.3, 0.9).
pub fn calculate_flee_chance(
    category: BattleCategory,
    player_level: u32,
    enemy_level: u32,
    config: &BattleConfig,
) -> f64 {
    if category.is_boss() {
        return config.boss_flee_chance;
    }
    let level_diff = player_level as f64 - enemy_level as f64;
    (config.base_flee_chance + config.flee_chance_per_level * level_diff)
        .clamp(config.min_flee_chance, config.max_flee_chance)
}

pub fn roll_flee_success(chance: f64, rng: &mut TurnRng) -> bool {
    rng.roll(chance, "flee roll")
}

/// Hands out SP after a skill that dealt damage: the attacker for landing
/// it, the defender for taking it.
pub fn award_combat_sp(
    skill: &SkillDefinition,
    damage: u32,
    attacker: &mut Combatant,
    defender: &mut Combatant,
    config: &BattleConfig,
    bus: &mut EventBus,
) {
    if damage == 0 || !skill.category.grants_sp() {
        return;
    }
    for (combatant, amount) in [
        (attacker, config.sp_gain_on_attack),
        (defender, config.sp_gain_on_defend),
    ] {
        if combatant.is_fainted() {
            continue;
        }
        let gained = combatant.gain_sp(amount);
        if gained > 0 {
            bus.push(BattleEvent::SpGained {
                target: combatant.species_name.clone(),
                amount: gained,
                new_sp: combatant.sp(),
            });
        }
    }
}
