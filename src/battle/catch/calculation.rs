use crate::battle::state::TurnRng;
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::player::BallType;

/// Capture chance for a normal ball, clamped to [0, 1].
/// Formula: (1 - hpFraction) * 0.5 * (1 + 0.1 * (playerLevel - targetLevel)) + 0.1
pub fn calculate_capture_chance(target: &Combatant, player_level: u32, config: &BattleConfig) -> f64 {
    let level_diff = player_level as f64 - target.level as f64;
    let hp_factor = (1.0 - target.hp_fraction()) * config.capture_hp_scale;
    let level_factor = 1.0 + config.capture_chance_per_level * level_diff;
    (hp_factor * level_factor + config.capture_base_chance).clamp(0.0, 1.0)
}

/// Roll for catch success. Returns true if the catch succeeds.
pub fn roll_catch_success(chance: f64, rng: &mut TurnRng) -> bool {
    rng.roll(chance, "catch roll")
}

/// A master ball never misses and never draws from the rng.
pub fn attempt_capture(
    ball: BallType,
    target: &Combatant,
    player_level: u32,
    config: &BattleConfig,
    rng: &mut TurnRng,
) -> bool {
    match ball {
        BallType::Master => true,
        BallType::Normal => {
            let chance = calculate_capture_chance(target, player_level, config);
            tracing::debug!(chance, target = %target.species_name, "capture chance");
            roll_catch_success(chance, rng)
        }
    }
}
