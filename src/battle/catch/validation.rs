use crate::battle::state::{ActionRejection, BattleCategory, BattleSession};
use crate::player::{BallType, BattlePlayerRoster};

/// Check if catch attempts are allowed based on battle category
pub fn is_catch_allowed(category: BattleCategory) -> bool {
    !category.is_boss()
}

/// Validate a catch attempt before anything is consumed. Returns the target's
/// species name when the throw may go ahead.
pub fn can_attempt_catch(
    session: &BattleSession,
    roster: &BattlePlayerRoster,
    ball: BallType,
) -> Result<String, ActionRejection> {
    // Category first: a boss catch is refused even with an empty bag.
    if !is_catch_allowed(session.category) {
        return Err(ActionRejection::CatchInBossBattle {
            category: session.category,
        });
    }

    if roster.balls(ball) == 0 {
        return Err(ActionRejection::NoCaptureBalls { ball });
    }

    if roster.is_full() {
        return Err(ActionRejection::RosterFull);
    }

    if session.enemy.is_fainted() {
        return Err(ActionRejection::CombatantFainted {
            name: session.enemy.species_name.clone(),
        });
    }

    Ok(session.enemy.species_name.clone())
}
