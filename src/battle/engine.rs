use crate::battle::ai::choose_enemy_skill;
use crate::battle::calculators::{award_combat_sp, calculate_flee_chance, roll_flee_success};
use crate::battle::catch::{attempt_capture, can_attempt_catch};
use crate::battle::skill_effects::{find_revive_target, use_skill, SkillOutcome};
use crate::battle::state::{
    ActionRejection, BattleEnd, BattleEvent, BattleSession, EventBus, Side, TurnPhase, TurnRng,
};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::errors::{BattleError, BattleResult};
use crate::game_data::GameData;
use crate::player::{BallType, BattlePlayerRoster, PlayerAction};
use crate::progression::moves::{apply_restorative, restorative_applies, ItemUseOutcome};
use schema::{ItemEffect, SkillEffect};

/// What a call to [`resolve_turn`] did with the battle.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResolution {
    /// The turn ran to its end and the battle goes on.
    Continue,
    /// The action was refused. No state changed and no turn was used.
    Rejected(ActionRejection),
    Finished(BattleEnd),
}

/// Where the player's half of the turn leaves things.
enum PlayerStep {
    Finished(BattleEnd),
    /// Attack, or a failed catch or flee: the enemy answers.
    EnemyActs,
    /// Items and voluntary switches go straight to turn end.
    SkipEnemy,
}

/// Checks a player action against the current state without touching it.
pub fn validate_player_action(
    session: &BattleSession,
    roster: &BattlePlayerRoster,
    action: &PlayerAction,
    data: &GameData,
    config: &BattleConfig,
) -> Result<(), ActionRejection> {
    if session.is_terminal() {
        return Err(ActionRejection::NoBattleInProgress);
    }
    let Some(active) = roster.active() else {
        return Err(ActionRejection::InvalidRosterIndex(roster.active_index));
    };

    match action {
        PlayerAction::Attack(slot) => {
            let name = active
                .moves()
                .get(*slot)
                .ok_or(ActionRejection::InvalidMoveSlot(*slot))?;
            let skill = data
                .skills
                .lookup(name)
                .map_err(|_| ActionRejection::UnknownSkill { skill: name.clone() })?;
            if skill.battle_unique && active.used_battle_unique.contains(&skill.name) {
                return Err(ActionRejection::SkillAlreadyUsed {
                    skill: skill.name.clone(),
                });
            }
            if active.sp() < skill.sp_cost {
                return Err(ActionRejection::InsufficientSp {
                    skill: skill.name.clone(),
                    required: skill.sp_cost,
                    available: active.sp(),
                });
            }
            if matches!(skill.effect, SkillEffect::Revive(_))
                && find_revive_target(roster.team(), roster.active_index).is_none()
            {
                return Err(ActionRejection::NoFaintedAlly {
                    skill: skill.name.clone(),
                });
            }
            Ok(())
        }
        PlayerAction::Catch(ball) => can_attempt_catch(session, roster, *ball).map(|_| ()),
        PlayerAction::Flee => Ok(()),
        PlayerAction::UseItem(slot) => {
            let item = roster
                .inventory
                .get(*slot)
                .ok_or(ActionRejection::InvalidInventorySlot(*slot))?;
            match &item.effect {
                ItemEffect::CaptureBalls { .. } | ItemEffect::MasterBalls { .. } => Ok(()),
                ItemEffect::EvolutionItem | ItemEffect::SkillBlindBox | ItemEffect::SkillBook { .. } => {
                    Err(ActionRejection::ItemNotUsableInBattle {
                        item: item.name.clone(),
                    })
                }
                effect => {
                    let target = item_target(effect, roster).and_then(|index| roster.member(index));
                    match target {
                        Some(member) if restorative_applies(effect, member, config) => Ok(()),
                        Some(member) => Err(ActionRejection::ItemHasNoEffect {
                            item: item.name.clone(),
                            target: member.species_name.clone(),
                        }),
                        None => Err(ActionRejection::ItemHasNoEffect {
                            item: item.name.clone(),
                            target: roster.player_name.clone(),
                        }),
                    }
                }
            }
        }
        PlayerAction::SwitchActiveCombatant(index) => {
            let member = roster
                .member(*index)
                .ok_or(ActionRejection::InvalidRosterIndex(*index))?;
            if *index == roster.active_index {
                return Err(ActionRejection::AlreadyActive {
                    name: member.species_name.clone(),
                });
            }
            if member.is_fainted() {
                return Err(ActionRejection::CombatantFainted {
                    name: member.species_name.clone(),
                });
            }
            Ok(())
        }
    }
}

/// Revive items go to the first fainted member, everything else to the
/// active one.
fn item_target(effect: &ItemEffect, roster: &BattlePlayerRoster) -> Option<usize> {
    match effect {
        ItemEffect::Revive { .. } => roster.first_fainted_index(),
        _ => Some(roster.active_index),
    }
}

/// Resolves one full turn for `action`.
///
/// The player acts first. Attacks, failed catches and failed flees are
/// answered by the enemy; items and switches are not. A turn that does not
/// end the battle finishes with both sides' end-of-turn effects, player
/// first. `Err` means the battle state can no longer be trusted.
pub fn resolve_turn(
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    action: PlayerAction,
    data: &GameData,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<TurnResolution> {
    let active = roster
        .active()
        .ok_or(BattleError::MissingActiveCombatant(roster.active_index))?;
    if active.is_fainted() && !session.is_terminal() {
        return Err(BattleError::InconsistentState(format!(
            "active combatant {} is fainted at turn start",
            active.species_name
        )));
    }

    if let Err(rejection) = validate_player_action(session, roster, &action, data, config) {
        tracing::warn!(kind = ?rejection.kind(), "{}", rejection.message());
        bus.push(BattleEvent::ActionRejected {
            rejection: rejection.clone(),
        });
        return Ok(TurnResolution::Rejected(rejection));
    }

    session.turn_counter += 1;
    bus.push(BattleEvent::TurnStarted {
        turn_number: session.turn_counter,
    });
    session.pending_action = Some(action.clone());
    set_phase(session, TurnPhase::PlayerActionResolving);

    let step = match action {
        PlayerAction::Attack(slot) => resolve_attack(slot, session, roster, data, config, rng, bus)?,
        PlayerAction::Catch(ball) => resolve_catch(ball, session, roster, data, config, rng, bus)?,
        PlayerAction::Flee => resolve_flee(session, roster, config, rng, bus)?,
        PlayerAction::UseItem(slot) => resolve_item(slot, roster, config, bus)?,
        PlayerAction::SwitchActiveCombatant(index) => resolve_switch(index, roster, bus)?,
    };

    let end = match step {
        PlayerStep::Finished(end) => Some(end),
        PlayerStep::EnemyActs => match enemy_phase(session, roster, data, config, rng, bus)? {
            Some(end) => Some(end),
            None => turn_end_phase(session, roster, bus)?,
        },
        PlayerStep::SkipEnemy => turn_end_phase(session, roster, bus)?,
    };

    session.pending_action = None;
    match end {
        Some(end) => {
            set_phase(session, TurnPhase::Terminal(end));
            tracing::info!(result = ?end, turn = session.turn_counter, "battle finished");
            Ok(TurnResolution::Finished(end))
        }
        None => {
            set_phase(session, TurnPhase::AwaitingPlayerAction);
            Ok(TurnResolution::Continue)
        }
    }
}

fn set_phase(session: &mut BattleSession, phase: TurnPhase) {
    tracing::debug!(from = ?session.phase, to = ?phase, "phase");
    session.phase = phase;
}

fn active_level(roster: &BattlePlayerRoster) -> BattleResult<u32> {
    roster
        .active()
        .map(|c| c.level)
        .ok_or(BattleError::MissingActiveCombatant(roster.active_index))
}

fn resolve_attack(
    slot: usize,
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    data: &GameData,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<PlayerStep> {
    let active_index = roster.active_index;
    let skill_name = roster
        .active()
        .and_then(|c| c.moves().get(slot))
        .cloned()
        .ok_or_else(|| BattleError::InconsistentState(format!("move slot {} vanished", slot)))?;
    let skill = data.skills.lookup(&skill_name)?;

    let outcome = use_skill(
        skill,
        active_index,
        roster.team_mut(),
        &mut session.enemy,
        Side::Player,
        config,
        rng,
        bus,
    )?;
    set_phase(session, TurnPhase::DamageOrEffectApplied);

    if let SkillOutcome::Resolved { primary } = outcome {
        let attacker = roster
            .member_mut(active_index)
            .ok_or(BattleError::MissingActiveCombatant(active_index))?;
        award_combat_sp(skill, primary, attacker, &mut session.enemy, config, bus);
    }

    set_phase(session, TurnPhase::EnemyDefeatCheck);
    if session.enemy.is_fainted() {
        return Ok(PlayerStep::Finished(BattleEnd::PlayerVictory));
    }
    Ok(PlayerStep::EnemyActs)
}

fn resolve_catch(
    ball: BallType,
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    data: &GameData,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<PlayerStep> {
    let player_level = active_level(roster)?;
    if !roster.consume_ball(ball) {
        return Err(BattleError::InconsistentState(format!("no {} left after validation", ball)));
    }
    bus.push(BattleEvent::CatchAttempted {
        ball,
        target: session.enemy.species_name.clone(),
    });
    set_phase(session, TurnPhase::CaptureResolving);

    if !attempt_capture(ball, &session.enemy, player_level, config, rng) {
        bus.push(BattleEvent::CatchFailed {
            target: session.enemy.species_name.clone(),
        });
        return Ok(PlayerStep::EnemyActs);
    }

    let recruit = data
        .species
        .create_combatant(&session.enemy.species_name, session.enemy.level)?;
    roster
        .add_member(recruit)
        .map_err(|_| BattleError::InconsistentState("roster filled up during capture".to_string()))?;
    bus.push(BattleEvent::CatchSucceeded {
        target: session.enemy.species_name.clone(),
    });
    Ok(PlayerStep::Finished(BattleEnd::CaptureSuccess))
}

fn resolve_flee(
    session: &mut BattleSession,
    roster: &BattlePlayerRoster,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<PlayerStep> {
    let player_level = active_level(roster)?;
    let chance = calculate_flee_chance(session.category, player_level, session.enemy.level, config);
    tracing::debug!(chance, "flee attempt");
    if roll_flee_success(chance, rng) {
        bus.push(BattleEvent::FleeSucceeded);
        Ok(PlayerStep::Finished(BattleEnd::FleeSuccess))
    } else {
        bus.push(BattleEvent::FleeFailed);
        Ok(PlayerStep::EnemyActs)
    }
}

fn resolve_item(
    slot: usize,
    roster: &mut BattlePlayerRoster,
    config: &BattleConfig,
    bus: &mut EventBus,
) -> BattleResult<PlayerStep> {
    let item = roster
        .inventory
        .get(slot)
        .cloned()
        .ok_or_else(|| BattleError::InconsistentState(format!("inventory slot {} vanished", slot)))?;

    match &item.effect {
        ItemEffect::CaptureBalls { count } => add_balls(roster, &item.name, BallType::Normal, *count, bus),
        ItemEffect::MasterBalls { count } => add_balls(roster, &item.name, BallType::Master, *count, bus),
        effect => {
            let index = item_target(effect, roster).ok_or_else(|| {
                BattleError::InconsistentState(format!("{} lost its target", item.name))
            })?;
            let member = roster
                .member_mut(index)
                .ok_or(BattleError::MissingActiveCombatant(index))?;
            bus.push(BattleEvent::ItemUsed {
                item: item.name.clone(),
                target: member.species_name.clone(),
            });
            let event = match apply_restorative(&item.name, effect, member, config)? {
                ItemUseOutcome::Healed { target, amount, new_hp } => {
                    BattleEvent::Healed { target, amount, new_hp }
                }
                ItemUseOutcome::SpRestored { target, amount, new_sp } => {
                    BattleEvent::SpRestored { target, amount, new_sp }
                }
                ItemUseOutcome::MaxSpExtended { target, new_max } => {
                    BattleEvent::MaxSpExtended { target, new_max }
                }
                ItemUseOutcome::Revived { target, hp } => BattleEvent::Revived { target, hp },
                other => {
                    return Err(BattleError::InconsistentState(format!(
                        "unexpected in-battle item outcome {:?}",
                        other
                    )))
                }
            };
            bus.push(event);
        }
    }

    roster.inventory.remove(slot);
    Ok(PlayerStep::SkipEnemy)
}

fn add_balls(roster: &mut BattlePlayerRoster, item: &str, ball: BallType, count: u32, bus: &mut EventBus) {
    let total = roster.add_balls(ball, count);
    bus.push(BattleEvent::ItemUsed {
        item: item.to_string(),
        target: roster.player_name.clone(),
    });
    bus.push(BattleEvent::BallsReceived { ball, count, total });
}

fn resolve_switch(
    index: usize,
    roster: &mut BattlePlayerRoster,
    bus: &mut EventBus,
) -> BattleResult<PlayerStep> {
    let old = roster
        .active()
        .map(|c| c.species_name.clone())
        .ok_or(BattleError::MissingActiveCombatant(roster.active_index))?;
    let new = roster
        .member(index)
        .map(|c| c.species_name.clone())
        .ok_or(BattleError::MissingActiveCombatant(index))?;
    roster.active_index = index;
    bus.push(BattleEvent::CombatantSwitched {
        old,
        new,
        forced: false,
    });
    Ok(PlayerStep::SkipEnemy)
}

/// The enemy casts a uniformly random move from its list at the active
/// player combatant. An unaffordable pick fails for SP and wastes the turn.
fn enemy_phase(
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    data: &GameData,
    config: &BattleConfig,
    rng: &mut TurnRng,
    bus: &mut EventBus,
) -> BattleResult<Option<BattleEnd>> {
    set_phase(session, TurnPhase::EnemyActionResolving);

    match choose_enemy_skill(&session.enemy, rng) {
        Some(slot) => {
            let name = session
                .enemy
                .moves()
                .get(slot)
                .cloned()
                .ok_or_else(|| BattleError::InconsistentState(format!("enemy move slot {}", slot)))?;
            let skill = data.skills.lookup(&name)?;
            let active_index = roster.active_index;
            let target = roster
                .active_mut()
                .ok_or(BattleError::MissingActiveCombatant(active_index))?;

            let outcome = use_skill(
                skill,
                0,
                std::slice::from_mut(&mut session.enemy),
                target,
                Side::Enemy,
                config,
                rng,
                bus,
            )?;
            if let SkillOutcome::Resolved { primary } = outcome {
                award_combat_sp(skill, primary, &mut session.enemy, target, config, bus);
            }
        }
        None => tracing::debug!(enemy = %session.enemy.species_name, "enemy has no moves"),
    }

    set_phase(session, TurnPhase::PlayerDefeatCheck);
    Ok(player_defeat_check(roster, bus))
}

/// Replaces a fainted active combatant with the first living teammate, or
/// reports the defeat when nobody is left.
fn player_defeat_check(roster: &mut BattlePlayerRoster, bus: &mut EventBus) -> Option<BattleEnd> {
    let Some(active) = roster.active() else {
        return Some(BattleEnd::PlayerDefeat);
    };
    if !active.is_fainted() {
        return None;
    }
    let old = active.species_name.clone();
    match roster.first_living_index() {
        Some(next) => {
            roster.active_index = next;
            let new = roster.team()[next].species_name.clone();
            tracing::debug!(old = %old, new = %new, "forced switch");
            bus.push(BattleEvent::CombatantSwitched {
                old,
                new,
                forced: true,
            });
            None
        }
        None => Some(BattleEnd::PlayerDefeat),
    }
}

/// Counters advance, then ongoing effects tick for the player side and the
/// enemy side in that order.
fn turn_end_phase(
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    bus: &mut EventBus,
) -> BattleResult<Option<BattleEnd>> {
    set_phase(session, TurnPhase::TurnEndEffects);

    let active_index = roster.active_index;
    let player: &mut Combatant = roster
        .active_mut()
        .ok_or(BattleError::MissingActiveCombatant(active_index))?;
    player.battle_turn_counter += 1;
    session.enemy.battle_turn_counter += 1;

    player.apply_status_effects_for_turn(&mut session.enemy, Side::Player, bus);
    session.enemy.apply_status_effects_for_turn(player, Side::Enemy, bus);

    if session.enemy.is_fainted() {
        return Ok(Some(BattleEnd::PlayerVictory));
    }
    if let Some(end) = player_defeat_check(roster, bus) {
        return Ok(Some(end));
    }

    bus.push(BattleEvent::TurnEnded);
    Ok(None)
}
