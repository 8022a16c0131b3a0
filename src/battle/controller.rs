use crate::battle::ai::Behavior;
use crate::battle::engine::{resolve_turn, TurnResolution};
use crate::battle::state::{
    ActionRejection, BattleCategory, BattleEnd, BattleEvent, BattleSession, EventBus, TurnPhase,
    TurnRng,
};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::errors::{BattleError, BattleResult};
use crate::game_data::GameData;
use crate::player::{BattlePlayerRoster, PlayerAction};
use crate::progression::{perform_pending_evolutions, ItemUseOutcome, RewardCalculator, SkillBookOutcome};
use schema::{BossEntry, BossTier};
use serde::{Deserialize, Serialize};

/// What the overworld asks for when it triggers a fight.
#[derive(Debug, Clone)]
pub struct EncounterRequest {
    pub category: BattleCategory,
    /// Fight this combatant instead of drawing one.
    pub preset_enemy: Option<Combatant>,
    /// Level for a drawn wild enemy; the configured default otherwise.
    pub wild_level: Option<u32>,
}

impl EncounterRequest {
    pub fn wild() -> Self {
        Self {
            category: BattleCategory::Wild,
            preset_enemy: None,
            wild_level: None,
        }
    }

    pub fn mini_boss() -> Self {
        Self {
            category: BattleCategory::MiniBoss,
            preset_enemy: None,
            wild_level: None,
        }
    }

    pub fn stage_boss() -> Self {
        Self {
            category: BattleCategory::StageBoss,
            preset_enemy: None,
            wild_level: None,
        }
    }

    pub fn against(category: BattleCategory, enemy: Combatant) -> Self {
        Self {
            category,
            preset_enemy: Some(enemy),
            wild_level: None,
        }
    }
}

/// Final summary handed back once a battle is over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub result: BattleEnd,
    /// Experience granted to each living member.
    pub exp_gained: u64,
    pub leveled_up_roster: Vec<String>,
    pub evolution_messages: Vec<String>,
    pub loot_items: Vec<String>,
    pub currency_gained: u32,
    pub companion: Option<String>,
    pub stage_advanced: bool,
    pub stage_boss_unlocked: bool,
    pub map_refresh_requested: bool,
    pub shop_refresh_requested: bool,
    pub event_log: Vec<BattleEvent>,
}

impl BattleOutcome {
    fn new(result: BattleEnd) -> Self {
        Self {
            result,
            exp_gained: 0,
            leveled_up_roster: Vec::new(),
            evolution_messages: Vec::new(),
            loot_items: Vec::new(),
            currency_gained: 0,
            companion: None,
            stage_advanced: false,
            stage_boss_unlocked: false,
            map_refresh_requested: false,
            shop_refresh_requested: false,
            event_log: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnStatus {
    Continue,
    Rejected(ActionRejection),
    Finished(Box<BattleOutcome>),
    /// A fault ended the battle. The roster was put back the way it was
    /// when the turn started.
    Aborted,
}

/// Result of submitting one player action.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub events: Vec<BattleEvent>,
    pub status: TurnStatus,
}

impl TurnReport {
    pub fn is_finished(&self) -> bool {
        matches!(self.status, TurnStatus::Finished(_) | TurnStatus::Aborted)
    }

    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

/// Snapshot of the battle for UI queries.
#[derive(Debug, Clone)]
pub struct BattleInfo {
    pub category: BattleCategory,
    pub turn_number: u32,
    pub phase: TurnPhase,
    pub enemy_name: String,
    pub enemy_level: u32,
    pub enemy_hp: u32,
    pub enemy_max_hp: u32,
    pub active_name: String,
    pub active_hp: u32,
    pub active_max_hp: u32,
    pub active_sp: u32,
}

/// Owns the roster and at most one running battle. All catalogs and tuning
/// come in through the constructor.
#[derive(Debug)]
pub struct BattleController {
    roster: BattlePlayerRoster,
    data: GameData,
    config: BattleConfig,
    rng: TurnRng,
    session: Option<BattleSession>,
}

impl BattleController {
    pub fn new(roster: BattlePlayerRoster, data: GameData, config: BattleConfig, rng: TurnRng) -> Self {
        Self {
            roster,
            data,
            config,
            rng,
            session: None,
        }
    }

    pub fn roster(&self) -> &BattlePlayerRoster {
        &self.roster
    }

    /// Direct roster access is refused while a battle runs.
    pub fn roster_mut(&mut self) -> Option<&mut BattlePlayerRoster> {
        if self.session.is_some() {
            None
        } else {
            Some(&mut self.roster)
        }
    }

    pub fn into_roster(self) -> BattlePlayerRoster {
        self.roster
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    pub fn is_battle_active(&self) -> bool {
        self.session.is_some()
    }

    /// Everything logged so far in the running battle.
    pub fn event_log(&self) -> &[BattleEvent] {
        self.session.as_ref().map_or(&[], |s| s.event_log.as_slice())
    }

    pub fn battle_info(&self) -> Option<BattleInfo> {
        let session = self.session.as_ref()?;
        let active = self.roster.active()?;
        Some(BattleInfo {
            category: session.category,
            turn_number: session.turn_counter,
            phase: session.phase,
            enemy_name: session.enemy.species_name.clone(),
            enemy_level: session.enemy.level,
            enemy_hp: session.enemy.hp(),
            enemy_max_hp: session.enemy.max_hp(),
            active_name: active.species_name.clone(),
            active_hp: active.hp(),
            active_max_hp: active.max_hp(),
            active_sp: active.sp(),
        })
    }

    /// Opens a battle. Returns the opening events.
    pub fn start_battle(&mut self, request: EncounterRequest) -> BattleResult<Vec<BattleEvent>> {
        if self.session.is_some() {
            return Err(BattleError::SessionActive);
        }
        let lead = self
            .roster
            .battle_lead_index()
            .ok_or(BattleError::NoUsableCombatant)?;

        let (mut enemy, boss) = match request.preset_enemy {
            Some(enemy) => (enemy, None),
            None => self.draw_enemy(request.category, request.wild_level)?,
        };
        enemy.reset_battle_state();

        for member in self.roster.team_mut() {
            member.reset_battle_state();
        }
        self.roster.active_index = lead;

        let mut session = BattleSession::new(request.category, enemy, boss);
        let mut bus = EventBus::new();
        bus.push(BattleEvent::BattleStarted {
            category: session.category,
            enemy: session.enemy.species_name.clone(),
            level: session.enemy.level,
        });
        tracing::info!(
            category = %session.category,
            enemy = %session.enemy.species_name,
            level = session.enemy.level,
            "battle started"
        );

        let events = bus.into_events();
        session.event_log.extend(events.iter().cloned());
        self.session = Some(session);
        Ok(events)
    }

    fn draw_enemy(
        &mut self,
        category: BattleCategory,
        wild_level: Option<u32>,
    ) -> BattleResult<(Combatant, Option<BossEntry>)> {
        match category {
            BattleCategory::Wild => {
                let candidates = self.data.species.wild_species();
                if candidates.is_empty() {
                    return Err(BattleError::NoEnemyAvailable(category.to_string()));
                }
                let pick = candidates[self.rng.choose_index(candidates.len(), "wild species")];
                let level = wild_level.unwrap_or(self.config.default_wild_level);
                Ok((Combatant::new(pick, level), None))
            }
            BattleCategory::MiniBoss => {
                let entry = {
                    let candidates = self.data.bosses_of_tier(BossTier::MiniBoss);
                    if candidates.is_empty() {
                        return Err(BattleError::NoEnemyAvailable(category.to_string()));
                    }
                    candidates[self.rng.choose_index(candidates.len(), "mini-boss pick")].clone()
                };
                let enemy = self.data.species.create_combatant(&entry.species, entry.level)?;
                Ok((enemy, Some(entry)))
            }
            BattleCategory::StageBoss => {
                let entry = self
                    .data
                    .stage_boss(self.roster.stage)
                    .cloned()
                    .ok_or_else(|| BattleError::NoEnemyAvailable(category.to_string()))?;
                let enemy = self.data.species.create_combatant(&entry.species, entry.level)?;
                Ok((enemy, Some(entry)))
            }
        }
    }

    /// Resolves one player action. Faults never escape: the roster is
    /// restored, the battle is dropped and the report says `Aborted`.
    pub fn submit_player_action(&mut self, action: PlayerAction) -> TurnReport {
        let Some(mut session) = self.session.take() else {
            let rejection = ActionRejection::NoBattleInProgress;
            tracing::warn!("{}", rejection.message());
            return TurnReport {
                events: vec![BattleEvent::ActionRejected {
                    rejection: rejection.clone(),
                }],
                status: TurnStatus::Rejected(rejection),
            };
        };

        let snapshot = self.roster.clone();
        let mut bus = EventBus::new();
        tracing::debug!(?action, turn = session.turn_counter + 1, "player action submitted");

        let resolved = resolve_turn(
            &mut session,
            &mut self.roster,
            action,
            &self.data,
            &self.config,
            &mut self.rng,
            &mut bus,
        )
        .and_then(|resolution| match resolution {
            TurnResolution::Continue => Ok(TurnStatus::Continue),
            TurnResolution::Rejected(rejection) => Ok(TurnStatus::Rejected(rejection)),
            TurnResolution::Finished(end) => self
                .finish_battle(&session, end, &mut bus)
                .map(|outcome| TurnStatus::Finished(Box::new(outcome))),
        });

        match resolved {
            Ok(mut status) => {
                let events = bus.into_events();
                session.event_log.extend(events.iter().cloned());
                if let TurnStatus::Finished(outcome) = &mut status {
                    outcome.event_log = session.event_log;
                } else {
                    self.session = Some(session);
                }
                TurnReport { events, status }
            }
            Err(err) => {
                self.roster = snapshot;
                tracing::error!(error = %err, turn = session.turn_counter, "battle aborted");
                bus.push(BattleEvent::BattleAborted {
                    reason: err.to_string(),
                });
                TurnReport {
                    events: bus.into_events(),
                    status: TurnStatus::Aborted,
                }
            }
        }
    }

    /// Rewards, deferred evolutions and post-battle cleanup.
    fn finish_battle(
        &mut self,
        session: &BattleSession,
        end: BattleEnd,
        bus: &mut EventBus,
    ) -> BattleResult<BattleOutcome> {
        let mut outcome = BattleOutcome::new(end);

        if end == BattleEnd::PlayerVictory {
            let victor_level = self
                .roster
                .active()
                .map(|c| c.level)
                .ok_or(BattleError::MissingActiveCombatant(self.roster.active_index))?;
            let rewards = RewardCalculator::new(&self.config).resolve_victory(
                session.category,
                session.enemy.level,
                victor_level,
                session.boss.as_ref(),
                &mut self.roster,
                &self.data,
                &mut self.rng,
                bus,
            )?;
            outcome.exp_gained = rewards.exp_gained;
            outcome.leveled_up_roster = rewards.leveled_up;
            outcome.evolution_messages = rewards.evolution_messages;
            outcome.loot_items = rewards.loot_items;
            outcome.currency_gained = rewards.currency_gained;
            outcome.companion = rewards.companion;
            outcome.stage_advanced = rewards.stage_advanced;
            outcome.stage_boss_unlocked = rewards.stage_boss_unlocked;
        }

        for (from, into) in perform_pending_evolutions(self.roster.team_mut(), &self.data.species)? {
            outcome.evolution_messages.push(format!("{} evolved into {}!", from, into));
            bus.push(BattleEvent::Evolved { from, into });
        }

        for member in self.roster.team_mut() {
            member.reset_battle_state();
            if self.config.revive_fainted_after_battle && member.revive(1) {
                bus.push(BattleEvent::RecoveredAfterBattle {
                    target: member.species_name.clone(),
                });
            }
        }
        if let Some(lead) = self.roster.battle_lead_index() {
            self.roster.active_index = lead;
        }

        if end == BattleEnd::PlayerVictory && session.category.is_boss() {
            outcome.map_refresh_requested = true;
            outcome.shop_refresh_requested = true;
            bus.push(BattleEvent::RefreshRequested);
        }

        bus.push(BattleEvent::BattleEnded { result: end });
        tracing::info!(
            result = ?end,
            exp = outcome.exp_gained,
            loot = outcome.loot_items.len(),
            "battle closed"
        );
        Ok(outcome)
    }

    /// Lets `behavior` pick every player action until the battle ends or
    /// `max_turns` actions were submitted.
    pub fn run_with_autopilot(
        &mut self,
        behavior: &dyn Behavior,
        max_turns: u32,
    ) -> BattleResult<Option<BattleOutcome>> {
        let mut submitted = 0;
        while submitted < max_turns {
            let session = self.session.as_ref().ok_or(BattleError::NoSession)?;
            let action = behavior.decide_action(session, &self.roster, &self.data);
            let mut report = self.submit_player_action(action);
            if let TurnStatus::Rejected(_) = report.status {
                report = self.submit_player_action(PlayerAction::Flee);
            }
            submitted += 1;
            match report.status {
                TurnStatus::Finished(outcome) => return Ok(Some(*outcome)),
                TurnStatus::Aborted => {
                    return Err(BattleError::InconsistentState("battle aborted".to_string()))
                }
                TurnStatus::Continue | TurnStatus::Rejected(_) => {}
            }
        }
        Ok(None)
    }

    /// Uses an inventory item outside of battle.
    pub fn use_item(&mut self, slot: usize, member_index: usize) -> BattleResult<ItemUseOutcome> {
        if self.session.is_some() {
            return Err(BattleError::SessionActive);
        }
        Ok(self
            .roster
            .use_item(slot, member_index, &self.data, &self.config, &mut self.rng)?)
    }

    /// Answers a pending "forget which move?" prompt. `None` keeps every move.
    pub fn resolve_skill_forget(&mut self, slot: Option<usize>) -> BattleResult<SkillBookOutcome> {
        if self.session.is_some() {
            return Err(BattleError::SessionActive);
        }
        Ok(self.roster.resolve_forget(slot, &self.data.skills)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::GreedyAutopilot;
    use pretty_assertions::assert_eq;

    fn controller(seed: u64) -> BattleController {
        let data = GameData::embedded().unwrap();
        let lead = data.species.create_combatant("Intern", 8).unwrap();
        let roster = BattlePlayerRoster::new("Tester", vec![lead]);
        BattleController::new(roster, data, BattleConfig::default(), TurnRng::from_seed(seed))
    }

    #[test]
    fn test_start_battle_twice_is_refused() {
        let mut controller = controller(1);
        let events = controller.start_battle(EncounterRequest::wild()).unwrap();
        assert!(matches!(events[0], BattleEvent::BattleStarted { category: BattleCategory::Wild, .. }));
        assert_eq!(controller.start_battle(EncounterRequest::wild()), Err(BattleError::SessionActive));
    }

    #[test]
    fn test_action_without_battle_is_rejected() {
        let mut controller = controller(1);
        let report = controller.submit_player_action(PlayerAction::Flee);
        assert_eq!(report.status, TurnStatus::Rejected(ActionRejection::NoBattleInProgress));
    }

    #[test]
    fn test_start_without_living_member_fails() {
        let mut controller = controller(1);
        let roster = controller.roster_mut().unwrap();
        let hp = roster.team()[0].max_hp();
        roster.team_mut()[0].take_damage(hp);
        assert_eq!(
            controller.start_battle(EncounterRequest::wild()),
            Err(BattleError::NoUsableCombatant)
        );
    }

    #[test]
    fn test_mini_boss_is_drawn_from_boss_table() {
        let mut controller = controller(3);
        controller.start_battle(EncounterRequest::mini_boss()).unwrap();
        let session = controller.session().unwrap();
        let boss = session.boss.as_ref().unwrap();
        assert_eq!(boss.tier, BossTier::MiniBoss);
        assert_eq!(session.enemy.species_name, boss.species);
        assert_eq!(session.enemy.level, boss.level);
    }

    #[test]
    fn test_fault_aborts_and_restores_roster() {
        let mut controller = controller(5);
        controller.start_battle(EncounterRequest::wild()).unwrap();
        let before = controller.roster().clone();
        // An active index past the roster is a state no valid action can reach.
        controller.roster.active_index = 9;

        let report = controller.submit_player_action(PlayerAction::Attack(0));

        assert_eq!(report.status, TurnStatus::Aborted);
        assert!(matches!(report.events.last(), Some(BattleEvent::BattleAborted { .. })));
        assert!(!controller.is_battle_active());
        assert_eq!(controller.roster().team(), before.team());
    }

    #[test]
    fn test_autopilot_finishes_a_wild_battle() {
        let mut controller = controller(42);
        controller
            .start_battle(EncounterRequest {
                wild_level: Some(3),
                ..EncounterRequest::wild()
            })
            .unwrap();

        let outcome = controller
            .run_with_autopilot(&GreedyAutopilot::new(), 200)
            .unwrap()
            .unwrap();

        assert!(!controller.is_battle_active());
        assert!(matches!(outcome.event_log.first(), Some(BattleEvent::BattleStarted { .. })));
        assert_eq!(
            outcome.event_log.last(),
            Some(&BattleEvent::BattleEnded { result: outcome.result })
        );
        assert!(controller.roster().team().iter().all(|m| !m.is_fainted()));
        assert!(controller.roster().team().iter().all(|m| m.status.is_empty()));
    }
}
