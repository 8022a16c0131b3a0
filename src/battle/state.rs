use crate::combatant::Combatant;
use crate::player::{BallType, PlayerAction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::BossEntry;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleCategory {
    Wild,
    MiniBoss,
    StageBoss,
}

impl BattleCategory {
    pub fn is_boss(self) -> bool {
        !matches!(self, BattleCategory::Wild)
    }
}

impl fmt::Display for BattleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BattleCategory::Wild => "wild",
            BattleCategory::MiniBoss => "mini-boss",
            BattleCategory::StageBoss => "stage boss",
        };
        write!(f, "{}", name)
    }
}

/// How a finished battle ended.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleEnd {
    PlayerVictory,
    PlayerDefeat,
    FleeSuccess,
    CaptureSuccess,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingPlayerAction,
    PlayerActionResolving,
    DamageOrEffectApplied,
    EnemyDefeatCheck,
    CaptureResolving,
    EnemyActionResolving,
    PlayerDefeatCheck,
    TurnEndEffects,
    Terminal(BattleEnd),
}

/// Flavour-only conditions some skills mention. They produce a log line and
/// nothing else.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusNote {
    Paralyzed,
    Petrified,
    Charmed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillFailure {
    NoFaintedAlly,
    AlreadyUsedThisBattle,
}

/// The four ways a player action can be turned away.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    UnknownSkill,
    InsufficientResource,
    InvalidTarget,
    IllegalActionForBattleCategory,
}

/// A refused player action. Nothing is mutated and no turn is consumed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ActionRejection {
    UnknownSkill { skill: String },
    InsufficientSp { skill: String, required: u32, available: u32 },
    NoCaptureBalls { ball: BallType },
    RosterFull,
    InvalidMoveSlot(usize),
    InvalidInventorySlot(usize),
    InvalidRosterIndex(usize),
    CombatantFainted { name: String },
    AlreadyActive { name: String },
    NoFaintedAlly { skill: String },
    ItemHasNoEffect { item: String, target: String },
    ItemNotUsableInBattle { item: String },
    SkillAlreadyUsed { skill: String },
    CatchInBossBattle { category: BattleCategory },
    NoBattleInProgress,
}

impl ActionRejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            ActionRejection::UnknownSkill { .. } => RejectionKind::UnknownSkill,
            ActionRejection::InsufficientSp { .. }
            | ActionRejection::NoCaptureBalls { .. }
            | ActionRejection::RosterFull => RejectionKind::InsufficientResource,
            ActionRejection::InvalidMoveSlot(_)
            | ActionRejection::InvalidInventorySlot(_)
            | ActionRejection::InvalidRosterIndex(_)
            | ActionRejection::CombatantFainted { .. }
            | ActionRejection::AlreadyActive { .. }
            | ActionRejection::NoFaintedAlly { .. }
            | ActionRejection::ItemHasNoEffect { .. } => RejectionKind::InvalidTarget,
            ActionRejection::ItemNotUsableInBattle { .. }
            | ActionRejection::SkillAlreadyUsed { .. }
            | ActionRejection::CatchInBossBattle { .. }
            | ActionRejection::NoBattleInProgress => RejectionKind::IllegalActionForBattleCategory,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ActionRejection::UnknownSkill { skill } => format!("{} is not a valid skill.", skill),
            ActionRejection::InsufficientSp { skill, required, available } => format!(
                "Not enough SP for {} ({}/{}).",
                skill, available, required
            ),
            ActionRejection::NoCaptureBalls { ball } => format!("You have no {}s left!", ball),
            ActionRejection::RosterFull => "Your team is full. There is no room for another member.".to_string(),
            ActionRejection::InvalidMoveSlot(index) => format!("There is no skill in slot {}.", index + 1),
            ActionRejection::InvalidInventorySlot(index) => format!("There is no item in slot {}.", index + 1),
            ActionRejection::InvalidRosterIndex(index) => format!("There is no team member in slot {}.", index + 1),
            ActionRejection::CombatantFainted { name } => format!("{} has fainted and cannot fight!", name),
            ActionRejection::AlreadyActive { name } => format!("{} is already in battle!", name),
            ActionRejection::NoFaintedAlly { skill } => format!("{} has no fainted ally to revive.", skill),
            ActionRejection::ItemHasNoEffect { item, target } => format!("{} would have no effect on {}.", item, target),
            ActionRejection::ItemNotUsableInBattle { item } => format!("{} can't be used during battle.", item),
            ActionRejection::SkillAlreadyUsed { skill } => format!("{} can only be used once per battle.", skill),
            ActionRejection::CatchInBossBattle { category } => {
                format!("You can't capture a {} opponent!", category)
            }
            ActionRejection::NoBattleInProgress => "There is no battle in progress.".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle and turn management
    BattleStarted {
        category: BattleCategory,
        enemy: String,
        level: u32,
    },
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded,
    BattleEnded {
        result: BattleEnd,
    },
    BattleAborted {
        reason: String,
    },

    // Skills
    SkillUsed {
        side: Side,
        user: String,
        skill: String,
    },
    SkillQuote {
        user: String,
        quote: String,
    },
    InsufficientSp {
        user: String,
        skill: String,
        required: u32,
        available: u32,
    },
    SkillFailed {
        user: String,
        skill: String,
        reason: SkillFailure,
    },
    CriticalHit {
        attacker: String,
    },
    TypeEffectiveness {
        multiplier: f64,
    },
    Executed {
        target: String,
    },
    StatusNoted {
        target: String,
        note: StatusNote,
    },

    // HP and SP
    DamageDealt {
        target: String,
        damage: u32,
        remaining_hp: u32,
    },
    Healed {
        target: String,
        amount: u32,
        new_hp: u32,
    },
    HpCost {
        target: String,
        amount: u32,
        remaining_hp: u32,
    },
    Fainted {
        side: Side,
        target: String,
    },
    Revived {
        target: String,
        hp: u32,
    },
    SpGained {
        target: String,
        amount: u32,
        new_sp: u32,
    },
    SpRestored {
        target: String,
        amount: u32,
        new_sp: u32,
    },
    MaxSpExtended {
        target: String,
        new_max: u32,
    },

    // Ongoing effects
    StatModifierApplied {
        target: String,
        source: String,
        attack_multiplier: f64,
        defense_multiplier: f64,
        turns: Option<u32>,
    },
    ContinuousDamageApplied {
        target: String,
        source: String,
        amount_per_turn: u32,
        turns: u32,
    },
    ContinuousHealApplied {
        target: String,
        source: String,
        amount_per_turn: u32,
        turns: u32,
    },
    ContinuousDamageTick {
        target: String,
        source: String,
        damage: u32,
        remaining_hp: u32,
    },
    ContinuousHealTick {
        target: String,
        source: String,
        amount: u32,
        new_hp: u32,
    },
    EffectExpired {
        target: String,
        source: String,
    },
    DelayedEffectScheduled {
        caster: String,
        source: String,
        trigger_turn: u32,
    },
    DelayedEffectTriggered {
        caster: String,
        source: String,
    },
    DelayedEffectFizzled {
        caster: String,
        source: String,
    },

    // Player actions
    ActionRejected {
        rejection: ActionRejection,
    },
    CatchAttempted {
        ball: BallType,
        target: String,
    },
    CatchSucceeded {
        target: String,
    },
    CatchFailed {
        target: String,
    },
    FleeSucceeded,
    FleeFailed,
    ItemUsed {
        item: String,
        target: String,
    },
    BallsReceived {
        ball: BallType,
        count: u32,
        total: u32,
    },
    CombatantSwitched {
        old: String,
        new: String,
        forced: bool,
    },

    // Rewards and progression
    ExperienceGained {
        target: String,
        amount: u64,
    },
    LevelUp {
        target: String,
        new_level: u32,
    },
    EvolutionReady {
        target: String,
        into: String,
    },
    Evolved {
        from: String,
        into: String,
    },
    LootDropped {
        item: String,
    },
    NoLoot {
        message: String,
    },
    ItemReceived {
        item: String,
    },
    CurrencyGained {
        amount: u32,
        total: u32,
    },
    CompanionJoined {
        species: String,
        level: u32,
    },
    CompanionTurnedAway {
        species: String,
    },
    StageAdvanced {
        new_stage: u32,
    },
    MiniBossDefeated {
        total: u32,
        stage_boss_unlocked: bool,
    },
    RefreshRequested,
    RecoveredAfterBattle {
        target: String,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Battle Management Events ===
            BattleEvent::BattleStarted { category, enemy, level } => Some(match category {
                BattleCategory::Wild => format!("A wild {} (Lv. {}) appeared!", enemy, level),
                BattleCategory::MiniBoss => format!("Mini-boss {} (Lv. {}) blocks the way!", enemy, level),
                BattleCategory::StageBoss => format!("Stage boss {} (Lv. {}) steps forward!", enemy, level),
            }),
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            BattleEvent::TurnEnded => None,
            BattleEvent::BattleEnded { result } => Some(
                match result {
                    BattleEnd::PlayerVictory => "You won the battle!",
                    BattleEnd::PlayerDefeat => "You have no one left who can fight. You lost the battle.",
                    BattleEnd::FleeSuccess => "The battle is over.",
                    BattleEnd::CaptureSuccess => "The battle is over.",
                }
                .to_string(),
            ),
            BattleEvent::BattleAborted { reason } => {
                Some(format!("The battle was interrupted: {}", reason))
            }

            // === Skill Events ===
            BattleEvent::SkillUsed { side, user, skill } => {
                Some(format!("{}{} used {}!", Self::side_prefix(*side), user, skill))
            }
            BattleEvent::SkillQuote { user, quote } => {
                if quote.is_empty() {
                    None
                } else {
                    Some(format!("{}: \"{}\"", user, quote))
                }
            }
            BattleEvent::InsufficientSp { user, skill, required, available } => Some(format!(
                "{} doesn't have enough SP for {} ({}/{}).",
                user, skill, available, required
            )),
            BattleEvent::SkillFailed { skill, reason, .. } => Some(match reason {
                SkillFailure::NoFaintedAlly => format!("{} failed: there is no one to revive.", skill),
                SkillFailure::AlreadyUsedThisBattle => {
                    format!("{} can only be used once per battle.", skill)
                }
            }),
            BattleEvent::CriticalHit { .. } => Some("A critical hit!".to_string()),
            BattleEvent::TypeEffectiveness { multiplier } => match *multiplier {
                m if m > 1.0 => Some("It's super effective!".to_string()),
                m if m < 1.0 => Some("It's not very effective...".to_string()),
                _ => None,
            },
            BattleEvent::Executed { target } => Some(format!("{} was finished off in one blow!", target)),
            BattleEvent::StatusNoted { target, note } => Some(match note {
                StatusNote::Paralyzed => format!("{} is paralyzed!", target),
                StatusNote::Petrified => format!("{} is petrified!", target),
                StatusNote::Charmed => format!("{} is charmed!", target),
            }),

            // === HP and SP Events ===
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::HpCost { target, amount, .. } => {
                Some(format!("{} paid {} HP!", target, amount))
            }
            BattleEvent::Fainted { side, target } => {
                Some(format!("{}{} fainted!", Self::side_prefix(*side), target))
            }
            BattleEvent::Revived { target, hp } => {
                Some(format!("{} was revived with {} HP!", target, hp))
            }
            BattleEvent::SpGained { .. } => None,
            BattleEvent::SpRestored { target, amount, .. } => {
                Some(format!("{} restored {} SP!", target, amount))
            }
            BattleEvent::MaxSpExtended { target, new_max } => {
                Some(format!("{}'s SP limit rose to {}!", target, new_max))
            }

            // === Ongoing Effect Events ===
            BattleEvent::StatModifierApplied {
                target,
                attack_multiplier,
                defense_multiplier,
                turns,
                ..
            } => {
                let changes = Self::format_stat_changes(*attack_multiplier, *defense_multiplier);
                Some(match turns {
                    Some(t) => format!("{}'s {} for {} turns!", target, changes, t),
                    None => format!("{}'s {} for the rest of the battle!", target, changes),
                })
            }
            BattleEvent::ContinuousDamageApplied { target, source, amount_per_turn, turns } => Some(format!(
                "{} will take {} damage from {} for {} turns.",
                target, amount_per_turn, source, turns
            )),
            BattleEvent::ContinuousHealApplied { target, source, amount_per_turn, turns } => Some(format!(
                "{} will recover {} HP from {} for {} turns.",
                target, amount_per_turn, source, turns
            )),
            BattleEvent::ContinuousDamageTick { target, source, damage, .. } => Some(format!(
                "{} is hurt by {}! ({} damage)",
                target, source, damage
            )),
            BattleEvent::ContinuousHealTick { target, source, amount, .. } => {
                Some(format!("{} recovered {} HP from {}.", target, amount, source))
            }
            BattleEvent::EffectExpired { target, source } => {
                Some(format!("{}'s {} wore off.", target, source))
            }
            BattleEvent::DelayedEffectScheduled { caster, source, .. } => {
                Some(format!("{} is preparing {}...", caster, source))
            }
            BattleEvent::DelayedEffectTriggered { caster, source } => {
                Some(format!("{}'s {} takes effect!", caster, source))
            }
            BattleEvent::DelayedEffectFizzled { caster, source } => {
                Some(format!("{}'s {} fizzled out.", caster, source))
            }

            // === Player Action Events ===
            BattleEvent::ActionRejected { rejection } => Some(rejection.message()),
            BattleEvent::CatchAttempted { ball, target } => {
                Some(format!("You threw a {} at {}!", ball, target))
            }
            BattleEvent::CatchSucceeded { target } => Some(format!("Gotcha! {} was caught!", target)),
            BattleEvent::CatchFailed { target } => Some(format!("Oh no! {} broke free!", target)),
            BattleEvent::FleeSucceeded => Some("Got away safely!".to_string()),
            BattleEvent::FleeFailed => Some("Couldn't get away!".to_string()),
            BattleEvent::ItemUsed { item, target } => Some(format!("Used {} on {}.", item, target)),
            BattleEvent::BallsReceived { ball, count, total } => {
                Some(format!("Received {} {}(s). You now have {}.", count, ball, total))
            }
            BattleEvent::CombatantSwitched { old, new, forced } => Some(if *forced {
                format!("{} can't continue. Go, {}!", old, new)
            } else {
                format!("Come back, {}! Go, {}!", old, new)
            }),

            // === Reward Events ===
            BattleEvent::ExperienceGained { target, amount } => {
                Some(format!("{} gained {} EXP!", target, amount))
            }
            BattleEvent::LevelUp { target, new_level } => {
                Some(format!("{} grew to level {}!", target, new_level))
            }
            BattleEvent::EvolutionReady { target, into } => {
                Some(format!("{} is ready to evolve into {}!", target, into))
            }
            BattleEvent::Evolved { from, into } => Some(format!("{} evolved into {}!", from, into)),
            BattleEvent::LootDropped { item } => Some(format!("The enemy dropped a {}!", item)),
            BattleEvent::NoLoot { message } => Some(message.clone()),
            BattleEvent::ItemReceived { item } => Some(format!("Received {}!", item)),
            BattleEvent::CurrencyGained { amount, .. } => Some(format!("Earned {} coins.", amount)),
            BattleEvent::CompanionJoined { species, level } => {
                Some(format!("{} (Lv. {}) joined your team!", species, level))
            }
            BattleEvent::CompanionTurnedAway { species } => Some(format!(
                "{} wanted to join, but your team is full.",
                species
            )),
            BattleEvent::StageAdvanced { new_stage } => {
                Some(format!("Stage {} is now open!", new_stage + 1))
            }
            BattleEvent::MiniBossDefeated { total, stage_boss_unlocked } => Some(if *stage_boss_unlocked {
                format!("Mini-bosses defeated: {}. The stage boss is waiting!", total)
            } else {
                format!("Mini-bosses defeated: {}.", total)
            }),
            BattleEvent::RefreshRequested => None,
            BattleEvent::RecoveredAfterBattle { target } => {
                Some(format!("{} came to with 1 HP.", target))
            }
        }
    }

    // --- Private Helper Functions ---

    fn side_prefix(side: Side) -> &'static str {
        match side {
            Side::Player => "",
            Side::Enemy => "Enemy ",
        }
    }

    fn format_stat_changes(attack: f64, defense: f64) -> String {
        fn describe(stat: &str, multiplier: f64) -> Option<String> {
            if multiplier > 1.0 {
                Some(format!("{} rose", stat))
            } else if multiplier < 1.0 {
                Some(format!("{} fell", stat))
            } else {
                None
            }
        }
        let parts: Vec<String> = [describe("attack", attack), describe("defense", defense)]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            "stats stayed the same".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

/// Event bus for collecting battle events during a turn.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Human-readable lines for every non-silent event.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted(VecDeque<f64>),
}

/// Every random draw in a battle goes through here, so a seed (or a scripted
/// list of draws in tests) fully determines the event log.
///
/// Draws are uniform in `[0, 1)`. `roll` skips the draw for chances of 0 or
/// below and 1 or above.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

/// Handed out once a scripted queue runs dry.
const NEUTRAL_OUTCOME: f64 = 0.5;

impl TurnRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted(outcomes.into()),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> f64 {
        let outcome = match &mut self.source {
            RngSource::Seeded(rng) => rng.random::<f64>(),
            RngSource::Scripted(queue) => match queue.pop_front() {
                Some(value) => value.clamp(0.0, 1.0 - f64::EPSILON),
                None => {
                    tracing::warn!(reason, "scripted rng exhausted, using neutral outcome");
                    NEUTRAL_OUTCOME
                }
            },
        };
        tracing::trace!(outcome, reason, "rng draw");
        outcome
    }

    pub fn roll(&mut self, chance: f64, reason: &str) -> bool {
        if chance <= 0.0 {
            return false;
        }
        if chance >= 1.0 {
            return true;
        }
        self.next_outcome(reason) < chance
    }

    pub fn range_f64(&mut self, min: f64, max: f64, reason: &str) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.next_outcome(reason)
    }

    /// Uniform integer in `min..=max`.
    pub fn range_u32(&mut self, min: u32, max: u32, reason: &str) -> u32 {
        if max <= min {
            return min;
        }
        let span = u64::from(max - min) + 1;
        let offset = (self.next_outcome(reason) * span as f64).floor() as u64;
        (u64::from(min) + offset).min(u64::from(max)) as u32
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    pub fn choose_index(&mut self, len: usize, reason: &str) -> usize {
        if len <= 1 {
            return 0;
        }
        let index = (self.next_outcome(reason) * len as f64).floor() as usize;
        index.min(len - 1)
    }
}

/// One battle in progress. The player roster lives with the controller and is
/// handed to the resolver alongside the session each turn.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BattleSession {
    pub category: BattleCategory,
    pub enemy: Combatant,
    /// Boss table entry the enemy was drawn from, if any.
    pub boss: Option<BossEntry>,
    pub turn_counter: u32,
    pub phase: TurnPhase,
    pub pending_action: Option<PlayerAction>,
    pub event_log: Vec<BattleEvent>,
}

impl BattleSession {
    pub fn new(category: BattleCategory, enemy: Combatant, boss: Option<BossEntry>) -> Self {
        Self {
            category,
            enemy,
            boss,
            turn_counter: 0,
            phase: TurnPhase::AwaitingPlayerAction,
            pending_action: None,
            event_log: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, TurnPhase::Terminal(_))
    }
}


#[cfg(test)]
mod rng_tests {
    use super::*;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = TurnRng::from_seed(42);
        let mut b = TurnRng::from_seed(42);
        for _ in 0..20 {
            assert_eq!(a.next_outcome("a"), b.next_outcome("b"));
        }
    }

    #[test]
    fn test_scripted_rng_replays_then_falls_back() {
        let mut rng = TurnRng::new_for_test(vec![0.1, 0.9]);
        assert_eq!(rng.next_outcome("first"), 0.1);
        assert_eq!(rng.next_outcome("second"), 0.9);
        assert_eq!(rng.next_outcome("exhausted"), NEUTRAL_OUTCOME);
    }

    #[test]
    fn test_roll_skips_draw_for_certain_outcomes() {
        let mut rng = TurnRng::new_for_test(vec![0.99]);
        assert!(rng.roll(1.0, "certain"));
        assert!(!rng.roll(0.0, "impossible"));
        // the scripted value is still unused
        assert!(!rng.roll(0.5, "coin"));
    }

    #[test]
    fn test_ranges_stay_in_bounds() {
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.999_999, 0.5]);
        assert_eq!(rng.range_u32(80, 140, "low"), 80);
        assert_eq!(rng.range_u32(80, 140, "high"), 140);
        assert_eq!(rng.choose_index(4, "mid"), 2);
    }

    #[test]
    fn test_full_width_range_does_not_overflow() {
        let mut rng = TurnRng::new_for_test(vec![0.0, 0.5, 0.999_999_999_99]);
        assert_eq!(rng.range_u32(0, u32::MAX, "low"), 0);
        assert_eq!(rng.range_u32(0, u32::MAX, "mid"), 1 << 31);
        assert_eq!(rng.range_u32(0, u32::MAX, "high"), u32::MAX);
    }
}
