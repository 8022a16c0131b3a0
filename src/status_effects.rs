use serde::{Deserialize, Serialize};

/// A per-turn damage or heal registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuousEffect {
    pub amount_per_turn: u32,
    pub turns_remaining: u32,
    pub source_name: String,
    pub caster: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelayedEffectKind {
    Damage,
    Heal,
    /// Drops the caster to 0 HP.
    SelfSacrifice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTarget {
    Caster,
    /// Whoever is the caster's opponent when the effect fires.
    Opponent,
}

/// Scheduled on the caster; fires once the caster's battle turn counter
/// reaches `trigger_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedEffect {
    pub kind: DelayedEffectKind,
    pub value: u32,
    pub trigger_turn: u32,
    pub source_name: String,
    pub caster: String,
    pub target: EffectTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierSource {
    SelfCast,
    Enemy,
    Team,
}

/// The single attack/defense modifier slot. `turns_remaining: None` lasts
/// until the battle ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub turns_remaining: Option<u32>,
    pub source_name: String,
    pub source: ModifierSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub continuous_damage: Vec<ContinuousEffect>,
    pub continuous_heal: Vec<ContinuousEffect>,
    pub delayed_effects: Vec<DelayedEffect>,
    pub stat_modifier: Option<StatModifier>,
}

impl StatusEffects {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.continuous_damage.is_empty()
            && self.continuous_heal.is_empty()
            && self.delayed_effects.is_empty()
            && self.stat_modifier.is_none()
    }

    /// Replaces whatever modifier was active. Modifiers never stack.
    pub fn set_modifier(&mut self, modifier: StatModifier) -> Option<StatModifier> {
        self.stat_modifier.replace(modifier)
    }

    pub fn attack_multiplier(&self) -> f64 {
        self.stat_modifier
            .as_ref()
            .map_or(1.0, |m| m.attack_multiplier)
    }

    pub fn defense_multiplier(&self) -> f64 {
        self.stat_modifier
            .as_ref()
            .map_or(1.0, |m| m.defense_multiplier)
    }

    /// Removes and returns the delayed effects due at `turn`, keeping the rest
    /// in their original order.
    pub fn take_due_delayed(&mut self, turn: u32) -> Vec<DelayedEffect> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.delayed_effects)
            .into_iter()
            .partition(|effect| effect.trigger_turn <= turn);
        self.delayed_effects = pending;
        due
    }
}
