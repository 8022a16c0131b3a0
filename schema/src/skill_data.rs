use crate::AttributeTag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter};

/// Skills at or above this SP cost count as ultimates for loot and learning.
pub const ULTIMATE_SP_THRESHOLD: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum SkillCategory {
    DirectDamage,
    ContinuousDamage,
    DirectHeal,
    ContinuousHeal,
    SelfBuff,
    EnemyDebuff,
    TeamBuff,
    TeamDebuff,
    TeamHeal,
    SpecialAttack,
    MultiHit,
    Revive,
    MixedBuffDebuff,
    HotDot,
    Special,
    DirectAttack,
}

impl SkillCategory {
    /// Categories whose damage feeds the SP economy (attacker and defender both gain SP).
    pub fn grants_sp(self) -> bool {
        matches!(
            self,
            SkillCategory::DirectDamage
                | SkillCategory::ContinuousDamage
                | SkillCategory::SpecialAttack
                | SkillCategory::MultiHit
                | SkillCategory::DirectAttack
        )
    }
}

/// A stat modifier the caster may inflict on itself as a drawback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfDebuff {
    pub chance: f64,
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub turns: u32,
}

impl Default for SelfDebuff {
    fn default() -> Self {
        Self {
            chance: 0.0,
            attack_multiplier: 1.0,
            defense_multiplier: 1.0,
            turns: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectDamageParams {
    pub base_damage_percentage: Option<f64>,
    pub damage_percentage_min: Option<f64>,
    pub damage_percentage_max: Option<f64>,
    /// Flat base damage used instead of a percentage of attack.
    pub flat_damage: Option<u32>,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub current_hp_damage_percentage: Option<f64>,
    pub self_debuff: Option<SelfDebuff>,
    /// Lowers the target's defense by this fraction for `enemy_defense_debuff_turns`.
    pub enemy_defense_debuff: Option<f64>,
    pub enemy_defense_debuff_turns: u32,
    /// Flat recoil applied to the caster; never lethal.
    pub self_damage: u32,
}

impl Default for DirectDamageParams {
    fn default() -> Self {
        Self {
            base_damage_percentage: None,
            damage_percentage_min: None,
            damage_percentage_max: None,
            flat_damage: None,
            crit_chance: 0.0,
            crit_multiplier: 1.5,
            current_hp_damage_percentage: None,
            self_debuff: None,
            enemy_defense_debuff: None,
            enemy_defense_debuff_turns: 3,
            self_damage: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageOverTimeParams {
    pub dot_percentage: Option<f64>,
    pub dot_damage: Option<u32>,
    pub turns: u32,
    pub paralyze_chance: f64,
    pub petrify_chance: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealParams {
    pub heal_percentage: f64,
    pub turns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatChangeParams {
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub turns: u32,
}

impl Default for StatChangeParams {
    fn default() -> Self {
        Self {
            attack_multiplier: 1.0,
            defense_multiplier: 1.0,
            turns: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyDebuffParams {
    pub target_attack_multiplier: f64,
    pub target_defense_multiplier: f64,
    pub turns: u32,
    pub direct_damage: u32,
    pub charm_chance: f64,
}

impl Default for EnemyDebuffParams {
    fn default() -> Self {
        Self {
            target_attack_multiplier: 1.0,
            target_defense_multiplier: 1.0,
            turns: 1,
            direct_damage: 0,
            charm_chance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamBuffParams {
    pub team_attack_multiplier: f64,
    pub team_defense_multiplier: f64,
    pub turns: u32,
    /// Fraction of each living ally's max HP paid on cast.
    pub team_hp_cost: f64,
}

impl Default for TeamBuffParams {
    fn default() -> Self {
        Self {
            team_attack_multiplier: 1.0,
            team_defense_multiplier: 1.0,
            turns: 1,
            team_hp_cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamDebuffParams {
    pub direct_damage: u32,
    pub target_attack_multiplier: f64,
    pub turns: u32,
}

impl Default for TeamDebuffParams {
    fn default() -> Self {
        Self {
            direct_damage: 0,
            target_attack_multiplier: 1.0,
            turns: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamHealParams {
    pub team_heal_percentage: f64,
    pub turns: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialAttackParams {
    pub execute_threshold: f64,
    pub base_damage: u32,
    pub ignore_defense_damage_min: u32,
    pub ignore_defense_damage_max: u32,
    /// Fraction of the caster's current HP paid on cast; leaves at least 1 HP.
    pub self_hp_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiHitParams {
    pub hit_count: u32,
    pub damage_percentage: f64,
    pub bonus_damage_chance: f64,
    pub bonus_damage_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviveParams {
    pub revive_hp_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedBuffDebuffParams {
    pub self_attack_multiplier: f64,
    pub self_defense_multiplier: f64,
    pub target_attack_multiplier: f64,
    pub target_defense_multiplier: f64,
    pub turns: u32,
}

impl Default for MixedBuffDebuffParams {
    fn default() -> Self {
        Self {
            self_attack_multiplier: 1.0,
            self_defense_multiplier: 1.0,
            target_attack_multiplier: 1.0,
            target_defense_multiplier: 1.0,
            turns: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotDotParams {
    pub heal_percentage: f64,
    pub dot_percentage: f64,
    pub turns: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSacrificeParams {
    /// Attack bonus granted to every ally for the rest of the battle.
    pub ally_attack_buff: f64,
    pub caster_attack_multiplier: f64,
    pub delayed_heal_turns: u32,
    pub delayed_heal_percentage: f64,
}

impl Default for TeamSacrificeParams {
    fn default() -> Self {
        Self {
            ally_attack_buff: 0.2,
            caster_attack_multiplier: 2.0,
            delayed_heal_turns: 4,
            delayed_heal_percentage: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayedUltimateParams {
    pub attack_multiplier: f64,
    pub defense_multiplier: f64,
    pub turns: u32,
    pub delayed_damage_percentage: f64,
    pub delayed_turns: u32,
    /// The caster drops to 0 HP when the delayed hit lands.
    pub self_sacrifice: bool,
}

impl Default for DelayedUltimateParams {
    fn default() -> Self {
        Self {
            attack_multiplier: 1.0,
            defense_multiplier: 1.0,
            turns: 1,
            delayed_damage_percentage: 0.0,
            delayed_turns: 1,
            self_sacrifice: false,
        }
    }
}

/// Effect payload of a skill. One variant per category, plus the two named
/// combo skills which get their own variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SkillEffect {
    DirectDamage(DirectDamageParams),
    DamageOverTime(DamageOverTimeParams),
    DirectHeal(HealParams),
    HealOverTime(HealParams),
    SelfBuff(StatChangeParams),
    EnemyDebuff(EnemyDebuffParams),
    TeamBuff(TeamBuffParams),
    TeamDebuff(TeamDebuffParams),
    TeamHeal(TeamHealParams),
    SpecialAttack(SpecialAttackParams),
    MultiHit(MultiHitParams),
    Revive(ReviveParams),
    MixedBuffDebuff(MixedBuffDebuffParams),
    HotDot(HotDotParams),
    TeamSacrificeRevival(TeamSacrificeParams),
    DelayedUltimate(DelayedUltimateParams),
    /// Generic move driven only by the skill's `power`.
    PowerAttack,
}

impl SkillEffect {
    /// Whether this payload may be declared under `category`.
    pub fn fits_category(&self, category: SkillCategory) -> bool {
        use SkillCategory as C;
        match self {
            SkillEffect::DirectDamage(_) => matches!(category, C::DirectDamage | C::DirectAttack),
            SkillEffect::DamageOverTime(_) => category == C::ContinuousDamage,
            SkillEffect::DirectHeal(_) => category == C::DirectHeal,
            SkillEffect::HealOverTime(_) => category == C::ContinuousHeal,
            SkillEffect::SelfBuff(_) => category == C::SelfBuff,
            SkillEffect::EnemyDebuff(_) => category == C::EnemyDebuff,
            SkillEffect::TeamBuff(_) => category == C::TeamBuff,
            SkillEffect::TeamDebuff(_) => category == C::TeamDebuff,
            SkillEffect::TeamHeal(_) => category == C::TeamHeal,
            SkillEffect::SpecialAttack(_) => category == C::SpecialAttack,
            SkillEffect::MultiHit(_) => category == C::MultiHit,
            SkillEffect::Revive(_) => category == C::Revive,
            SkillEffect::MixedBuffDebuff(_) => category == C::MixedBuffDebuff,
            SkillEffect::HotDot(_) => category == C::HotDot,
            SkillEffect::TeamSacrificeRevival(_) => category == C::SelfBuff,
            SkillEffect::DelayedUltimate(_) => matches!(category, C::Special | C::SpecialAttack),
            SkillEffect::PowerAttack => matches!(category, C::Special | C::DirectAttack),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub attribute_tags: BTreeSet<AttributeTag>,
    #[serde(default)]
    pub sp_cost: u32,
    #[serde(default)]
    pub power: u32,
    pub effect: SkillEffect,
    /// May only be used once per battle by each combatant.
    #[serde(default)]
    pub battle_unique: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub flavor_quote: String,
}

impl SkillDefinition {
    pub fn is_ultimate(&self) -> bool {
        self.sp_cost >= ULTIMATE_SP_THRESHOLD
    }
}
