use crate::battle::engine::{resolve_turn, TurnResolution};
use crate::battle::state::{BattleCategory, BattleEvent, BattleSession, EventBus, Side, TurnRng};
use crate::combatant::Combatant;
use crate::config::BattleConfig;
use crate::game_data::{parse_boss_table, GameData};
use crate::items::ItemCatalog;
use crate::player::{BattlePlayerRoster, PlayerAction};
use crate::skill_data::SkillCatalog;
use crate::species::SpeciesCatalog;

// Small catalogs with round numbers. At level 10:
//   Striker, Medic, Bruiser: 30 HP, 50 attack, 20 defense
//   Dummy: 30 HP, 9 attack, 20 defense
// so Strike deals 50 - 20/2 = 40 and Jab deals 15 - 10 = 5 to any of them.
// None of the skills carry attribute tags or crit chances, which keeps the
// scripted rng free for the draws a test actually cares about.
const TEST_SKILLS: &str = r#"
#![enable(implicit_some)]
[
    (
        name: "Strike",
        category: DirectDamage,
        power: 100,
        effect: DirectDamage((base_damage_percentage: 1.0)),
    ),
    (
        name: "Jab",
        category: DirectDamage,
        power: 30,
        effect: DirectDamage((base_damage_percentage: 0.3)),
    ),
    (
        name: "Poison Memo",
        category: ContinuousDamage,
        effect: DamageOverTime((dot_damage: 6, turns: 3)),
    ),
    (
        name: "Cheer",
        category: DirectHeal,
        effect: DirectHeal((heal_percentage: 0.5)),
    ),
    (
        name: "Shrug",
        category: SelfBuff,
        effect: SelfBuff((attack_multiplier: 1.0, defense_multiplier: 1.0, turns: 1)),
    ),
    (
        name: "Slam",
        category: DirectDamage,
        effect: DirectDamage((flat_damage: 999)),
    ),
    (
        name: "Second Wind",
        category: Revive,
        sp_cost: 20,
        effect: Revive((revive_hp_percentage: 0.5)),
    ),
    (
        name: "Last Stand",
        category: SelfBuff,
        sp_cost: 50,
        effect: TeamSacrificeRevival((delayed_heal_turns: 2)),
        battle_unique: true,
    ),
    (
        name: "Long Game",
        category: Special,
        sp_cost: 60,
        effect: DelayedUltimate((
            attack_multiplier: 1.5,
            defense_multiplier: 1.0,
            turns: 3,
            delayed_damage_percentage: 1.0,
            delayed_turns: 2,
        )),
    ),
    (
        name: "Big Finish",
        category: SpecialAttack,
        sp_cost: 50,
        effect: SpecialAttack((base_damage: 25)),
    ),
]
"#;

const TEST_SPECIES: &str = r#"
#![enable(implicit_some)]
[
    (
        name: "Striker",
        growth_curve: MediumFast,
        base_stats: (hp: 50, attack: 225, defense: 75),
        skills: ["Strike", "Jab", "Poison Memo", "Cheer"],
        wild: false,
    ),
    (
        name: "Medic",
        growth_curve: MediumFast,
        base_stats: (hp: 50, attack: 225, defense: 75),
        skills: ["Second Wind", "Last Stand", "Long Game", "Big Finish"],
        wild: false,
    ),
    (
        name: "Dummy",
        growth_curve: MediumFast,
        base_stats: (hp: 50, attack: 20, defense: 75),
        skills: ["Shrug"],
    ),
    (
        name: "Bruiser",
        growth_curve: MediumFast,
        base_stats: (hp: 50, attack: 225, defense: 75),
        skills: ["Slam"],
        wild: false,
    ),
    (
        name: "Rookie",
        growth_curve: MediumFast,
        base_stats: (hp: 40, attack: 40, defense: 40),
        skills: ["Jab"],
        evolution: (evolves_into: "Veteran", method: Level(5)),
        wild: false,
    ),
    (
        name: "Veteran",
        growth_curve: MediumFast,
        base_stats: (hp: 60, attack: 240, defense: 80),
        skills: ["Strike", "Jab"],
        wild: false,
    ),
]
"#;

const TEST_ITEMS: &str = r#"
[
    (
        name: "Potion",
        effect: HealHp(amount: 30),
        price: 50,
        rarity: Common,
        droppable: true,
    ),
    (
        name: "Revive",
        effect: Revive(hp_percentage: 0.5),
        price: 300,
        rarity: Rare,
        droppable: true,
    ),
    (
        name: "Capture Ball Pack",
        effect: CaptureBalls(count: 3),
        price: 100,
        rarity: Common,
    ),
]
"#;

const TEST_BOSSES: &str = r#"
#![enable(implicit_some)]
(
    bosses: [
        (
            species: "Dummy",
            level: 10,
            tier: MiniBoss,
            reward: (companion: "Rookie", items: ["Potion"], currency: 100),
        ),
        (
            species: "Bruiser",
            level: 12,
            tier: StageBoss,
            stage: 0,
            reward: (items: ["Revive"], currency: 500),
        ),
    ],
)
"#;

/// The inline test catalogs, cross-checked the same way the shipped data is.
pub fn test_catalogs() -> GameData {
    let build = || -> crate::errors::CatalogResult<GameData> {
        GameData::new(
            SkillCatalog::from_ron_str(TEST_SKILLS)?,
            SpeciesCatalog::from_ron_str(TEST_SPECIES)?,
            ItemCatalog::from_ron_str(TEST_ITEMS)?,
            parse_boss_table(TEST_BOSSES)?,
        )
    };
    match build() {
        Ok(data) => data,
        Err(err) => panic!("Failed to load test catalogs: {}", err),
    }
}

/// A rng that hands out exactly `outcomes`, then neutral 0.5 draws.
pub fn scripted_rng(outcomes: &[f64]) -> TurnRng {
    TurnRng::new_for_test(outcomes.to_vec())
}

/// A builder for test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let striker = TestCombatantBuilder::new("Striker", 10)
///     .with_hp(12)
///     .with_sp(40)
///     .build(&data);
/// ```
pub struct TestCombatantBuilder {
    species: String,
    level: u32,
    hp: Option<u32>,
    sp: Option<u32>,
    moves: Option<Vec<String>>,
}

impl TestCombatantBuilder {
    pub fn new(species: &str, level: u32) -> Self {
        Self {
            species: species.to_string(),
            level,
            hp: None,
            sp: None,
            moves: None,
        }
    }

    /// Current HP; 0 builds a fainted combatant. Defaults to max.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_sp(mut self, sp: u32) -> Self {
        self.sp = Some(sp);
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn build(self, data: &GameData) -> Combatant {
        let mut combatant = match data.species.create_combatant(&self.species, self.level) {
            Ok(combatant) => combatant,
            Err(err) => panic!("Failed to create {} for a test: {}", self.species, err),
        };
        if let Some(hp) = self.hp {
            combatant.set_hp(hp);
        }
        if let Some(sp) = self.sp {
            combatant.set_sp(sp);
        }
        if let Some(moves) = self.moves {
            combatant.set_moves(&moves);
        }
        combatant
    }
}

pub fn test_roster(team: Vec<Combatant>) -> BattlePlayerRoster {
    BattlePlayerRoster::new("Tester", team)
}

pub fn wild_session(enemy: Combatant) -> BattleSession {
    BattleSession::new(BattleCategory::Wild, enemy, None)
}

/// Runs one turn with the default config and hands back the resolution and
/// the events it produced.
pub fn run_turn(
    session: &mut BattleSession,
    roster: &mut BattlePlayerRoster,
    action: PlayerAction,
    data: &GameData,
    rng: &mut TurnRng,
) -> (TurnResolution, Vec<BattleEvent>) {
    let mut bus = EventBus::new();
    let config = BattleConfig::default();
    match resolve_turn(session, roster, action, data, &config, rng, &mut bus) {
        Ok(resolution) => (resolution, bus.into_events()),
        Err(err) => panic!("turn failed: {}", err),
    }
}

pub fn enemy_acted(events: &[BattleEvent]) -> bool {
    events
        .iter()
        .any(|e| matches!(e, BattleEvent::SkillUsed { side: Side::Enemy, .. }))
}
