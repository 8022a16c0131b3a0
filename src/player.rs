use crate::combatant::Combatant;
use crate::items::Inventory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A roster never holds more members than this.
pub const MAX_ROSTER_SIZE: usize = 6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallType {
    Normal,
    /// Always succeeds.
    Master,
}

impl fmt::Display for BallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallType::Normal => write!(f, "capture ball"),
            BallType::Master => write!(f, "master ball"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum PlayerAction {
    // Index into the active combatant's move list.
    Attack(usize),

    Catch(BallType),

    Flee,

    // Index into the inventory. Items target the active combatant, or the
    // first fainted member for revives.
    UseItem(usize),

    // Index into the roster.
    SwitchActiveCombatant(usize),
}

/// A skill book waiting for the player to pick which move to forget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingSkillLearning {
    pub member_index: usize,
    pub skill: String,
    /// Inventory slot of the book; consumed only once learning completes.
    pub book_slot: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlePlayerRoster {
    pub player_name: String,

    team: Vec<Combatant>,

    // Who leads into battle. Falls back to the first living member.
    pub default_active_index: usize,

    // Who is fighting right now.
    pub active_index: usize,

    pub capture_balls: u32,
    pub master_balls: u32,
    pub inventory: Inventory,
    pub currency: u32,

    // Progress counters fed by boss victories.
    pub stage: u32,
    pub mini_bosses_defeated: u32,

    pub pending_skill_learning: Option<PendingSkillLearning>,
}

impl BattlePlayerRoster {
    /// Create a roster; members past the size limit are dropped.
    pub fn new(player_name: impl Into<String>, team: Vec<Combatant>) -> Self {
        BattlePlayerRoster {
            player_name: player_name.into(),
            team: team.into_iter().take(MAX_ROSTER_SIZE).collect(),
            default_active_index: 0,
            active_index: 0,
            capture_balls: 0,
            master_balls: 0,
            inventory: Inventory::new(),
            currency: 0,
            stage: 0,
            mini_bosses_defeated: 0,
            pending_skill_learning: None,
        }
    }

    pub fn team(&self) -> &[Combatant] {
        &self.team
    }

    pub fn team_mut(&mut self) -> &mut [Combatant] {
        &mut self.team
    }

    pub fn member(&self, index: usize) -> Option<&Combatant> {
        self.team.get(index)
    }

    pub fn member_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.team.get_mut(index)
    }

    pub fn active(&self) -> Option<&Combatant> {
        self.team.get(self.active_index)
    }

    pub fn active_mut(&mut self) -> Option<&mut Combatant> {
        self.team.get_mut(self.active_index)
    }

    pub fn len(&self) -> usize {
        self.team.len()
    }

    pub fn is_empty(&self) -> bool {
        self.team.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.team.len() >= MAX_ROSTER_SIZE
    }

    /// Adds a member if there is room. Hands it back when the roster is full.
    pub fn add_member(&mut self, combatant: Combatant) -> Result<usize, Combatant> {
        if self.is_full() {
            return Err(combatant);
        }
        self.team.push(combatant);
        Ok(self.team.len() - 1)
    }

    pub fn has_living_member(&self) -> bool {
        self.team.iter().any(|c| !c.is_fainted())
    }

    pub fn first_living_index(&self) -> Option<usize> {
        self.team.iter().position(|c| !c.is_fainted())
    }

    pub fn first_fainted_index(&self) -> Option<usize> {
        self.team.iter().position(Combatant::is_fainted)
    }

    /// The default lead if it can fight, else the first member who can.
    pub fn battle_lead_index(&self) -> Option<usize> {
        match self.team.get(self.default_active_index) {
            Some(lead) if !lead.is_fainted() => Some(self.default_active_index),
            _ => self.first_living_index(),
        }
    }

    pub fn balls(&self, ball: BallType) -> u32 {
        match ball {
            BallType::Normal => self.capture_balls,
            BallType::Master => self.master_balls,
        }
    }

    /// Returns false when none are left.
    pub fn consume_ball(&mut self, ball: BallType) -> bool {
        let count = match ball {
            BallType::Normal => &mut self.capture_balls,
            BallType::Master => &mut self.master_balls,
        };
        if *count == 0 {
            return false;
        }
        *count -= 1;
        true
    }

    /// Returns the new total.
    pub fn add_balls(&mut self, ball: BallType, count: u32) -> u32 {
        let total = match ball {
            BallType::Normal => &mut self.capture_balls,
            BallType::Master => &mut self.master_balls,
        };
        *total = total.saturating_add(count);
        *total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::SpeciesCatalog;
    use pretty_assertions::assert_eq;

    fn roster(size: usize) -> BattlePlayerRoster {
        let species = SpeciesCatalog::embedded().unwrap();
        let team = (0..size)
            .map(|_| species.create_combatant("Intern", 5).unwrap())
            .collect();
        BattlePlayerRoster::new("Tester", team)
    }

    #[test]
    fn test_roster_is_capped_at_six() {
        let mut roster = roster(8);
        assert_eq!(roster.len(), MAX_ROSTER_SIZE);
        let extra = roster.team()[0].clone();
        assert!(roster.add_member(extra).is_err());
    }

    #[test]
    fn test_battle_lead_skips_fainted_default() {
        let mut roster = roster(3);
        roster.default_active_index = 1;
        let hp = roster.team()[1].max_hp();
        roster.team_mut()[1].take_damage(hp);
        let hp = roster.team()[0].max_hp();
        roster.team_mut()[0].take_damage(hp);

        assert_eq!(roster.battle_lead_index(), Some(2));
        assert_eq!(roster.first_fainted_index(), Some(0));
    }

    #[test]
    fn test_balls() {
        let mut roster = roster(1);
        assert!(!roster.consume_ball(BallType::Normal));
        assert_eq!(roster.add_balls(BallType::Normal, 3), 3);
        assert!(roster.consume_ball(BallType::Normal));
        assert_eq!(roster.balls(BallType::Normal), 2);
        assert_eq!(roster.balls(BallType::Master), 0);
    }
}
