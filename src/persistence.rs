//! Save shapes for the roster, handed to whatever stores them.
//!
//! Two encodings of the same snapshot: compact `postcard` bytes for save
//! slots and pretty JSON for inspection.

use crate::errors::PersistenceError;
use crate::player::BattlePlayerRoster;
use serde::{Deserialize, Serialize};

/// Bumped whenever the snapshot layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RosterSnapshot {
    pub version: u32,
    pub roster: BattlePlayerRoster,
}

impl RosterSnapshot {
    pub fn capture(roster: &BattlePlayerRoster) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            roster: roster.clone(),
        }
    }

    pub fn into_roster(self) -> BattlePlayerRoster {
        self.roster
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        postcard::to_allocvec(self).map_err(|e| PersistenceError::Binary(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PersistenceError> {
        let snapshot: Self =
            postcard::from_bytes(bytes).map_err(|e| PersistenceError::Binary(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(source: &str) -> Result<Self, PersistenceError> {
        let snapshot: Self = serde_json::from_str(source)?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, PersistenceError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}
