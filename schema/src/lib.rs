// Crewmon Schema - Shared type definitions
// This crate holds the serializable data definitions used by the catalogs
// (skills, species, items, bosses) and by persisted combatant state.

pub use attributes::*;
pub use boss_data::*;
pub use item_data::*;
pub use skill_data::*;
pub use species_data::*;

pub mod attributes;
pub mod boss_data;
pub mod item_data;
pub mod skill_data;
pub mod species_data;
