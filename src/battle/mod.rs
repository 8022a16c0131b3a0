pub mod ai;
pub mod calculators;
pub mod catch;
pub mod controller;
pub mod engine;
pub mod skill_effects;
pub mod state;

#[cfg(test)]
mod tests;
