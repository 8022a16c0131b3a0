//! Item registry and the player's inventory.

use crate::battle::state::TurnRng;
use crate::errors::{CatalogError, CatalogResult};
use schema::{ItemData, ItemEffect, ItemRarity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const EMBEDDED_ITEMS: &str = include_str!("../data/items.ron");

/// Display name prefix of generated skill books.
pub const SKILL_BOOK_PREFIX: &str = "Skill Book: ";

#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemData>,
    order: Vec<String>,
}

impl ItemCatalog {
    pub fn embedded() -> CatalogResult<Self> {
        Self::from_ron_str(EMBEDDED_ITEMS)
    }

    pub fn from_ron_str(source: &str) -> CatalogResult<Self> {
        let entries: Vec<ItemData> = ron::from_str(source).map_err(|e| CatalogError::Malformed {
            kind: "item",
            details: e.to_string(),
        })?;
        let mut catalog = Self::default();
        for item in entries {
            if catalog.items.contains_key(&item.name) {
                return Err(CatalogError::Duplicate {
                    kind: "item",
                    name: item.name,
                });
            }
            catalog.order.push(item.name.clone());
            catalog.items.insert(item.name.clone(), item);
        }
        tracing::debug!(count = catalog.order.len(), "item catalog loaded");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> CatalogResult<&ItemData> {
        self.items
            .get(name)
            .ok_or_else(|| CatalogError::UnknownItem(name.to_string()))
    }

    /// Items eligible as wild-battle loot, in load order.
    pub fn drop_pool(&self) -> Vec<&ItemData> {
        self.order
            .iter()
            .filter_map(|name| self.items.get(name))
            .filter(|item| item.droppable)
            .collect()
    }

    /// Picks one droppable item, weighted by rarity.
    pub fn roll_drop(&self, rng: &mut TurnRng) -> Option<ItemData> {
        let pool = self.drop_pool();
        let total: u32 = pool.iter().map(|item| item.rarity.drop_weight()).sum();
        if total == 0 {
            return None;
        }
        let mut pick = rng.next_outcome("loot rarity") * total as f64;
        for item in &pool {
            let weight = item.rarity.drop_weight() as f64;
            if pick < weight {
                return Some((*item).clone());
            }
            pick -= weight;
        }
        pool.last().map(|item| (*item).clone())
    }

    /// Builds the book item a blind box turns into.
    pub fn skill_book(skill: &str) -> ItemData {
        ItemData {
            name: format!("{}{}", SKILL_BOOK_PREFIX, skill),
            effect: ItemEffect::SkillBook {
                skill: skill.to_string(),
            },
            price: 0,
            rarity: ItemRarity::Epic,
            droppable: false,
            description: format!("Teaches {}.", skill),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Ordered bag of items. Duplicates occupy separate slots.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    slots: Vec<ItemData>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: ItemData) {
        self.slots.push(item);
    }

    pub fn get(&self, index: usize) -> Option<&ItemData> {
        self.slots.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<ItemData> {
        if index < self.slots.len() {
            Some(self.slots.remove(index))
        } else {
            None
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|item| item.name == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.slots.iter().filter(|item| item.name == name).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemData> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_roll_drop_walks_weights() {
        let catalog = ItemCatalog::embedded().unwrap();
        // First item in the pool is the common Potion.
        let mut rng = TurnRng::new_for_test(vec![0.0]);
        assert_eq!(catalog.roll_drop(&mut rng).map(|i| i.name), Some("Potion".to_string()));

        let mut rng = TurnRng::new_for_test(vec![0.999_999]);
        assert_eq!(
            catalog.roll_drop(&mut rng).map(|i| i.name),
            Some("Skill Blind Box".to_string())
        );
    }

    #[test]
    fn test_skill_book_naming() {
        let book = ItemCatalog::skill_book("Budget Axe");
        assert_eq!(book.name, "Skill Book: Budget Axe");
        assert!(!book.droppable);
    }

    #[test]
    fn test_inventory_slots() {
        let catalog = ItemCatalog::embedded().unwrap();
        let mut inventory = Inventory::new();
        inventory.add(catalog.get("Potion").unwrap().clone());
        inventory.add(catalog.get("Potion").unwrap().clone());
        inventory.add(catalog.get("SP Tonic").unwrap().clone());

        assert_eq!(inventory.count("Potion"), 2);
        assert_eq!(inventory.position("SP Tonic"), Some(2));
        assert_eq!(inventory.remove(0).map(|i| i.name), Some("Potion".to_string()));
        assert_eq!(inventory.len(), 2);
        assert!(inventory.remove(9).is_none());
    }
}
