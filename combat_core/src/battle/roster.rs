//! Roster - The active entity set of one battle

use crate::character::{Character, Position};
use crate::types::EntityId;
use std::collections::BTreeMap;

/// Characters in the battle, keyed by id in spawn order
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entities: BTreeMap<EntityId, Character>,
    next_id: u64,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character, assigning it a fresh id
    pub fn spawn(&mut self, mut character: Character) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        character.id = id;
        self.entities.insert(id, character);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Character> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Character> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.entities.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Character> {
        self.entities.values_mut()
    }

    /// Living characters within `radius` of `origin`
    pub fn within_radius(&self, origin: &Position, radius: f64) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|c| c.is_alive() && origin.distance_to(&c.position) <= radius)
            .map(|c| c.id)
            .collect()
    }
}
