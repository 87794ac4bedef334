//! Core types shared across the combat engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for an entity taking part in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier for a skill definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub String);

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        SkillId(s.to_string())
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        SkillId(s)
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six base attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Physical attack
    Str,
    /// Defense and HP
    Vit,
    /// Movement and attack speed
    Agi,
    /// Critical chance and cast speed
    Dex,
    /// Skill power and SP
    Int,
    /// Luck
    Luk,
}

impl Stat {
    /// Get all attributes
    pub fn all() -> &'static [Stat] {
        &[Stat::Str, Stat::Vit, Stat::Agi, Stat::Dex, Stat::Int, Stat::Luk]
    }
}

/// Attack/defense element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Wind,
    Earth,
    #[default]
    Neutral,
}

/// Equipment slot an item occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Weapon,
    Armor,
    Helmet,
    Gloves,
    Boots,
    Accessory,
    Card,
}

impl EquipmentSlot {
    /// Get all equipment slots
    pub fn all() -> &'static [EquipmentSlot] {
        &[
            EquipmentSlot::Weapon,
            EquipmentSlot::Armor,
            EquipmentSlot::Helmet,
            EquipmentSlot::Gloves,
            EquipmentSlot::Boots,
            EquipmentSlot::Accessory,
            EquipmentSlot::Card,
        ]
    }

    /// Number of items the slot can hold at once
    pub fn capacity(self) -> usize {
        match self {
            EquipmentSlot::Accessory => 2,
            EquipmentSlot::Card => 4,
            _ => 1,
        }
    }

    /// Whether the slot holds an ordered list rather than a single item
    pub fn is_multi(self) -> bool {
        self.capacity() > 1
    }
}

/// Weapon family, used by skill weapon requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Sword,
    Dagger,
    Axe,
    Spear,
    Bow,
    Staff,
    Mace,
}

/// Character job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    #[default]
    Novice,
    Swordsman,
    Mage,
}

/// What a skill does when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Damage,
    Heal,
    Buff,
}
