//! Item - Equippable gear definitions

use crate::types::{EquipmentSlot, Job, Stat, WeaponType};
use serde::{Deserialize, Serialize};

/// A single attribute bonus granted by an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: Stat,
    pub value: f64,
}

/// An equippable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub slot: EquipmentSlot,
    /// Weapon family, only meaningful for the weapon slot
    #[serde(default)]
    pub weapon_type: Option<WeaponType>,
    #[serde(default)]
    pub required_job: Option<Job>,
    #[serde(default)]
    pub required_level: u32,
    #[serde(default)]
    pub stats: Vec<StatBonus>,
}

impl Item {
    /// Create an item with no requirements or bonuses
    pub fn new(id: impl Into<String>, name: impl Into<String>, slot: EquipmentSlot) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            slot,
            weapon_type: None,
            required_job: None,
            required_level: 0,
            stats: Vec::new(),
        }
    }

    /// Create a weapon of the given family
    pub fn weapon(id: impl Into<String>, name: impl Into<String>, weapon_type: WeaponType) -> Self {
        Item {
            weapon_type: Some(weapon_type),
            ..Item::new(id, name, EquipmentSlot::Weapon)
        }
    }

    /// Add a stat bonus
    pub fn with_stat(mut self, stat: Stat, value: f64) -> Self {
        self.stats.push(StatBonus { stat, value });
        self
    }

    pub fn with_required_job(mut self, job: Job) -> Self {
        self.required_job = Some(job);
        self
    }

    pub fn with_required_level(mut self, level: u32) -> Self {
        self.required_level = level;
        self
    }

    /// Whether a character of `job` may wear this item
    pub fn allows_job(&self, job: Job) -> bool {
        self.required_job.map_or(true, |required| required == job)
    }
}
