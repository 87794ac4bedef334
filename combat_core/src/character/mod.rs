//! Character - A combat participant owning its stats and equipment

mod profile;

pub use profile::{AiProfile, EnemyProfile, EntityKind, NpcProfile};

use crate::config::ProgressionConstants;
use crate::equipment::{EquipError, EquipmentLedger, Item};
use crate::stat_block::{BaseAttributes, StatBlock};
use crate::types::{Element, EntityId, EquipmentSlot, Job, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Distance under which movement counts as arrived
const ARRIVAL_DISTANCE: f64 = 5.0;

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Whether a character can currently act and be targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    /// Died; waiting on the external revive/despawn policy
    Downed,
}

/// Creation parameters, every field optional in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub kind: EntityKind,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience: u64,
    #[serde(default)]
    pub gold: u64,
    #[serde(default)]
    pub stats: BaseAttributes,
    #[serde(default)]
    pub job: Job,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub skill_points: u32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        CharacterConfig {
            name: default_name(),
            kind: EntityKind::default(),
            level: default_level(),
            experience: 0,
            gold: 0,
            stats: BaseAttributes::default(),
            job: Job::default(),
            element: Element::default(),
            position: Position::default(),
            skill_points: 0,
        }
    }
}

fn default_name() -> String {
    "Unknown".to_string()
}
fn default_level() -> u32 {
    1
}

/// A player, enemy or NPC taking part in combat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Assigned by the roster on spawn
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    pub level: u32,
    pub experience: u64,
    pub gold: u64,
    pub job: Job,
    pub element: Element,
    pub position: Position,
    pub move_target: Option<Position>,
    pub stats: StatBlock,
    pub equipment: EquipmentLedger,
    pub is_attacking: bool,
    /// Current target; a lookup key, not ownership
    pub target: Option<EntityId>,
    pub rage: u32,
    pub life_state: LifeState,
    pub skill_levels: HashMap<SkillId, u32>,
    pub skill_points: u32,
}

impl Character {
    /// Create a character from configuration with full HP/SP
    pub fn from_config(config: CharacterConfig, progression: &ProgressionConstants) -> Self {
        let level = config.level.max(1);
        Character {
            id: EntityId(0),
            name: config.name,
            kind: config.kind,
            level,
            experience: config.experience,
            gold: config.gold,
            job: config.job,
            element: config.element,
            position: config.position,
            move_target: None,
            stats: StatBlock::new(&config.stats, level, progression),
            equipment: EquipmentLedger::new(),
            is_attacking: false,
            target: None,
            rage: 0,
            life_state: LifeState::Alive,
            skill_levels: HashMap::new(),
            skill_points: config.skill_points,
        }
    }

    /// Create a default player with the given name
    pub fn named(name: impl Into<String>, progression: &ProgressionConstants) -> Self {
        let config = CharacterConfig {
            name: name.into(),
            ..CharacterConfig::default()
        };
        Self::from_config(config, progression)
    }

    pub fn is_alive(&self) -> bool {
        self.life_state == LifeState::Alive
    }

    /// Recompute max HP/SP after attributes changed
    pub fn recompute_caps(&mut self, progression: &ProgressionConstants) {
        self.stats.derive_caps(self.level, progression);
    }

    /// Subtract HP; returns true if this hit took the character from alive to zero HP
    pub fn take_damage(&mut self, amount: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.stats.take_damage(amount)
    }

    // === Equipment ===

    /// Equip an item and refresh caps
    pub fn equip(&mut self, item: Item, progression: &ProgressionConstants) -> Result<usize, EquipError> {
        let index = self.equipment.equip(item, self.job, self.level, &mut self.stats)?;
        self.recompute_caps(progression);
        Ok(index)
    }

    /// Unequip an item and refresh caps
    pub fn unequip(
        &mut self,
        slot: EquipmentSlot,
        index: Option<usize>,
        progression: &ProgressionConstants,
    ) -> Result<Item, EquipError> {
        let item = self.equipment.unequip(slot, index, &mut self.stats)?;
        self.recompute_caps(progression);
        Ok(item)
    }

    // === Skills ===

    /// Learned level of a skill (1 if never raised)
    pub fn skill_level(&self, skill: &SkillId) -> u32 {
        self.skill_levels.get(skill).copied().unwrap_or(1)
    }

    // === Movement ===

    /// Start moving toward a point
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.move_target = Some(Position::new(x, y));
    }

    pub fn is_moving(&self) -> bool {
        self.move_target.is_some()
    }

    /// Step toward the movement target, stopping once close enough
    pub fn advance_movement(&mut self, delta: f64) {
        let Some(target) = self.move_target else {
            return;
        };
        let distance = self.position.distance_to(&target);
        if distance <= ARRIVAL_DISTANCE {
            self.move_target = None;
            return;
        }
        let step = (self.stats.move_speed() * delta).min(distance);
        self.position.x += (target.x - self.position.x) / distance * step;
        self.position.y += (target.y - self.position.y) / distance * step;
    }
}
