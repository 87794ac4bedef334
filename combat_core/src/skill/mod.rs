//! Skills - definitions, cooldowns, delayed casting and side effects

mod cast;
mod cooldown;
mod effects;

pub use cast::{ActiveCast, CastState, SkillCastController};
pub use cooldown::CooldownRegistry;
pub use effects::{EffectContext, SkillEffects, StandardEffects};

use crate::damage::SkillStrike;
use crate::stat_block::BuffModifier;
use crate::types::{Element, SkillId, SkillKind, WeaponType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Side effect a damaging skill applies once it lands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OnHitEffect {
    /// Leave a burning zone at the target's position
    AreaBurn {
        radius: f64,
        damage_per_second: f64,
        duration: f64,
    },
    /// Remove SP from the target
    SpDrain { amount: f64 },
}

/// Attribute multipliers a buff skill grants, and for how long
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    #[serde(default)]
    pub modifiers: Vec<BuffModifier>,
    pub duration: f64,
}

/// Immutable skill definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub kind: SkillKind,
    /// Power at skill level 1
    pub power: f64,
    /// Power gained per skill level above 1
    #[serde(default)]
    pub power_per_level: f64,
    #[serde(default)]
    pub sp_cost: f64,
    /// Base cast time in seconds, before DEX reduction
    #[serde(default)]
    pub cast_time: f64,
    #[serde(default)]
    pub cooldown: f64,
    #[serde(default)]
    pub required_weapon: Option<WeaponType>,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub on_hit: Option<OnHitEffect>,
    #[serde(default)]
    pub buff: Option<BuffSpec>,
}

impl Skill {
    /// Create an instant, free skill
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>, kind: SkillKind, power: f64) -> Self {
        Skill {
            id: id.into(),
            name: name.into(),
            kind,
            power,
            power_per_level: 0.0,
            sp_cost: 0.0,
            cast_time: 0.0,
            cooldown: 0.0,
            required_weapon: None,
            element: None,
            on_hit: None,
            buff: None,
        }
    }

    pub fn with_power_per_level(mut self, power_per_level: f64) -> Self {
        self.power_per_level = power_per_level;
        self
    }

    pub fn with_sp_cost(mut self, sp_cost: f64) -> Self {
        self.sp_cost = sp_cost;
        self
    }

    pub fn with_cast_time(mut self, cast_time: f64) -> Self {
        self.cast_time = cast_time;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f64) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_required_weapon(mut self, weapon: WeaponType) -> Self {
        self.required_weapon = Some(weapon);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_on_hit(mut self, effect: OnHitEffect) -> Self {
        self.on_hit = Some(effect);
        self
    }

    pub fn with_buff(mut self, buff: BuffSpec) -> Self {
        self.buff = Some(buff);
        self
    }

    /// Effective power at a learned skill level
    pub fn power_at(&self, level: u32) -> f64 {
        self.power + self.power_per_level * level.saturating_sub(1) as f64
    }

    /// The damage formula's view of this skill at a given level
    pub fn strike(&self, level: u32) -> SkillStrike {
        SkillStrike {
            power: self.power_at(level),
            element: self.element,
        }
    }
}

/// Registry of skill definitions by id
#[derive(Debug, Clone, Default)]
pub struct SkillLibrary {
    skills: HashMap<SkillId, Skill>,
}

impl SkillLibrary {
    pub fn new() -> Self {
        SkillLibrary {
            skills: HashMap::new(),
        }
    }

    /// Skills bundled with the crate
    pub fn with_defaults() -> Self {
        crate::config::default_skills()
    }

    /// Register a skill, replacing any previous definition with the same id
    pub fn register(&mut self, skill: Skill) {
        self.skills.insert(skill.id.clone(), skill);
    }

    pub fn get(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.get(id)
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.skills.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }
}

impl FromIterator<Skill> for SkillLibrary {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        let mut library = SkillLibrary::new();
        for skill in iter {
            library.register(skill);
        }
        library
    }
}
