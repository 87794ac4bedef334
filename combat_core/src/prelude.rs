//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::{BaseAttributes, StatBlock, StatValue, TimedBuff};
pub use crate::types::{Element, EntityId, EquipmentSlot, Job, SkillId, SkillKind, Stat, WeaponType};

// Characters
pub use crate::character::{Character, CharacterConfig, EnemyProfile, EntityKind, LifeState, Position};
pub use crate::equipment::{EquipError, Item};

// Combat
pub use crate::battle::{AttackOutcome, Battle, BattleEvent, CastEffect};
pub use crate::damage::{DamageOutcome, SkillStrike};
pub use crate::element::ElementTable;
pub use crate::error::{CombatError, ProgressionError};

// Skills
pub use crate::skill::{BuffSpec, CastState, OnHitEffect, Skill, SkillEffects, SkillLibrary, StandardEffects};

// Config
pub use crate::config::{default_skills, GameConstants};
