//! combat_core - Combat resolution and character progression for an action RPG
//!
//! This library provides:
//! - StatBlock: Layered attributes with cached HP/SP caps
//! - EquipmentLedger: Reversible per-item stat contributions
//! - Damage formula: Pure hit calculation with combo, crit and element terms
//! - Skill casting: SP cost, cooldowns and delayed resolution
//! - Area effects: Radius-bounded damage over time
//! - Progression: Experience, level-ups, death penalty, jobs and rage
//! - Battle: The session context tying it all to one simulation clock

pub mod area;
pub mod battle;
pub mod character;
pub mod clock;
pub mod combo;
pub mod config;
pub mod damage;
pub mod element;
pub mod equipment;
pub mod error;
pub mod prelude;
pub mod progression;
pub mod skill;
pub mod stat_block;
pub mod types;

// Re-export core types for convenience
pub use area::{AreaEffect, AreaEffectRegistry, AreaHit};
pub use battle::{AttackOutcome, Battle, BattleEvent, CastEffect, Roster};
pub use character::{Character, CharacterConfig, EntityKind, LifeState, Position};
pub use combo::{ComboHit, ComboTracker};
pub use config::{default_skills, ConfigError, GameConstants};
pub use damage::{calculate_damage, roll_critical, DamageInput, DamageOutcome};
pub use element::ElementTable;
pub use equipment::{EquipError, EquipmentLedger, Item};
pub use error::{CombatError, ProgressionError};
pub use skill::{ActiveCast, CastState, CooldownRegistry, Skill, SkillCastController, SkillLibrary};
pub use stat_block::{StatBlock, StatValue, TimedBuff};
pub use types::{Element, EntityId, EquipmentSlot, Job, SkillId, SkillKind, Stat, WeaponType};
