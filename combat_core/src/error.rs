//! Recoverable combat and progression failures

use crate::equipment::EquipError;
use crate::types::{EntityId, Job, SkillId, WeaponType};
use thiserror::Error;

/// Why an attack or skill use was refused
///
/// Every variant is a normal outcome; nothing is retried automatically.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),
    #[error("no entity {0} in this battle")]
    UnknownEntity(EntityId),
    #[error("{entity} is downed and cannot act")]
    Incapacitated { entity: EntityId },
    #[error("{skill} is on cooldown for {remaining:.2}s")]
    OnCooldown { skill: SkillId, remaining: f64 },
    #[error("{skill} needs {required} SP, caster has {available}")]
    InsufficientResource {
        skill: SkillId,
        required: f64,
        available: f64,
    },
    #[error("{skill} requires a {required:?} weapon")]
    RequirementNotMet { skill: SkillId, required: WeaponType },
    #[error("{caster} is already casting")]
    CastInProgress { caster: EntityId },
    #[error("{caster} has no cast to interrupt")]
    NotCasting { caster: EntityId },
    #[error(transparent)]
    Equipment(#[from] EquipError),
}

/// Why a progression action was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgressionError {
    #[error("cannot change job from {from:?} to {to:?} at level {level}")]
    JobChangeUnavailable { from: Job, to: Job, level: u32 },
    #[error("no skill points available")]
    NoSkillPoints,
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),
    #[error("no entity {0} in this battle")]
    UnknownEntity(EntityId),
}
