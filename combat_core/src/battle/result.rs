//! Attack outcomes and the battle event log

use crate::damage::DamageOutcome;
use crate::types::{EntityId, SkillId};
use serde::{Deserialize, Serialize};

/// Result of one attack landing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: EntityId,
    pub target: EntityId,
    pub damage: DamageOutcome,
    /// Target HP before the hit
    pub hp_before: f64,
    pub hp_after: f64,
    /// Whether this was a killing blow
    pub target_downed: bool,
}

impl AttackOutcome {
    pub fn damage(&self) -> f64 {
        self.damage.damage
    }

    pub fn is_critical(&self) -> bool {
        self.damage.is_critical
    }

    pub fn is_combo(&self) -> bool {
        self.damage.is_combo
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut text = format!("{} hits {}: {}", self.attacker, self.target, self.damage.summary());
        if self.target_downed {
            text.push_str(", FATAL");
        }
        text
    }
}

/// What a resolved cast did
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CastEffect {
    Damage(AttackOutcome),
    Heal { amount: f64 },
    Buff { applied: bool },
}

/// Something that happened during the battle, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    AttackLanded(AttackOutcome),
    CastStarted {
        caster: EntityId,
        target: EntityId,
        skill: SkillId,
        resolve_at: f64,
    },
    CastResolved {
        caster: EntityId,
        target: EntityId,
        skill: SkillId,
        effect: CastEffect,
    },
    /// Target gone or downed at resolve time; nothing refunded
    CastWasted {
        caster: EntityId,
        target: EntityId,
        skill: SkillId,
    },
    CastCancelled { caster: EntityId, skill: SkillId },
    AreaSpawned { area: u64, owner: Option<EntityId> },
    AreaHit {
        area: u64,
        target: EntityId,
        damage: f64,
    },
    AreaExpired { area: u64 },
    ComboReset,
    BuffExpired { entity: EntityId, buff_id: String },
    Downed {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    ExperienceGained { entity: EntityId, amount: u64 },
    LevelUp { entity: EntityId, level: u32 },
    Berserk { entity: EntityId },
    Revived { entity: EntityId },
    /// Removed from the roster; the spawner decides about a replacement
    Despawned { entity: EntityId },
}

impl BattleEvent {
    /// Get a summary string
    pub fn summary(&self) -> String {
        match self {
            BattleEvent::AttackLanded(outcome) => outcome.summary(),
            BattleEvent::CastStarted {
                caster,
                target,
                skill,
                resolve_at,
            } => format!("{caster} starts casting {skill} on {target} (resolves at {resolve_at:.2}s)"),
            BattleEvent::CastResolved {
                caster,
                skill,
                effect,
                ..
            } => match effect {
                CastEffect::Damage(outcome) => format!("{caster}'s {skill}: {}", outcome.summary()),
                CastEffect::Heal { amount } => format!("{caster}'s {skill} heals {amount:.1}"),
                CastEffect::Buff { applied: true } => format!("{caster}'s {skill} takes effect"),
                CastEffect::Buff { applied: false } => format!("{caster}'s {skill} has no effect"),
            },
            BattleEvent::CastWasted {
                caster,
                target,
                skill,
            } => format!("{caster}'s {skill} fizzles, {target} is gone"),
            BattleEvent::CastCancelled { caster, skill } => format!("{caster}'s {skill} is interrupted"),
            BattleEvent::AreaSpawned { area, .. } => format!("area {area} appears"),
            BattleEvent::AreaHit { area, target, damage } => {
                format!("area {area} burns {target} for {damage:.1}")
            }
            BattleEvent::AreaExpired { area } => format!("area {area} fades"),
            BattleEvent::ComboReset => "combo reset".to_string(),
            BattleEvent::BuffExpired { entity, buff_id } => format!("{buff_id} wears off {entity}"),
            BattleEvent::Downed { entity, killer } => match killer {
                Some(killer) => format!("{entity} is downed by {killer}"),
                None => format!("{entity} is downed"),
            },
            BattleEvent::ExperienceGained { entity, amount } => format!("{entity} gains {amount} exp"),
            BattleEvent::LevelUp { entity, level } => format!("{entity} reaches level {level}"),
            BattleEvent::Berserk { entity } => format!("{entity} goes berserk"),
            BattleEvent::Revived { entity } => format!("{entity} is back on their feet"),
            BattleEvent::Despawned { entity } => format!("{entity} despawns"),
        }
    }
}
