//! SkillCastController - Validating, paying for and scheduling skill casts
//!
//! A cast moves through `Idle -> Validating -> Casting -> Resolved | Wasted | Cancelled`.
//! Validation is all-or-nothing: a refused cast leaves SP and cooldowns
//! untouched. Once a cast starts, its SP and cooldown are spent for good,
//! whether it resolves, gets wasted on a vanished target or is cancelled.

use super::{CooldownRegistry, Skill};
use crate::character::Character;
use crate::clock;
use crate::config::CombatConstants;
use crate::error::CombatError;
use crate::types::{EntityId, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Where a caster's most recent cast stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastState {
    #[default]
    Idle,
    /// Only observable while [`SkillCastController::start`] runs
    Validating,
    Casting,
    Resolved,
    /// Reached its resolve time with no valid target
    Wasted,
    Cancelled,
}

/// A cast that has been paid for and waits for its resolve time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveCast {
    pub caster: EntityId,
    pub target: EntityId,
    pub skill: SkillId,
    pub started_at: f64,
    pub resolve_at: f64,
    /// Start order, breaks ties between casts due at the same time
    pub seq: u64,
}

/// In-flight casts, at most one per caster
#[derive(Debug, Clone, Default)]
pub struct SkillCastController {
    pending: BTreeMap<EntityId, ActiveCast>,
    last_state: HashMap<EntityId, CastState>,
    next_seq: u64,
}

impl SkillCastController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and start a cast of `skill` by `caster` at time `now`
    ///
    /// Checks, in order: caster alive, no cast already pending, cooldown
    /// ready, enough SP, weapon requirement. On success SP is deducted, the
    /// cooldown starts and resolution is scheduled after the DEX-reduced cast
    /// time.
    pub fn start(
        &mut self,
        caster: &mut Character,
        target: EntityId,
        skill: &Skill,
        cooldowns: &mut CooldownRegistry,
        constants: &CombatConstants,
        now: f64,
    ) -> Result<ActiveCast, CombatError> {
        let previous = self.state(caster.id);
        self.last_state.insert(caster.id, CastState::Validating);

        if let Err(err) = self.validate(caster, skill, cooldowns) {
            self.last_state.insert(caster.id, previous);
            return Err(err);
        }

        // Validated above, so this cannot fail
        caster.stats.spend_sp(skill.sp_cost);
        cooldowns.start(caster.id, &skill.id, skill.cooldown);

        let cast_time = caster.stats.cast_time(skill.cast_time, constants);
        let cast = ActiveCast {
            caster: caster.id,
            target,
            skill: skill.id.clone(),
            started_at: now,
            resolve_at: now + cast_time,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.insert(caster.id, cast.clone());
        self.last_state.insert(caster.id, CastState::Casting);

        debug!(
            caster = %caster.id,
            %target,
            skill = %skill.id,
            cast_time,
            sp_left = caster.stats.current_sp(),
            "cast started"
        );
        Ok(cast)
    }

    fn validate(
        &self,
        caster: &Character,
        skill: &Skill,
        cooldowns: &CooldownRegistry,
    ) -> Result<(), CombatError> {
        if !caster.is_alive() {
            return Err(CombatError::Incapacitated { entity: caster.id });
        }
        if self.pending.contains_key(&caster.id) {
            return Err(CombatError::CastInProgress { caster: caster.id });
        }
        if !cooldowns.is_ready(caster.id, &skill.id) {
            return Err(CombatError::OnCooldown {
                skill: skill.id.clone(),
                remaining: cooldowns.remaining(caster.id, &skill.id),
            });
        }
        let available = caster.stats.current_sp();
        if available < skill.sp_cost {
            return Err(CombatError::InsufficientResource {
                skill: skill.id.clone(),
                required: skill.sp_cost,
                available,
            });
        }
        if let Some(required) = skill.required_weapon {
            let wielded = caster.equipment.weapon().and_then(|w| w.weapon_type);
            if wielded != Some(required) {
                return Err(CombatError::RequirementNotMet {
                    skill: skill.id.clone(),
                    required,
                });
            }
        }
        Ok(())
    }

    /// Remove and return every cast due at `now`, in resolve order
    ///
    /// The caller applies each effect and records the outcome with
    /// [`SkillCastController::finish`].
    pub fn take_due(&mut self, now: f64) -> Vec<ActiveCast> {
        let due_casters: Vec<EntityId> = self
            .pending
            .values()
            .filter(|cast| clock::reached(now, cast.resolve_at))
            .map(|cast| cast.caster)
            .collect();

        let mut due: Vec<ActiveCast> = due_casters
            .into_iter()
            .filter_map(|caster| self.pending.remove(&caster))
            .collect();
        due.sort_by(|a, b| a.resolve_at.total_cmp(&b.resolve_at).then(a.seq.cmp(&b.seq)));
        due
    }

    /// Record how a cast taken by [`SkillCastController::take_due`] ended
    pub fn finish(&mut self, caster: EntityId, state: CastState) {
        if !self.pending.contains_key(&caster) {
            self.last_state.insert(caster, state);
        }
    }

    /// Cancel a caster's pending cast without refunding anything
    pub fn cancel(&mut self, caster: EntityId) -> Option<ActiveCast> {
        let cast = self.pending.remove(&caster)?;
        self.last_state.insert(caster, CastState::Cancelled);
        debug!(%caster, skill = %cast.skill, "cast cancelled");
        Some(cast)
    }

    pub fn state(&self, caster: EntityId) -> CastState {
        if self.pending.contains_key(&caster) {
            return CastState::Casting;
        }
        self.last_state.get(&caster).copied().unwrap_or_default()
    }

    pub fn is_casting(&self, caster: EntityId) -> bool {
        self.pending.contains_key(&caster)
    }

    pub fn pending(&self, caster: EntityId) -> Option<&ActiveCast> {
        self.pending.get(&caster)
    }

    /// Forget a caster entirely (despawn)
    pub fn forget(&mut self, caster: EntityId) {
        self.pending.remove(&caster);
        self.last_state.remove(&caster);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.last_state.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProgressionConstants;
    use crate::equipment::Item;
    use crate::stat_block::BaseAttributes;
    use crate::types::{SkillKind, Stat, WeaponType};

    const TARGET: EntityId = EntityId(2);

    fn caster() -> Character {
        let mut caster = Character::named("Caster", &ProgressionConstants::default());
        caster.id = EntityId(1);
        caster
    }

    fn fire_bolt() -> Skill {
        Skill::new("fire_bolt", "Fire Bolt", SkillKind::Damage, 30.0)
            .with_sp_cost(20.0)
            .with_cast_time(2.0)
            .with_cooldown(3.0)
    }

    #[test]
    fn test_start_pays_and_schedules() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        let constants = CombatConstants::default();

        let cast = controller
            .start(&mut caster, TARGET, &fire_bolt(), &mut cooldowns, &constants, 10.0)
            .unwrap();

        // 59 - 20
        assert!((caster.stats.current_sp() - 39.0).abs() < f64::EPSILON);
        assert!(!cooldowns.is_ready(caster.id, &cast.skill));
        // dex 5 → 2.0 × 0.95
        assert!((cast.resolve_at - 11.9).abs() < 1e-9);
        assert_eq!(controller.state(caster.id), CastState::Casting);
    }

    #[test]
    fn test_insufficient_sp_leaves_sp_untouched() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        caster.stats.set_current_sp(15.0);

        let err = controller
            .start(&mut caster, TARGET, &fire_bolt(), &mut cooldowns, &CombatConstants::default(), 0.0)
            .unwrap_err();

        assert!(matches!(err, CombatError::InsufficientResource { .. }));
        assert!((caster.stats.current_sp() - 15.0).abs() < f64::EPSILON);
        assert!(cooldowns.is_empty());
        assert_eq!(controller.state(caster.id), CastState::Idle);
    }

    #[test]
    fn test_cooldown_checked_before_sp() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        caster.stats.set_current_sp(0.0);
        cooldowns.start(caster.id, &SkillId::from("fire_bolt"), 1.0);

        let err = controller
            .start(&mut caster, TARGET, &fire_bolt(), &mut cooldowns, &CombatConstants::default(), 0.0)
            .unwrap_err();
        assert!(matches!(err, CombatError::OnCooldown { .. }));
    }

    #[test]
    fn test_weapon_requirement() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        let progression = ProgressionConstants::default();
        let bash = Skill::new("bash", "Bash", SkillKind::Damage, 20.0)
            .with_sp_cost(5.0)
            .with_required_weapon(WeaponType::Sword);
        let constants = CombatConstants::default();

        let err = controller
            .start(&mut caster, TARGET, &bash, &mut cooldowns, &constants, 0.0)
            .unwrap_err();
        assert_eq!(
            err,
            CombatError::RequirementNotMet {
                skill: bash.id.clone(),
                required: WeaponType::Sword,
            }
        );
        assert!((caster.stats.current_sp() - caster.stats.max_sp()).abs() < f64::EPSILON);

        caster
            .equip(Item::weapon("sword", "Sword", WeaponType::Sword), &progression)
            .unwrap();
        assert!(controller
            .start(&mut caster, TARGET, &bash, &mut cooldowns, &constants, 0.0)
            .is_ok());
    }

    #[test]
    fn test_one_cast_at_a_time() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        let own_id = caster.id;
        let constants = CombatConstants::default();
        let heal = Skill::new("heal", "Heal", SkillKind::Heal, 20.0).with_cast_time(1.0);

        controller
            .start(&mut caster, own_id, &fire_bolt(), &mut cooldowns, &constants, 0.0)
            .unwrap();
        let sp_after_first = caster.stats.current_sp();
        let err = controller
            .start(&mut caster, own_id, &heal, &mut cooldowns, &constants, 0.1)
            .unwrap_err();

        assert_eq!(err, CombatError::CastInProgress { caster: own_id });
        assert!((caster.stats.current_sp() - sp_after_first).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dex_reduces_cast_time() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let base = BaseAttributes {
            dex: 50.0,
            ..BaseAttributes::default()
        };
        let mut caster = caster();
        caster.stats = crate::stat_block::StatBlock::new(&base, 1, &ProgressionConstants::default());
        assert!((caster.stats.stat(Stat::Dex) - 50.0).abs() < f64::EPSILON);

        let cast = controller
            .start(&mut caster, TARGET, &fire_bolt(), &mut cooldowns, &CombatConstants::default(), 0.0)
            .unwrap();
        assert!((cast.resolve_at - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_take_due_orders_by_time() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let constants = CombatConstants::default();
        let mut slow = caster();
        let mut quick = caster();
        quick.id = EntityId(3);

        controller
            .start(&mut slow, TARGET, &fire_bolt(), &mut cooldowns, &constants, 0.0)
            .unwrap();
        let instant = Skill::new("jab", "Jab", SkillKind::Damage, 5.0);
        controller
            .start(&mut quick, TARGET, &instant, &mut cooldowns, &constants, 0.0)
            .unwrap();

        assert!(controller.take_due(-1.0).is_empty());
        let due = controller.take_due(0.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].caster, quick.id);
        assert!(!controller.is_casting(quick.id));
        assert!(controller.is_casting(slow.id));
        controller.finish(quick.id, CastState::Wasted);
        assert_eq!(controller.state(quick.id), CastState::Wasted);

        let due = controller.take_due(5.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].caster, slow.id);
    }

    #[test]
    fn test_due_after_fractional_ticks() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        caster.stats = crate::stat_block::StatBlock::new(
            &BaseAttributes {
                dex: 0.0,
                ..BaseAttributes::default()
            },
            1,
            &ProgressionConstants::default(),
        );
        let skill = Skill::new("jab", "Jab", SkillKind::Damage, 5.0).with_cast_time(1.0);
        controller
            .start(&mut caster, TARGET, &skill, &mut cooldowns, &CombatConstants::default(), 0.0)
            .unwrap();

        let mut now = 0.0;
        for _ in 0..9 {
            now += 0.1;
            assert!(controller.take_due(now).is_empty());
        }
        now += 0.1;
        assert_eq!(controller.take_due(now).len(), 1);
    }

    #[test]
    fn test_cancel_keeps_costs() {
        let mut controller = SkillCastController::new();
        let mut cooldowns = CooldownRegistry::new();
        let mut caster = caster();
        controller
            .start(&mut caster, TARGET, &fire_bolt(), &mut cooldowns, &CombatConstants::default(), 0.0)
            .unwrap();

        assert!(controller.cancel(caster.id).is_some());
        assert_eq!(controller.state(caster.id), CastState::Cancelled);
        assert!((caster.stats.current_sp() - 39.0).abs() < f64::EPSILON);
        assert!(!cooldowns.is_ready(caster.id, &SkillId::from("fire_bolt")));
        assert!(controller.cancel(caster.id).is_none());
    }
}
