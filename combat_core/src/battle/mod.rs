//! Battle - The session context every combat operation runs in
//!
//! A [`Battle`] owns the clock, the roster and every per-battle registry
//! (combo, cooldowns, pending casts, area effects). Time only moves through
//! [`Battle::tick`], which applies decay and expiry before resolving casts,
//! so anything the caller does after a tick sees the post-decay state.

mod result;
mod roster;

pub use result::{AttackOutcome, BattleEvent, CastEffect};
pub use roster::Roster;

use crate::area::{AreaEffect, AreaEffectRegistry};
use crate::character::{Character, Position};
use crate::clock;
use crate::combo::ComboTracker;
use crate::config::GameConstants;
use crate::damage::{calculate_damage, roll_critical, DamageInput, SkillStrike};
use crate::element::ElementTable;
use crate::equipment::Item;
use crate::error::{CombatError, ProgressionError};
use crate::progression;
use crate::skill::{
    ActiveCast, CastState, CooldownRegistry, EffectContext, SkillCastController, SkillEffects, SkillLibrary,
    StandardEffects,
};
use crate::types::{EntityId, EquipmentSlot, Job, SkillId, SkillKind};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One battle/world session
pub struct Battle<R: Rng> {
    now: f64,
    constants: GameConstants,
    roster: Roster,
    combo: ComboTracker,
    cooldowns: CooldownRegistry,
    casts: SkillCastController,
    areas: AreaEffectRegistry,
    skills: SkillLibrary,
    elements: ElementTable,
    effects: Box<dyn SkillEffects>,
    /// Downed enemies and when they leave the roster
    despawn_at: BTreeMap<EntityId, f64>,
    events: Vec<BattleEvent>,
    rng: R,
}

impl<R: Rng> Battle<R> {
    pub fn new(constants: GameConstants, skills: SkillLibrary, elements: ElementTable, rng: R) -> Self {
        let combo = ComboTracker::new(constants.combat.combo_window, constants.combat.combo_decay);
        Battle {
            now: 0.0,
            constants,
            roster: Roster::new(),
            combo,
            cooldowns: CooldownRegistry::new(),
            casts: SkillCastController::new(),
            areas: AreaEffectRegistry::new(),
            skills,
            elements,
            effects: Box::new(StandardEffects),
            despawn_at: BTreeMap::new(),
            events: Vec::new(),
            rng,
        }
    }

    /// Battle with default constants, bundled skills and the standard element chart
    pub fn with_defaults(rng: R) -> Self {
        Self::new(
            GameConstants::default(),
            SkillLibrary::with_defaults(),
            ElementTable::with_defaults(),
            rng,
        )
    }

    /// Replace the buff/on-hit effect handler
    pub fn with_effects(mut self, effects: impl SkillEffects + 'static) -> Self {
        self.effects = Box::new(effects);
        self
    }

    /// Start the clock at `now` instead of zero
    pub fn starting_at(mut self, now: f64) -> Self {
        self.now = now;
        self
    }

    // === Accessors ===

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn constants(&self) -> &GameConstants {
        &self.constants
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn character(&self, id: EntityId) -> Option<&Character> {
        self.roster.get(id)
    }

    pub fn character_mut(&mut self, id: EntityId) -> Option<&mut Character> {
        self.roster.get_mut(id)
    }

    pub fn skills(&self) -> &SkillLibrary {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillLibrary {
        &mut self.skills
    }

    pub fn elements(&self) -> &ElementTable {
        &self.elements
    }

    pub fn combo_count(&self) -> u32 {
        self.combo.count()
    }

    pub fn cooldown_remaining(&self, caster: EntityId, skill: &SkillId) -> f64 {
        self.cooldowns.remaining(caster, skill)
    }

    pub fn cast_state(&self, caster: EntityId) -> CastState {
        self.casts.state(caster)
    }

    pub fn pending_cast(&self, caster: EntityId) -> Option<&ActiveCast> {
        self.casts.pending(caster)
    }

    pub fn areas(&self) -> &AreaEffectRegistry {
        &self.areas
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // === Roster ===

    /// Add a character to the battle, returning its id
    pub fn spawn(&mut self, character: Character) -> EntityId {
        let id = self.roster.spawn(character);
        debug!(entity = %id, "spawned");
        id
    }

    /// Remove a character and everything the battle tracks for it
    pub fn despawn(&mut self, id: EntityId) -> Option<Character> {
        let character = self.roster.remove(id)?;
        self.despawn_at.remove(&id);
        self.casts.forget(id);
        self.cooldowns.clear_caster(id);
        self.events.push(BattleEvent::Despawned { entity: id });
        info!(entity = %id, name = %character.name, "despawned");
        Some(character)
    }

    /// Start moving a character toward a point
    pub fn move_to(&mut self, id: EntityId, x: f64, y: f64) -> Result<(), CombatError> {
        let character = self.roster.get_mut(id).ok_or(CombatError::UnknownEntity(id))?;
        character.move_to(x, y);
        Ok(())
    }

    // === Combat ===

    /// Resolve an attack immediately, optionally as a skill strike
    ///
    /// Skill strikes through here skip SP, cooldown and cast time; use
    /// [`Battle::use_skill`] for a paid, delayed cast.
    pub fn attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        skill: Option<&SkillId>,
    ) -> Result<AttackOutcome, CombatError> {
        let strike = match skill {
            Some(id) => {
                let skill = self.skills.get(id).ok_or_else(|| CombatError::UnknownSkill(id.clone()))?;
                let level = self
                    .roster
                    .get(attacker)
                    .ok_or(CombatError::UnknownEntity(attacker))?
                    .skill_level(id);
                Some(skill.strike(level))
            }
            None => None,
        };

        let outcome = self.land_hit(attacker, target, strike)?;
        self.events.push(BattleEvent::AttackLanded(outcome));
        if outcome.target_downed {
            self.handle_death(target, Some(attacker));
        }
        Ok(outcome)
    }

    /// Classify, roll, calculate and apply one hit
    fn land_hit(
        &mut self,
        attacker_id: EntityId,
        target_id: EntityId,
        strike: Option<SkillStrike>,
    ) -> Result<AttackOutcome, CombatError> {
        let attacker = self
            .roster
            .get(attacker_id)
            .ok_or(CombatError::UnknownEntity(attacker_id))?;
        let target = self.roster.get(target_id).ok_or(CombatError::UnknownEntity(target_id))?;
        if !attacker.is_alive() {
            return Err(CombatError::Incapacitated { entity: attacker_id });
        }
        if !target.is_alive() {
            return Err(CombatError::Incapacitated { entity: target_id });
        }

        let combo = self.combo.register_hit(attacker_id, self.now);
        let is_critical = roll_critical(&attacker.stats, &self.constants.combat, &mut self.rng);
        let input = DamageInput {
            attacker: &attacker.stats,
            target: &target.stats,
            target_element: target.element,
            skill: strike,
            combo,
            is_critical,
        };
        let damage = calculate_damage(&input, &self.constants.combat, &self.elements);

        if let Some(attacker) = self.roster.get_mut(attacker_id) {
            attacker.is_attacking = true;
            attacker.target = Some(target_id);
            if combo.is_combo {
                progression::add_rage(attacker, self.constants.rage.per_combo_hit);
            }
        }

        let target = self
            .roster
            .get_mut(target_id)
            .ok_or(CombatError::UnknownEntity(target_id))?;
        let hp_before = target.stats.current_hp();
        let target_downed = target.take_damage(damage.damage);
        let outcome = AttackOutcome {
            attacker: attacker_id,
            target: target_id,
            damage,
            hp_before,
            hp_after: target.stats.current_hp(),
            target_downed,
        };

        debug!(
            attacker = %attacker_id,
            target = %target_id,
            damage = damage.damage,
            critical = damage.is_critical,
            combo = damage.is_combo,
            "hit landed"
        );
        Ok(outcome)
    }

    /// Start a paid, delayed skill cast
    ///
    /// Refusals leave the caster untouched. On success the SP is spent and the
    /// cooldown running; the effect lands on the first tick at or after the
    /// resolve time, so a zero cast time resolves on the next tick.
    pub fn use_skill(
        &mut self,
        caster: EntityId,
        skill: &SkillId,
        target: EntityId,
    ) -> Result<ActiveCast, CombatError> {
        let definition = self
            .skills
            .get(skill)
            .ok_or_else(|| CombatError::UnknownSkill(skill.clone()))?;
        if !self.roster.contains(target) {
            return Err(CombatError::UnknownEntity(target));
        }
        let character = self.roster.get_mut(caster).ok_or(CombatError::UnknownEntity(caster))?;

        let cast = self.casts.start(
            character,
            target,
            definition,
            &mut self.cooldowns,
            &self.constants.combat,
            self.now,
        )?;

        self.events.push(BattleEvent::CastStarted {
            caster,
            target,
            skill: skill.clone(),
            resolve_at: cast.resolve_at,
        });
        Ok(cast)
    }

    /// Cancel a pending cast; SP and cooldown stay spent
    pub fn interrupt_cast(&mut self, caster: EntityId) -> Result<ActiveCast, CombatError> {
        if !self.roster.contains(caster) {
            return Err(CombatError::UnknownEntity(caster));
        }
        let cast = self.casts.cancel(caster).ok_or(CombatError::NotCasting { caster })?;
        self.events.push(BattleEvent::CastCancelled {
            caster,
            skill: cast.skill.clone(),
        });
        Ok(cast)
    }

    fn resolve_cast(&mut self, cast: ActiveCast) {
        let caster_ready = self.roster.get(cast.caster).is_some_and(Character::is_alive);
        let Some(skill) = self.skills.get(&cast.skill).cloned().filter(|_| caster_ready) else {
            self.finish_cast(cast.caster, CastState::Cancelled);
            self.events.push(BattleEvent::CastCancelled {
                caster: cast.caster,
                skill: cast.skill,
            });
            return;
        };

        let target_ready = self.roster.get(cast.target).is_some_and(Character::is_alive);
        if !target_ready {
            info!(caster = %cast.caster, target = %cast.target, skill = %cast.skill, "cast wasted");
            self.finish_cast(cast.caster, CastState::Wasted);
            self.events.push(BattleEvent::CastWasted {
                caster: cast.caster,
                target: cast.target,
                skill: cast.skill,
            });
            return;
        }

        let level = self
            .roster
            .get(cast.caster)
            .map_or(1, |c| c.skill_level(&skill.id));

        let effect = match skill.kind {
            SkillKind::Damage => {
                let outcome = match self.land_hit(cast.caster, cast.target, Some(skill.strike(level))) {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        self.finish_cast(cast.caster, CastState::Wasted);
                        self.events.push(BattleEvent::CastWasted {
                            caster: cast.caster,
                            target: cast.target,
                            skill: cast.skill,
                        });
                        return;
                    }
                };
                if skill.on_hit.is_some() {
                    let spawned = match self.roster.get_mut(cast.target) {
                        Some(target) => {
                            let mut ctx = EffectContext {
                                now: self.now,
                                areas: &mut self.areas,
                                progression: &self.constants.progression,
                            };
                            self.effects.apply_on_hit(&skill, cast.caster, target, &mut ctx)
                        }
                        None => Vec::new(),
                    };
                    for area in spawned {
                        let owner = self.areas.get(area).and_then(|effect| effect.owner);
                        self.events.push(BattleEvent::AreaSpawned { area, owner });
                    }
                }
                CastEffect::Damage(outcome)
            }
            SkillKind::Heal => {
                let amount = skill.power_at(level);
                let healed = match self.roster.get_mut(cast.caster) {
                    Some(caster) => {
                        let before = caster.stats.current_hp();
                        caster.stats.heal(amount);
                        caster.stats.current_hp() - before
                    }
                    None => 0.0,
                };
                CastEffect::Heal { amount: healed }
            }
            SkillKind::Buff => {
                let applied = match self.roster.get_mut(cast.target) {
                    Some(target) => {
                        let mut ctx = EffectContext {
                            now: self.now,
                            areas: &mut self.areas,
                            progression: &self.constants.progression,
                        };
                        self.effects.apply_buff(&skill, target, &mut ctx)
                    }
                    None => false,
                };
                CastEffect::Buff { applied }
            }
        };

        info!(caster = %cast.caster, target = %cast.target, skill = %cast.skill, "cast resolved");
        self.finish_cast(cast.caster, CastState::Resolved);
        self.events.push(BattleEvent::CastResolved {
            caster: cast.caster,
            target: cast.target,
            skill: cast.skill,
            effect,
        });

        if let CastEffect::Damage(outcome) = effect {
            if outcome.target_downed {
                self.handle_death(cast.target, Some(cast.caster));
            }
        }
    }

    fn finish_cast(&mut self, caster: EntityId, state: CastState) {
        if self.roster.contains(caster) {
            self.casts.finish(caster, state);
        }
    }

    /// Apply death to a character whose HP just reached zero
    fn handle_death(&mut self, victim: EntityId, killer: Option<EntityId>) {
        let Some(character) = self.roster.get_mut(victim) else {
            return;
        };
        if !character.is_alive() {
            return;
        }
        progression::on_death(character, &self.constants.progression);
        let enemy = character
            .kind
            .enemy_profile()
            .map(|profile| (profile.exp_reward, profile.respawn_time));

        if let Some(cast) = self.casts.cancel(victim) {
            self.events.push(BattleEvent::CastCancelled {
                caster: victim,
                skill: cast.skill,
            });
        }
        self.events.push(BattleEvent::Downed { entity: victim, killer });

        if let Some((exp_reward, respawn_time)) = enemy {
            self.despawn_at.insert(victim, self.now + respawn_time);
            if let Some(killer) = killer.filter(|&k| k != victim) {
                self.award_experience(killer, exp_reward);
            }
        }
    }

    fn award_experience(&mut self, entity: EntityId, amount: u64) -> Option<bool> {
        let character = self.roster.get_mut(entity)?;
        let leveled = progression::gain_experience(character, amount, &self.constants.progression);
        let level = character.level;
        self.events.push(BattleEvent::ExperienceGained { entity, amount });
        if leveled {
            self.events.push(BattleEvent::LevelUp { entity, level });
        }
        Some(leveled)
    }

    /// Spawn an area effect at the current time
    pub fn spawn_area_effect(
        &mut self,
        origin: Position,
        radius: f64,
        damage_per_second: f64,
        duration: f64,
        owner: Option<EntityId>,
    ) -> u64 {
        let mut effect = AreaEffect::new(origin, radius, damage_per_second, duration, self.now);
        effect.owner = owner;
        let area = self.areas.spawn(effect);
        self.events.push(BattleEvent::AreaSpawned { area, owner });
        area
    }

    // === Equipment ===

    pub fn equip(&mut self, entity: EntityId, item: Item) -> Result<usize, CombatError> {
        let character = self.roster.get_mut(entity).ok_or(CombatError::UnknownEntity(entity))?;
        Ok(character.equip(item, &self.constants.progression)?)
    }

    pub fn unequip(
        &mut self,
        entity: EntityId,
        slot: EquipmentSlot,
        index: Option<usize>,
    ) -> Result<Item, CombatError> {
        let character = self.roster.get_mut(entity).ok_or(CombatError::UnknownEntity(entity))?;
        Ok(character.unequip(slot, index, &self.constants.progression)?)
    }

    // === Progression ===

    /// Grant experience; returns true on level-up
    pub fn gain_experience(&mut self, entity: EntityId, amount: u64) -> Result<bool, ProgressionError> {
        self.award_experience(entity, amount)
            .ok_or(ProgressionError::UnknownEntity(entity))
    }

    pub fn change_job(&mut self, entity: EntityId, job: Job) -> Result<(), ProgressionError> {
        let character = self
            .roster
            .get_mut(entity)
            .ok_or(ProgressionError::UnknownEntity(entity))?;
        progression::change_job(character, job, &self.constants.progression)
    }

    pub fn level_up_skill(&mut self, entity: EntityId, skill: &SkillId) -> Result<u32, ProgressionError> {
        let definition = self
            .skills
            .get(skill)
            .ok_or_else(|| ProgressionError::UnknownSkill(skill.clone()))?;
        let character = self
            .roster
            .get_mut(entity)
            .ok_or(ProgressionError::UnknownEntity(entity))?;
        progression::level_up_skill(character, definition)
    }

    /// Spend a full rage bar on berserk; returns whether it activated
    pub fn activate_berserk(&mut self, entity: EntityId) -> Result<bool, CombatError> {
        let character = self.roster.get_mut(entity).ok_or(CombatError::UnknownEntity(entity))?;
        let activated = progression::activate_berserk(character, &self.constants.rage, &self.constants.progression);
        if activated {
            self.events.push(BattleEvent::Berserk { entity });
        }
        Ok(activated)
    }

    /// Return a downed character to play; returns false if it was not downed
    pub fn revive(&mut self, entity: EntityId) -> Result<bool, CombatError> {
        let character = self.roster.get_mut(entity).ok_or(CombatError::UnknownEntity(entity))?;
        if !progression::revive(character) {
            return Ok(false);
        }
        self.despawn_at.remove(&entity);
        self.events.push(BattleEvent::Revived { entity });
        Ok(true)
    }

    // === Time ===

    /// Advance the battle by `delta` seconds
    ///
    /// Order within a tick: clock, combo decay, cooldowns, area effects,
    /// buff expiry, movement, despawn timers, then due casts.
    pub fn tick(&mut self, delta: f64) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.now += delta;

        if self.combo.decay(self.now) {
            self.events.push(BattleEvent::ComboReset);
        }
        self.cooldowns.tick(delta);
        self.tick_areas(delta);
        self.tick_buffs(delta);

        for character in self.roster.iter_mut().filter(|c| c.is_alive()) {
            character.advance_movement(delta);
        }

        let due: Vec<EntityId> = self
            .despawn_at
            .iter()
            .filter(|(_, at)| clock::reached(self.now, **at))
            .map(|(&id, _)| id)
            .collect();
        for id in due {
            self.despawn(id);
        }

        for cast in self.casts.take_due(self.now) {
            self.resolve_cast(cast);
        }
    }

    fn tick_areas(&mut self, delta: f64) {
        let tick = self.areas.tick(delta, &mut self.roster);
        for hit in tick.hits {
            self.events.push(BattleEvent::AreaHit {
                area: hit.area,
                target: hit.target,
                damage: hit.damage,
            });
            if hit.depleted {
                self.handle_death(hit.target, hit.owner);
            }
        }
        for area in tick.expired {
            self.events.push(BattleEvent::AreaExpired { area });
        }
    }

    fn tick_buffs(&mut self, delta: f64) {
        for character in self.roster.iter_mut() {
            let expired = character.stats.tick_buffs(delta);
            if expired.is_empty() {
                continue;
            }
            character.recompute_caps(&self.constants.progression);
            for buff in expired {
                debug!(entity = %character.id, buff = %buff.buff_id, "buff expired");
                self.events.push(BattleEvent::BuffExpired {
                    entity: character.id,
                    buff_id: buff.buff_id,
                });
            }
        }
    }

    /// Discard all per-battle timers (scene transition); the roster stays
    pub fn reset(&mut self) {
        self.combo.reset();
        self.cooldowns.clear();
        self.casts.clear();
        self.areas.clear();
        self.despawn_at.clear();
        self.events.clear();
    }
}
