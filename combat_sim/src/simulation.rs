//! Duel simulation utilities

use combat_core::prelude::*;
use rand::Rng;
use tracing::debug;

/// Result of running one attacker against one defender
pub struct DuelSimulation {
    pub total_damage: f64,
    pub total_time: f64,
    pub hit_count: u32,
    pub crit_count: u32,
    pub combo_hits: u32,
    pub casts_resolved: u32,
    pub kill_time: Option<f64>,
}

impl DuelSimulation {
    /// Let `attacker` hit `defender` every `attack_interval` seconds for `duration`
    ///
    /// When `skill` is set it is cast whenever the attacker can afford it and
    /// is off cooldown; every other swing is a basic attack.
    pub fn run<R: Rng>(
        battle: &mut Battle<R>,
        attacker: EntityId,
        defender: EntityId,
        skill: Option<&SkillId>,
        attack_interval: f64,
        duration: f64,
    ) -> Self {
        let mut result = DuelSimulation {
            total_damage: 0.0,
            total_time: 0.0,
            hit_count: 0,
            crit_count: 0,
            combo_hits: 0,
            casts_resolved: 0,
            kill_time: None,
        };

        let start = battle.now();
        let interval = attack_interval.max(0.01);
        battle.drain_events();

        while battle.now() - start < duration {
            let defender_alive = battle.character(defender).is_some_and(Character::is_alive);
            if !defender_alive {
                break;
            }

            let cast = skill.map(|id| battle.use_skill(attacker, id, defender));
            match cast {
                Some(Ok(_)) => {}
                Some(Err(CombatError::CastInProgress { .. })) => {}
                _ => {
                    if let Err(err) = battle.attack(attacker, defender, None) {
                        debug!(%err, "swing refused");
                    }
                }
            }

            battle.tick(interval);
            for event in battle.drain_events() {
                result.record(&event, attacker, defender, battle.now() - start);
            }
        }

        result.total_time = (battle.now() - start).min(duration);
        result
    }

    fn record(&mut self, event: &BattleEvent, attacker: EntityId, defender: EntityId, elapsed: f64) {
        match event {
            BattleEvent::AttackLanded(outcome) if outcome.attacker == attacker => self.record_hit(outcome),
            BattleEvent::CastResolved { caster, effect, .. } if *caster == attacker => {
                self.casts_resolved += 1;
                if let CastEffect::Damage(outcome) = effect {
                    self.record_hit(outcome);
                }
            }
            BattleEvent::AreaHit { target, damage, .. } if *target == defender => {
                self.total_damage += damage;
            }
            BattleEvent::Downed { entity, .. } if *entity == defender && self.kill_time.is_none() => {
                self.kill_time = Some(elapsed);
            }
            _ => {}
        }
    }

    fn record_hit(&mut self, outcome: &AttackOutcome) {
        self.hit_count += 1;
        self.total_damage += outcome.damage();
        if outcome.is_critical() {
            self.crit_count += 1;
        }
        if outcome.is_combo() {
            self.combo_hits += 1;
        }
    }

    /// Calculate DPS
    pub fn dps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.total_damage / self.total_time
        } else {
            0.0
        }
    }

    /// Calculate crit rate
    pub fn crit_rate(&self) -> f64 {
        if self.hit_count > 0 {
            self.crit_count as f64 / self.hit_count as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Calculate average damage per hit
    pub fn avg_damage(&self) -> f64 {
        if self.hit_count > 0 {
            self.total_damage / self.hit_count as f64
        } else {
            0.0
        }
    }
}
