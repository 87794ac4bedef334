//! CooldownRegistry - Per-caster skill countdowns

use crate::clock;
use crate::types::{EntityId, SkillId};
use std::collections::HashMap;

/// Remaining cooldown per (caster, skill)
///
/// Entries are pruned as soon as they reach zero, so a missing entry and a
/// ready skill are the same thing.
#[derive(Debug, Clone, Default)]
pub struct CooldownRegistry {
    remaining: HashMap<(EntityId, SkillId), f64>,
}

impl CooldownRegistry {
    pub fn new() -> Self {
        CooldownRegistry {
            remaining: HashMap::new(),
        }
    }

    /// Start (or restart) a cooldown; non-positive durations are ignored
    pub fn start(&mut self, caster: EntityId, skill: &SkillId, duration: f64) {
        if duration > 0.0 {
            self.remaining.insert((caster, skill.clone()), duration);
        }
    }

    pub fn is_ready(&self, caster: EntityId, skill: &SkillId) -> bool {
        clock::expired(self.remaining(caster, skill))
    }

    /// Seconds until the skill is ready again (0 when ready)
    pub fn remaining(&self, caster: EntityId, skill: &SkillId) -> f64 {
        self.remaining
            .get(&(caster, skill.clone()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Count every cooldown down by `delta` and drop the finished ones
    pub fn tick(&mut self, delta: f64) {
        self.remaining.retain(|_, remaining| {
            *remaining -= delta;
            !clock::expired(*remaining)
        });
    }

    /// Forget every cooldown of one caster
    pub fn clear_caster(&mut self, caster: EntityId) {
        self.remaining.retain(|(owner, _), _| *owner != caster);
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASTER: EntityId = EntityId(1);

    #[test]
    fn test_ready_without_entry() {
        let cooldowns = CooldownRegistry::new();
        assert!(cooldowns.is_ready(CASTER, &SkillId::from("bash")));
    }

    #[test]
    fn test_countdown_and_prune() {
        let mut cooldowns = CooldownRegistry::new();
        let bash = SkillId::from("bash");
        cooldowns.start(CASTER, &bash, 1.0);
        assert!(!cooldowns.is_ready(CASTER, &bash));

        cooldowns.tick(0.5);
        assert!((cooldowns.remaining(CASTER, &bash) - 0.5).abs() < 1e-9);

        cooldowns.tick(0.75);
        assert!(cooldowns.is_ready(CASTER, &bash));
        assert!(cooldowns.is_empty());
        // Never negative
        assert!(cooldowns.remaining(CASTER, &bash) >= 0.0);
    }

    #[test]
    fn test_cooldowns_are_per_caster() {
        let mut cooldowns = CooldownRegistry::new();
        let bash = SkillId::from("bash");
        cooldowns.start(CASTER, &bash, 2.0);
        assert!(cooldowns.is_ready(EntityId(2), &bash));

        cooldowns.start(EntityId(2), &bash, 2.0);
        cooldowns.clear_caster(CASTER);
        assert!(cooldowns.is_ready(CASTER, &bash));
        assert!(!cooldowns.is_ready(EntityId(2), &bash));
    }

    #[test]
    fn test_ready_after_fractional_ticks() {
        let mut cooldowns = CooldownRegistry::new();
        let bash = SkillId::from("bash");
        cooldowns.start(CASTER, &bash, 1.0);
        for _ in 0..9 {
            cooldowns.tick(0.1);
        }
        assert!(!cooldowns.is_ready(CASTER, &bash));
        cooldowns.tick(0.1);
        assert!(cooldowns.is_ready(CASTER, &bash));
        assert!(cooldowns.is_empty());
    }

    #[test]
    fn test_zero_duration_is_ignored() {
        let mut cooldowns = CooldownRegistry::new();
        cooldowns.start(CASTER, &SkillId::from("heal"), 0.0);
        assert!(cooldowns.is_empty());
    }
}
