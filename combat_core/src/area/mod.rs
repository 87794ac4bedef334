//! Area effects - Time-bounded zones damaging everything inside a radius

use crate::battle::Roster;
use crate::character::Position;
use crate::clock;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A damaging zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaEffect {
    /// Assigned by the registry on spawn
    pub id: u64,
    pub origin: Position,
    pub radius: f64,
    pub damage_per_second: f64,
    /// Seconds left; the effect is removed once this reaches zero
    pub remaining: f64,
    pub created_at: f64,
    /// Entity credited with kills
    pub owner: Option<EntityId>,
}

impl AreaEffect {
    pub fn new(origin: Position, radius: f64, damage_per_second: f64, duration: f64, created_at: f64) -> Self {
        AreaEffect {
            id: 0,
            origin,
            radius,
            damage_per_second,
            remaining: duration,
            created_at,
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn contains(&self, point: &Position) -> bool {
        self.origin.distance_to(point) <= self.radius
    }

    pub fn is_active(&self) -> bool {
        !clock::expired(self.remaining)
    }
}

/// Damage one area effect dealt to one entity during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaHit {
    pub area: u64,
    pub owner: Option<EntityId>,
    pub target: EntityId,
    pub damage: f64,
    /// This hit took the target to zero HP
    pub depleted: bool,
}

/// Result of ticking every area effect once
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaTick {
    pub hits: Vec<AreaHit>,
    pub expired: Vec<u64>,
}

/// Live area effects of one battle
#[derive(Debug, Clone, Default)]
pub struct AreaEffectRegistry {
    effects: Vec<AreaEffect>,
    next_id: u64,
}

impl AreaEffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, returning its id
    pub fn spawn(&mut self, mut effect: AreaEffect) -> u64 {
        self.next_id += 1;
        effect.id = self.next_id;
        debug!(
            area = effect.id,
            x = effect.origin.x,
            y = effect.origin.y,
            radius = effect.radius,
            dps = effect.damage_per_second,
            duration = effect.remaining,
            "area spawned"
        );
        self.effects.push(effect);
        self.next_id
    }

    /// Advance every effect by `delta`
    ///
    /// Each effect first loses `delta` of its duration. If time remains, every
    /// living entity within its radius takes `damage_per_second × delta`;
    /// overlapping effects stack. Effects whose duration ran out are removed
    /// in the same tick without dealing damage.
    pub fn tick(&mut self, delta: f64, roster: &mut Roster) -> AreaTick {
        let mut result = AreaTick::default();

        for effect in &mut self.effects {
            effect.remaining -= delta;
            if !effect.is_active() {
                continue;
            }
            let damage = effect.damage_per_second * delta;
            for character in roster.iter_mut() {
                if !character.is_alive() || character.stats.is_depleted() || !effect.contains(&character.position) {
                    continue;
                }
                let depleted = character.take_damage(damage);
                result.hits.push(AreaHit {
                    area: effect.id,
                    owner: effect.owner,
                    target: character.id,
                    damage,
                    depleted,
                });
            }
        }

        self.effects.retain(|effect| {
            if effect.is_active() {
                return true;
            }
            debug!(area = effect.id, "area expired");
            result.expired.push(effect.id);
            false
        });

        result
    }

    pub fn get(&self, id: u64) -> Option<&AreaEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Character;
    use crate::config::ProgressionConstants;

    fn roster_with(positions: &[(f64, f64)]) -> (Roster, Vec<EntityId>) {
        let p = ProgressionConstants::default();
        let mut roster = Roster::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| {
                let mut character = Character::named("Dummy", &p);
                character.position = Position::new(x, y);
                roster.spawn(character)
            })
            .collect();
        (roster, ids)
    }

    #[test]
    fn test_damage_inside_radius_only() {
        let (mut roster, ids) = roster_with(&[(3.0, 4.0), (10.0, 0.0)]);
        let mut areas = AreaEffectRegistry::new();
        areas.spawn(AreaEffect::new(Position::new(0.0, 0.0), 5.0, 10.0, 1.0, 0.0));

        let tick = areas.tick(0.1, &mut roster);
        // Distance exactly 5 counts as inside
        assert_eq!(tick.hits.len(), 1);
        assert_eq!(tick.hits[0].target, ids[0]);
        assert!((tick.hits[0].damage - 1.0).abs() < 1e-9);

        let inside = roster.get(ids[0]).unwrap();
        assert!((inside.stats.current_hp() - 139.0).abs() < 1e-9);
        let outside = roster.get(ids[1]).unwrap();
        assert!((outside.stats.current_hp() - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_expiry_skips_damage_and_removes() {
        let (mut roster, ids) = roster_with(&[(0.0, 0.0)]);
        let mut areas = AreaEffectRegistry::new();
        let id = areas.spawn(AreaEffect::new(Position::new(0.0, 0.0), 5.0, 10.0, 0.3, 0.0));

        let mut total = 0.0;
        for _ in 0..3 {
            let tick = areas.tick(0.1, &mut roster);
            total += tick.hits.iter().map(|h| h.damage).sum::<f64>();
        }

        // The third tick ends the duration, so it deals nothing
        assert!((total - 2.0).abs() < 1e-9);
        assert!(areas.get(id).is_none());
        let hp = roster.get(ids[0]).unwrap().stats.current_hp();
        assert!((hp - 138.0).abs() < 1e-9);
    }

    #[test]
    fn test_full_duration_in_fractional_ticks() {
        let (mut roster, ids) = roster_with(&[(0.0, 0.0)]);
        let mut areas = AreaEffectRegistry::new();
        let id = areas.spawn(AreaEffect::new(Position::new(0.0, 0.0), 5.0, 10.0, 1.0, 0.0));

        let mut hits = 0;
        for _ in 0..9 {
            hits += areas.tick(0.1, &mut roster).hits.len();
        }
        assert_eq!(hits, 9);
        assert!(areas.get(id).is_some());

        let last = areas.tick(0.1, &mut roster);
        assert!(last.hits.is_empty());
        assert_eq!(last.expired, vec![id]);
        let hp = roster.get(ids[0]).unwrap().stats.current_hp();
        assert!((hp - 131.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_effects_stack() {
        let (mut roster, ids) = roster_with(&[(0.0, 0.0)]);
        let mut areas = AreaEffectRegistry::new();
        areas.spawn(AreaEffect::new(Position::new(0.0, 0.0), 5.0, 10.0, 1.0, 0.0));
        areas.spawn(AreaEffect::new(Position::new(1.0, 0.0), 5.0, 20.0, 1.0, 0.0));

        let tick = areas.tick(0.5, &mut roster);
        assert_eq!(tick.hits.len(), 2);
        let hp = roster.get(ids[0]).unwrap().stats.current_hp();
        assert!((hp - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_lethal_hit_is_flagged() {
        let (mut roster, ids) = roster_with(&[(0.0, 0.0)]);
        roster.get_mut(ids[0]).unwrap().stats.set_current_hp(1.0);
        let mut areas = AreaEffectRegistry::new();
        areas.spawn(AreaEffect::new(Position::new(0.0, 0.0), 5.0, 100.0, 1.0, 0.0).with_owner(EntityId(9)));

        let tick = areas.tick(0.1, &mut roster);
        assert!(tick.hits[0].depleted);
        assert_eq!(tick.hits[0].owner, Some(EntityId(9)));
    }
}
