//! Combo tracking - classifying consecutive hits and decaying idle combos
//!
//! Two separate rules apply:
//! - at hit time, a hit from the same attacker within the combo window
//!   continues the combo, anything else starts a new sequence at 1;
//! - on every tick, a combo idle for the decay period drops to 0.

use crate::clock;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Classification of a single hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboHit {
    pub is_combo: bool,
    /// Combo count the damage bonus is computed from (count before this hit)
    pub count: u32,
}

/// Tracks the most recent attacker and the running combo count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboTracker {
    window: f64,
    decay: f64,
    last_attack_at: Option<f64>,
    last_attacker: Option<EntityId>,
    count: u32,
}

impl ComboTracker {
    /// Create a tracker with the given combo window and idle decay, in seconds
    pub fn new(window: f64, decay: f64) -> Self {
        ComboTracker {
            window,
            decay,
            last_attack_at: None,
            last_attacker: None,
            count: 0,
        }
    }

    /// Classify an attack by `attacker` at time `now` and record it
    pub fn register_hit(&mut self, attacker: EntityId, now: f64) -> ComboHit {
        let within_window = self
            .last_attack_at
            .is_some_and(|last| !clock::reached(now - last, self.window));
        let same_attacker = self.last_attacker == Some(attacker);

        let hit = if within_window && same_attacker {
            let hit = ComboHit {
                is_combo: true,
                count: self.count,
            };
            self.count += 1;
            hit
        } else {
            self.count = 1;
            ComboHit {
                is_combo: false,
                count: 0,
            }
        };

        self.last_attack_at = Some(now);
        self.last_attacker = Some(attacker);
        hit
    }

    /// Reset the count once the decay period has passed without attacks
    ///
    /// Returns true if the combo was reset by this call.
    pub fn decay(&mut self, now: f64) -> bool {
        let idle = self
            .last_attack_at
            .is_some_and(|last| clock::reached(now - last, self.decay));
        if idle && self.count > 0 {
            self.count = 0;
            return true;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn last_attacker(&self) -> Option<EntityId> {
        self.last_attacker
    }

    /// Forget all combo state (scene transition)
    pub fn reset(&mut self) {
        self.last_attack_at = None;
        self.last_attacker = None;
        self.count = 0;
    }
}
