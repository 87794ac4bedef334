//! TimedBuff - Temporary more% modifiers on attributes

use crate::clock;
use crate::types::Stat;
use serde::{Deserialize, Serialize};

/// Temporary buff/debuff that multiplies attributes while it lasts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedBuff {
    /// Buff identifier, reapplying the same id refreshes instead of stacking
    pub buff_id: String,
    /// Display name
    pub name: String,
    /// Duration remaining in seconds
    pub duration_remaining: f64,
    /// More% multipliers applied while active (as decimal)
    pub modifiers: Vec<BuffModifier>,
}

/// A single attribute multiplier carried by a buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuffModifier {
    pub stat: Stat,
    pub more: f64,
}

impl TimedBuff {
    /// Create a new buff with no modifiers
    pub fn new(buff_id: impl Into<String>, name: impl Into<String>, duration: f64) -> Self {
        TimedBuff {
            buff_id: buff_id.into(),
            name: name.into(),
            duration_remaining: duration,
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier to this buff
    pub fn with_modifier(mut self, stat: Stat, more: f64) -> Self {
        self.modifiers.push(BuffModifier { stat, more });
        self
    }

    /// Tick the buff duration
    /// Returns true if the buff is still active
    pub fn tick(&mut self, delta: f64) -> bool {
        self.duration_remaining -= delta;
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        !clock::expired(self.duration_remaining)
    }
}
