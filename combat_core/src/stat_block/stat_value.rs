//! StatValue - Layered attribute container (Base → Flat → Increased → More)

use serde::{Deserialize, Serialize};

/// An attribute that keeps its sources apart so they can be reversed
///
/// Final value is calculated as:
/// `max(0, (base + flat) × (1 + increased) × Π(1 + more))`
///
/// - `base`: Growth from level-ups and job changes
/// - `flat`: Sum of equipment deltas currently applied
/// - `increased`: Sum of increased% (as decimal, e.g., 0.40 = 40%)
/// - `more`: List of more% multipliers from timed buffs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub flat: f64,
    pub increased: f64,
    pub more: Vec<f64>,
}

impl StatValue {
    /// Create a new StatValue with the given base
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base: base.max(0.0),
            flat: 0.0,
            increased: 0.0,
            more: Vec::new(),
        }
    }

    /// Calculate the effective value, never below zero
    pub fn compute(&self) -> f64 {
        let base_total = self.base + self.flat;
        let increased_mult = 1.0 + self.increased;
        (base_total * increased_mult * self.total_more_multiplier()).max(0.0)
    }

    /// Add to the base value, clamping the base at zero
    pub fn add_base(&mut self, value: f64) {
        self.base = (self.base + value).max(0.0);
    }

    /// Add a flat bonus
    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Add an increased% bonus (as decimal)
    pub fn add_increased(&mut self, value: f64) {
        self.increased += value;
    }

    /// Add a more% multiplier (as decimal, e.g., 0.50 for 50% more)
    pub fn add_more(&mut self, value: f64) {
        self.more.push(value);
    }

    /// Remove one previously added more% multiplier
    ///
    /// Returns false if no multiplier with that value was present.
    pub fn remove_more(&mut self, value: f64) -> bool {
        match self.more.iter().position(|m| (m - value).abs() < f64::EPSILON) {
            Some(idx) => {
                self.more.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Get the total more multiplier (product of all more multipliers)
    pub fn total_more_multiplier(&self) -> f64 {
        self.more.iter().map(|m| 1.0 + m).product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_basic() {
        let stat = StatValue::with_base(10.0);
        assert!((stat.compute() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_is_reversible() {
        let mut stat = StatValue::with_base(3.0);
        stat.add_flat(-5.0);
        assert!((stat.compute() - 0.0).abs() < f64::EPSILON);
        stat.add_flat(5.0);
        assert!((stat.compute() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_base_clamps_at_zero() {
        let mut stat = StatValue::with_base(2.0);
        stat.add_base(-5.0);
        assert!((stat.base - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_more_multipliers() {
        let mut stat = StatValue::with_base(10.0);
        stat.add_more(0.5);
        assert!((stat.compute() - 15.0).abs() < f64::EPSILON);
        assert!(stat.remove_more(0.5));
        assert!(!stat.remove_more(0.5));
        assert!((stat.compute() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_full_formula() {
        let mut stat = StatValue::with_base(10.0);
        stat.add_flat(10.0);
        stat.add_increased(0.5);
        stat.add_more(-0.3);
        // (10 + 10) × 1.5 × 0.7 = 21
        assert!((stat.compute() - 21.0).abs() < 1e-9);
    }
}
