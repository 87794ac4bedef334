//! DamageOutcome - Result of the hit damage formula

use serde::{Deserialize, Serialize};

/// Calculated damage for a single hit, with the intermediate terms kept for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOutcome {
    /// Final damage after mitigation, never below the minimum
    pub damage: f64,
    pub is_critical: bool,
    pub is_combo: bool,
    /// Damage before element and defense were applied
    pub pre_mitigation: f64,
    pub element_multiplier: f64,
    /// Flat reduction from the target's VIT
    pub defense: f64,
}

impl DamageOutcome {
    /// Damage removed by the target's defense
    pub fn mitigated(&self) -> f64 {
        (self.pre_mitigation * self.element_multiplier - self.damage).max(0.0)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{:.1} damage", self.damage)];

        if self.is_critical {
            parts.push("CRITICAL".to_string());
        }

        if self.is_combo {
            parts.push("combo".to_string());
        }

        if (self.element_multiplier - 1.0).abs() > f64::EPSILON {
            parts.push(format!("element x{:.2}", self.element_multiplier));
        }

        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let outcome = DamageOutcome {
            damage: 12.0,
            is_critical: true,
            is_combo: false,
            pre_mitigation: 20.0,
            element_multiplier: 1.5,
            defense: 18.0,
        };
        let summary = outcome.summary();
        assert!(summary.contains("12.0 damage"));
        assert!(summary.contains("CRITICAL"));
        assert!(summary.contains("x1.50"));
        assert!((outcome.mitigated() - 18.0).abs() < f64::EPSILON);
    }
}
