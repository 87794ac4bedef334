//! Elemental multiplier table
//!
//! Each directed (attack, target) pair is authored independently; the table
//! is not assumed to be symmetric. Missing pairs and anything involving
//! `Neutral` resolve to a multiplier of 1.0.

use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One authored entry of the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementEntry {
    pub attack: Element,
    pub target: Element,
    pub multiplier: f64,
}

/// Attack element × target element → damage multiplier
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    entries: HashMap<(Element, Element), f64>,
}

impl ElementTable {
    /// Create an empty table (every lookup yields 1.0)
    pub fn new() -> Self {
        ElementTable {
            entries: HashMap::new(),
        }
    }

    /// Standard elemental chart
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.set(Element::Fire, Element::Earth, 1.5);
        table.set(Element::Fire, Element::Water, 0.5);
        table.set(Element::Water, Element::Fire, 1.5);
        table.set(Element::Water, Element::Wind, 0.5);
        table.set(Element::Wind, Element::Earth, 1.5);
        table.set(Element::Wind, Element::Fire, 0.5);
        table.set(Element::Earth, Element::Wind, 1.5);
        table.set(Element::Earth, Element::Water, 0.5);
        table
    }

    /// Build a table from authored entries
    pub fn from_entries(entries: impl IntoIterator<Item = ElementEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.set(entry.attack, entry.target, entry.multiplier);
        }
        table
    }

    /// Author a directed pair; pairs involving `Neutral` are ignored
    pub fn set(&mut self, attack: Element, target: Element, multiplier: f64) {
        if attack == Element::Neutral || target == Element::Neutral {
            return;
        }
        self.entries.insert((attack, target), multiplier);
    }

    /// Multiplier for an attack element hitting a target element
    pub fn multiplier(&self, attack: Element, target: Element) -> f64 {
        if attack == Element::Neutral || target == Element::Neutral {
            return 1.0;
        }
        self.entries.get(&(attack, target)).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chart() {
        let table = ElementTable::with_defaults();
        assert!((table.multiplier(Element::Fire, Element::Earth) - 1.5).abs() < f64::EPSILON);
        assert!((table.multiplier(Element::Fire, Element::Water) - 0.5).abs() < f64::EPSILON);
        assert_eq!(table.len(), 8);
    }

    #[test]
    fn test_not_symmetric() {
        let table = ElementTable::with_defaults();
        // fire→earth is authored, earth→fire is not
        assert!((table.multiplier(Element::Fire, Element::Earth) - 1.5).abs() < f64::EPSILON);
        assert!((table.multiplier(Element::Earth, Element::Fire) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_neutral_and_missing() {
        let table = ElementTable::with_defaults();
        assert!((table.multiplier(Element::Neutral, Element::Fire) - 1.0).abs() < f64::EPSILON);
        assert!((table.multiplier(Element::Water, Element::Neutral) - 1.0).abs() < f64::EPSILON);
        assert!((table.multiplier(Element::Fire, Element::Fire) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_neutral_entries_ignored() {
        let mut table = ElementTable::new();
        table.set(Element::Neutral, Element::Fire, 3.0);
        assert!(table.is_empty());
    }
}
