//! Equipment ledger - Reversible stat contributions from equipped items
//!
//! Each equipped item keeps a record of the exact deltas it added to the
//! owner's [`StatBlock`], so unequipping subtracts precisely those deltas no
//! matter what else was equipped or removed in between.

mod item;

pub use item::{Item, StatBonus};

use crate::stat_block::StatBlock;
use crate::types::{EquipmentSlot, Job, Stat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Equip/unequip failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquipError {
    #[error("{item} requires job {required:?}, character is {actual:?}")]
    SlotIncompatible {
        item: String,
        required: Job,
        actual: Job,
    },
    #[error("{item} requires level {required}, character is level {actual}")]
    LevelTooLow {
        item: String,
        required: u32,
        actual: u32,
    },
    #[error("{0:?} slot is already occupied")]
    SlotOccupied(EquipmentSlot),
    #[error("all {0:?} slots are full")]
    SlotFull(EquipmentSlot),
    #[error("nothing equipped in {0:?} slot")]
    SlotEmpty(EquipmentSlot),
}

/// Record of one equipped item and the deltas it applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub item: Item,
    pub deltas: Vec<(Stat, f64)>,
}

/// Which item occupies which slot, and what it contributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentLedger {
    slots: BTreeMap<EquipmentSlot, Vec<Option<LedgerEntry>>>,
}

impl Default for EquipmentLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentLedger {
    pub fn new() -> Self {
        let slots = EquipmentSlot::all()
            .iter()
            .map(|slot| (*slot, vec![None; slot.capacity()]))
            .collect();
        EquipmentLedger { slots }
    }

    /// Equip an item, applying its stat deltas to `stats`
    ///
    /// Single slots are never replaced silently; unequip first.
    /// Returns the index the item was placed at.
    pub fn equip(
        &mut self,
        item: Item,
        job: Job,
        level: u32,
        stats: &mut StatBlock,
    ) -> Result<usize, EquipError> {
        if let Some(required) = item.required_job {
            if required != job {
                return Err(EquipError::SlotIncompatible {
                    item: item.id.clone(),
                    required,
                    actual: job,
                });
            }
        }
        if item.required_level > level {
            return Err(EquipError::LevelTooLow {
                item: item.id.clone(),
                required: item.required_level,
                actual: level,
            });
        }

        let slot = item.slot;
        let entries = self.slot_entries_mut(slot);
        let index = match entries.iter().position(Option::is_none) {
            Some(index) => index,
            None if slot.is_multi() => return Err(EquipError::SlotFull(slot)),
            None => return Err(EquipError::SlotOccupied(slot)),
        };

        let deltas: Vec<(Stat, f64)> = item.stats.iter().map(|b| (b.stat, b.value)).collect();
        for (stat, amount) in &deltas {
            stats.apply_delta(*stat, *amount);
        }
        debug!(item = %item.id, ?slot, index, "equipped");
        entries[index] = Some(LedgerEntry { item, deltas });

        self.verify(stats);
        Ok(index)
    }

    /// Unequip the item at `slot`/`index`, reversing exactly its recorded deltas
    ///
    /// Without an index, single slots use their only position and multi slots
    /// release the highest occupied index.
    pub fn unequip(
        &mut self,
        slot: EquipmentSlot,
        index: Option<usize>,
        stats: &mut StatBlock,
    ) -> Result<Item, EquipError> {
        let entries = self.slot_entries_mut(slot);
        let index = match index {
            Some(index) => index,
            None => entries
                .iter()
                .rposition(Option::is_some)
                .ok_or(EquipError::SlotEmpty(slot))?,
        };
        let entry = entries
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(EquipError::SlotEmpty(slot))?;

        for (stat, amount) in &entry.deltas {
            stats.apply_delta(*stat, -amount);
        }
        debug!(item = %entry.item.id, ?slot, index, "unequipped");

        self.verify(stats);
        Ok(entry.item)
    }

    /// Item at a slot position
    pub fn equipped(&self, slot: EquipmentSlot, index: usize) -> Option<&Item> {
        self.slots
            .get(&slot)
            .and_then(|entries| entries.get(index))
            .and_then(|entry| entry.as_ref())
            .map(|entry| &entry.item)
    }

    /// The equipped weapon, if any
    pub fn weapon(&self) -> Option<&Item> {
        self.equipped(EquipmentSlot::Weapon, 0)
    }

    /// All equipped items with their slot and index
    pub fn all_equipped(&self) -> impl Iterator<Item = (EquipmentSlot, usize, &Item)> {
        self.slots.iter().flat_map(|(slot, entries)| {
            entries
                .iter()
                .enumerate()
                .filter_map(move |(index, entry)| entry.as_ref().map(|e| (*slot, index, &e.item)))
        })
    }

    /// Total delta currently contributed to a stat by all equipped items
    pub fn contribution(&self, stat: Stat) -> f64 {
        self.slots
            .values()
            .flatten()
            .flatten()
            .flat_map(|entry| entry.deltas.iter())
            .filter(|(s, _)| *s == stat)
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Check that the stat block's equipment layer matches this ledger
    fn verify(&self, stats: &StatBlock) {
        for stat in Stat::all() {
            let recorded = self.contribution(*stat);
            let applied = stats.attributes.get(*stat).flat;
            debug_assert!(
                (recorded - applied).abs() < 1e-9,
                "ledger records {recorded} {stat:?} but stat block holds {applied}"
            );
        }
    }

    fn slot_entries_mut(&mut self, slot: EquipmentSlot) -> &mut Vec<Option<LedgerEntry>> {
        self.slots
            .entry(slot)
            .or_insert_with(|| vec![None; slot.capacity()])
    }
}
