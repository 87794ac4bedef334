//! StatBlock - Attributes, resource caps and current HP/SP

mod buff;
mod computed;
mod stat_value;

pub use buff::{BuffModifier, TimedBuff};
pub use stat_value::StatValue;

use crate::config::ProgressionConstants;
use crate::types::Stat;
use serde::{Deserialize, Serialize};

/// Plain base values for the six attributes, as found in configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseAttributes {
    #[serde(default = "default_str")]
    pub str: f64,
    #[serde(default = "default_vit")]
    pub vit: f64,
    #[serde(default = "default_agi")]
    pub agi: f64,
    #[serde(default = "default_dex")]
    pub dex: f64,
    #[serde(default = "default_int")]
    pub int: f64,
    #[serde(default = "default_luk")]
    pub luk: f64,
}

impl Default for BaseAttributes {
    fn default() -> Self {
        BaseAttributes {
            str: default_str(),
            vit: default_vit(),
            agi: default_agi(),
            dex: default_dex(),
            int: default_int(),
            luk: default_luk(),
        }
    }
}

fn default_str() -> f64 {
    10.0
}
fn default_vit() -> f64 {
    8.0
}
fn default_agi() -> f64 {
    5.0
}
fn default_dex() -> f64 {
    5.0
}
fn default_int() -> f64 {
    3.0
}
fn default_luk() -> f64 {
    1.0
}

/// The six attributes, each kept as a layered [`StatValue`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub str: StatValue,
    pub vit: StatValue,
    pub agi: StatValue,
    pub dex: StatValue,
    pub int: StatValue,
    pub luk: StatValue,
}

impl Attributes {
    pub fn from_base(base: &BaseAttributes) -> Self {
        Attributes {
            str: StatValue::with_base(base.str),
            vit: StatValue::with_base(base.vit),
            agi: StatValue::with_base(base.agi),
            dex: StatValue::with_base(base.dex),
            int: StatValue::with_base(base.int),
            luk: StatValue::with_base(base.luk),
        }
    }

    pub fn get(&self, stat: Stat) -> &StatValue {
        match stat {
            Stat::Str => &self.str,
            Stat::Vit => &self.vit,
            Stat::Agi => &self.agi,
            Stat::Dex => &self.dex,
            Stat::Int => &self.int,
            Stat::Luk => &self.luk,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut StatValue {
        match stat {
            Stat::Str => &mut self.str,
            Stat::Vit => &mut self.vit,
            Stat::Agi => &mut self.agi,
            Stat::Dex => &mut self.dex,
            Stat::Int => &mut self.int,
            Stat::Luk => &mut self.luk,
        }
    }
}

/// Complete stat state for an entity
///
/// Max HP/SP are cached: they only change when [`StatBlock::derive_caps`] is
/// called, which owners do on level-up and after any attribute change.
/// Current HP/SP are kept within `[0, max]` by every mutator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub attributes: Attributes,
    max_hp: f64,
    max_sp: f64,
    current_hp: f64,
    current_sp: f64,
    /// Extra max SP outside the level/INT formula (job bonuses)
    pub bonus_max_sp: f64,
    #[serde(default)]
    buffs: Vec<TimedBuff>,
}

impl StatBlock {
    /// Create a stat block with caps derived for `level` and resources full
    pub fn new(base: &BaseAttributes, level: u32, progression: &ProgressionConstants) -> Self {
        let mut block = StatBlock {
            attributes: Attributes::from_base(base),
            max_hp: 0.0,
            max_sp: 0.0,
            current_hp: 0.0,
            current_sp: 0.0,
            bonus_max_sp: 0.0,
            buffs: Vec::new(),
        };
        block.derive_caps(level, progression);
        block.refill();
        block
    }

    /// Effective value of an attribute
    pub fn stat(&self, stat: Stat) -> f64 {
        self.attributes.get(stat).compute()
    }

    /// Apply a reversible delta to an attribute (equipment layer)
    ///
    /// The stored delta is kept as-is; only the effective value is clamped
    /// at zero, so applying `-amount` later restores the previous value.
    pub fn apply_delta(&mut self, stat: Stat, amount: f64) {
        self.attributes.get_mut(stat).add_flat(amount);
    }

    /// Permanently grow an attribute (level-up, job change), clamped at zero
    pub fn raise_base(&mut self, stat: Stat, amount: f64) {
        self.attributes.get_mut(stat).add_base(amount);
    }

    /// Recompute max HP/SP for `level` and clamp current values
    pub fn derive_caps(&mut self, level: u32, progression: &ProgressionConstants) {
        self.max_hp = progression.base_hp_at(level) + self.stat(Stat::Vit) * progression.hp_per_vit;
        self.max_sp = progression.base_sp_at(level)
            + self.stat(Stat::Int) * progression.sp_per_int
            + self.bonus_max_sp;
        self.current_hp = self.current_hp.clamp(0.0, self.max_hp);
        self.current_sp = self.current_sp.clamp(0.0, self.max_sp);
        self.check_invariants();
    }

    pub fn max_hp(&self) -> f64 {
        self.max_hp
    }

    pub fn max_sp(&self) -> f64 {
        self.max_sp
    }

    pub fn current_hp(&self) -> f64 {
        self.current_hp
    }

    pub fn current_sp(&self) -> f64 {
        self.current_sp
    }

    /// Set current HP, clamped to `[0, max]`
    ///
    /// Returns true when HP ended at zero; the caller decides what death means.
    pub fn set_current_hp(&mut self, value: f64) -> bool {
        self.current_hp = value.clamp(0.0, self.max_hp);
        self.check_invariants();
        self.current_hp <= 0.0
    }

    /// Set current SP, clamped to `[0, max]`
    pub fn set_current_sp(&mut self, value: f64) {
        self.current_sp = value.clamp(0.0, self.max_sp);
        self.check_invariants();
    }

    /// Subtract damage from HP, returning true if HP was depleted
    pub fn take_damage(&mut self, amount: f64) -> bool {
        self.set_current_hp(self.current_hp - amount.max(0.0))
    }

    /// Heal HP by amount, capped at max
    pub fn heal(&mut self, amount: f64) {
        self.set_current_hp(self.current_hp + amount.max(0.0));
    }

    /// Restore SP by amount, capped at max
    pub fn restore_sp(&mut self, amount: f64) {
        self.set_current_sp(self.current_sp + amount.max(0.0));
    }

    /// Spend SP if enough is available
    pub fn spend_sp(&mut self, cost: f64) -> bool {
        if self.current_sp < cost {
            return false;
        }
        self.set_current_sp(self.current_sp - cost);
        true
    }

    /// Set HP and SP to max
    pub fn refill(&mut self) {
        self.current_hp = self.max_hp;
        self.current_sp = self.max_sp;
    }

    pub fn is_depleted(&self) -> bool {
        self.current_hp <= 0.0
    }

    // === Buff Methods ===

    /// Apply a timed buff; reapplying the same id refreshes its duration
    ///
    /// Caps are not touched here, call [`StatBlock::derive_caps`] afterwards.
    pub fn apply_buff(&mut self, buff: TimedBuff) {
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.buff_id == buff.buff_id) {
            existing.duration_remaining = existing.duration_remaining.max(buff.duration_remaining);
            return;
        }
        for modifier in &buff.modifiers {
            self.attributes.get_mut(modifier.stat).add_more(modifier.more);
        }
        self.buffs.push(buff);
    }

    /// Remove a buff by ID, returning true if it was active
    pub fn remove_buff(&mut self, buff_id: &str) -> bool {
        let Some(idx) = self.buffs.iter().position(|b| b.buff_id == buff_id) else {
            return false;
        };
        let buff = self.buffs.remove(idx);
        self.strip_modifiers(&buff);
        true
    }

    /// Tick all buffs by delta time, removing expired ones
    ///
    /// Returns the expired buffs so the owner can recompute caps.
    pub fn tick_buffs(&mut self, delta: f64) -> Vec<TimedBuff> {
        let mut expired = Vec::new();
        let mut kept = Vec::with_capacity(self.buffs.len());
        for mut buff in std::mem::take(&mut self.buffs) {
            if buff.tick(delta) {
                kept.push(buff);
            } else {
                expired.push(buff);
            }
        }
        self.buffs = kept;
        for buff in &expired {
            self.strip_modifiers(buff);
        }
        expired
    }

    pub fn has_buff(&self, buff_id: &str) -> bool {
        self.buffs.iter().any(|b| b.buff_id == buff_id)
    }

    pub fn active_buffs(&self) -> &[TimedBuff] {
        &self.buffs
    }

    fn strip_modifiers(&mut self, buff: &TimedBuff) {
        for modifier in &buff.modifiers {
            let removed = self.attributes.get_mut(modifier.stat).remove_more(modifier.more);
            debug_assert!(removed, "buff {} modifier missing from {:?}", buff.buff_id, modifier.stat);
        }
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.current_hp >= 0.0 && self.current_hp <= self.max_hp,
            "hp {} outside [0, {}]",
            self.current_hp,
            self.max_hp
        );
        debug_assert!(
            self.current_sp >= 0.0 && self.current_sp <= self.max_sp,
            "sp {} outside [0, {}]",
            self.current_sp,
            self.max_sp
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> StatBlock {
        StatBlock::new(&BaseAttributes::default(), 1, &ProgressionConstants::default())
    }

    #[test]
    fn test_derived_caps() {
        let block = block();
        // 100 + 8 vit × 5
        assert!((block.max_hp() - 140.0).abs() < f64::EPSILON);
        // 50 + 3 int × 3
        assert!((block.max_sp() - 59.0).abs() < f64::EPSILON);
        assert!((block.current_hp() - 140.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_caps_are_cached_until_derived() {
        let mut block = block();
        block.apply_delta(Stat::Vit, 10.0);
        assert!((block.max_hp() - 140.0).abs() < f64::EPSILON);
        block.derive_caps(1, &ProgressionConstants::default());
        assert!((block.max_hp() - 190.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hp_clamped() {
        let mut block = block();
        assert!(!block.set_current_hp(1000.0));
        assert!((block.current_hp() - block.max_hp()).abs() < f64::EPSILON);
        assert!(block.set_current_hp(-50.0));
        assert!((block.current_hp() - 0.0).abs() < f64::EPSILON);
        assert!(block.is_depleted());
    }

    #[test]
    fn test_lower_cap_clamps_current() {
        let mut block = block();
        block.apply_delta(Stat::Vit, -8.0);
        block.derive_caps(1, &ProgressionConstants::default());
        assert!((block.max_hp() - 100.0).abs() < f64::EPSILON);
        assert!((block.current_hp() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_spend_sp() {
        let mut block = block();
        block.set_current_sp(15.0);
        assert!(!block.spend_sp(20.0));
        assert!((block.current_sp() - 15.0).abs() < f64::EPSILON);
        assert!(block.spend_sp(15.0));
        assert!((block.current_sp() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_effective_stat_never_negative() {
        let mut block = block();
        block.apply_delta(Stat::Luk, -10.0);
        assert!((block.stat(Stat::Luk) - 0.0).abs() < f64::EPSILON);
        block.apply_delta(Stat::Luk, 10.0);
        assert!((block.stat(Stat::Luk) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_buff_lifecycle() {
        let mut block = block();
        block.apply_buff(TimedBuff::new("berserk", "Berserk", 2.0).with_modifier(Stat::Str, 0.5));
        assert!((block.stat(Stat::Str) - 15.0).abs() < 1e-9);

        // Refresh does not stack the multiplier
        block.apply_buff(TimedBuff::new("berserk", "Berserk", 3.0).with_modifier(Stat::Str, 0.5));
        assert!((block.stat(Stat::Str) - 15.0).abs() < 1e-9);

        assert!(block.tick_buffs(2.0).is_empty());
        let expired = block.tick_buffs(1.5);
        assert_eq!(expired.len(), 1);
        assert!((block.stat(Stat::Str) - 10.0).abs() < 1e-9);
        assert!(!block.has_buff("berserk"));
    }

    #[test]
    fn test_remove_buff() {
        let mut block = block();
        block.apply_buff(TimedBuff::new("guard", "Guard", 5.0).with_modifier(Stat::Vit, 0.25));
        assert!(block.remove_buff("guard"));
        assert!(!block.remove_buff("guard"));
        assert!((block.stat(Stat::Vit) - 8.0).abs() < 1e-9);
    }
}
