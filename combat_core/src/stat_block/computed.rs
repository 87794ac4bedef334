//! Computed/derived stat calculations for StatBlock

use crate::config::CombatConstants;
use crate::stat_block::StatBlock;
use crate::types::Stat;

/// Base movement speed in units per second
const BASE_MOVE_SPEED: f64 = 100.0;

impl StatBlock {
    /// Critical strike chance as a probability in `[0, 1]`
    pub fn crit_chance(&self, combat: &CombatConstants) -> f64 {
        (self.stat(Stat::Dex) * combat.crit_chance_per_dex).clamp(0.0, 1.0)
    }

    /// Flat damage reduction against incoming hits
    pub fn defense(&self, combat: &CombatConstants) -> f64 {
        self.stat(Stat::Vit) * combat.defense_per_vit
    }

    /// Effective cast time for a skill, reduced by DEX and never negative
    pub fn cast_time(&self, base_cast_time: f64, combat: &CombatConstants) -> f64 {
        (base_cast_time * (1.0 - self.stat(Stat::Dex) * combat.cast_reduction_per_dex)).max(0.0)
    }

    /// Movement speed in units per second
    pub fn move_speed(&self) -> f64 {
        BASE_MOVE_SPEED * (1.0 + self.stat(Stat::Agi) * 0.01)
    }

    /// Calculate HP percentage remaining
    pub fn hp_percent(&self) -> f64 {
        let max = self.max_hp();
        if max <= 0.0 {
            return 0.0;
        }
        (self.current_hp() / max * 100.0).clamp(0.0, 100.0)
    }

    /// Calculate SP percentage remaining
    pub fn sp_percent(&self) -> f64 {
        let max = self.max_sp();
        if max <= 0.0 {
            return 0.0;
        }
        (self.current_sp() / max * 100.0).clamp(0.0, 100.0)
    }
}
