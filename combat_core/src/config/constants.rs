//! Game constants configuration

use serde::{Deserialize, Serialize};

/// Tunable game constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConstants {
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub progression: ProgressionConstants,
    #[serde(default)]
    pub rage: RageConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Seconds after a hit during which the same attacker's next hit is a combo
    #[serde(default = "default_combo_window")]
    pub combo_window: f64,
    /// Seconds of inactivity after which the combo counter decays to zero
    #[serde(default = "default_combo_decay")]
    pub combo_decay: f64,
    /// Damage bonus per combo count (0.1 = +10% per hit)
    #[serde(default = "default_combo_bonus_per_hit")]
    pub combo_bonus_per_hit: f64,
    /// Damage multiplier applied on a critical hit
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Critical chance granted per point of DEX
    #[serde(default = "default_per_dex")]
    pub crit_chance_per_dex: f64,
    /// Flat damage reduction per point of target VIT
    #[serde(default = "default_defense_per_vit")]
    pub defense_per_vit: f64,
    /// Skill damage added per point of attacker INT
    #[serde(default = "default_skill_int_scaling")]
    pub skill_int_scaling: f64,
    /// Cast time reduction per point of DEX (0.01 = 1%)
    #[serde(default = "default_per_dex")]
    pub cast_reduction_per_dex: f64,
    /// Lowest damage a hit can deal
    #[serde(default = "default_minimum_damage")]
    pub minimum_damage: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            combo_window: default_combo_window(),
            combo_decay: default_combo_decay(),
            combo_bonus_per_hit: default_combo_bonus_per_hit(),
            crit_multiplier: default_crit_multiplier(),
            crit_chance_per_dex: default_per_dex(),
            defense_per_vit: default_defense_per_vit(),
            skill_int_scaling: default_skill_int_scaling(),
            cast_reduction_per_dex: default_per_dex(),
            minimum_damage: default_minimum_damage(),
        }
    }
}

fn default_combo_window() -> f64 {
    0.5
}
fn default_combo_decay() -> f64 {
    1.0
}
fn default_combo_bonus_per_hit() -> f64 {
    0.1
}
fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_per_dex() -> f64 {
    0.01
}
fn default_defense_per_vit() -> f64 {
    0.8
}
fn default_skill_int_scaling() -> f64 {
    0.5
}
fn default_minimum_damage() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConstants {
    /// Max HP at level 1 before VIT
    #[serde(default = "default_base_hp")]
    pub base_hp: f64,
    /// Max HP gained per level
    #[serde(default = "default_hp_per_level")]
    pub hp_per_level: f64,
    /// Max HP per point of VIT
    #[serde(default = "default_hp_per_vit")]
    pub hp_per_vit: f64,
    /// Max SP at level 1 before INT
    #[serde(default = "default_base_sp")]
    pub base_sp: f64,
    /// Max SP gained per level
    #[serde(default = "default_sp_per_level")]
    pub sp_per_level: f64,
    /// Max SP per point of INT
    #[serde(default = "default_sp_per_int")]
    pub sp_per_int: f64,
    /// Experience needed to leave level 1
    #[serde(default = "default_exp_base")]
    pub exp_base: f64,
    /// Growth factor of the experience curve per level
    #[serde(default = "default_exp_growth")]
    pub exp_growth: f64,
    /// Fraction of the level's experience requirement lost on death
    #[serde(default = "default_death_exp_penalty")]
    pub death_exp_penalty: f64,
    /// Fraction of max HP/SP restored on death
    #[serde(default = "default_death_restore_fraction")]
    pub death_restore_fraction: f64,
    /// Minimum level for leaving the novice job
    #[serde(default = "default_job_change_level")]
    pub job_change_level: u32,
}

impl Default for ProgressionConstants {
    fn default() -> Self {
        ProgressionConstants {
            base_hp: default_base_hp(),
            hp_per_level: default_hp_per_level(),
            hp_per_vit: default_hp_per_vit(),
            base_sp: default_base_sp(),
            sp_per_level: default_sp_per_level(),
            sp_per_int: default_sp_per_int(),
            exp_base: default_exp_base(),
            exp_growth: default_exp_growth(),
            death_exp_penalty: default_death_exp_penalty(),
            death_restore_fraction: default_death_restore_fraction(),
            job_change_level: default_job_change_level(),
        }
    }
}

impl ProgressionConstants {
    /// Max HP contributed by level alone
    pub fn base_hp_at(&self, level: u32) -> f64 {
        self.base_hp + self.hp_per_level * level.saturating_sub(1) as f64
    }

    /// Max SP contributed by level alone
    pub fn base_sp_at(&self, level: u32) -> f64 {
        self.base_sp + self.sp_per_level * level.saturating_sub(1) as f64
    }
}

fn default_base_hp() -> f64 {
    100.0
}
fn default_hp_per_level() -> f64 {
    20.0
}
fn default_hp_per_vit() -> f64 {
    5.0
}
fn default_base_sp() -> f64 {
    50.0
}
fn default_sp_per_level() -> f64 {
    10.0
}
fn default_sp_per_int() -> f64 {
    3.0
}
fn default_exp_base() -> f64 {
    100.0
}
fn default_exp_growth() -> f64 {
    1.2
}
fn default_death_exp_penalty() -> f64 {
    0.05
}
fn default_death_restore_fraction() -> f64 {
    0.3
}
fn default_job_change_level() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RageConstants {
    /// Rage gained by the attacker on every combo hit
    #[serde(default = "default_per_combo_hit")]
    pub per_combo_hit: u32,
    /// Rage needed to enter berserk
    #[serde(default = "default_berserk_threshold")]
    pub berserk_threshold: u32,
    /// More% STR while berserk
    #[serde(default = "default_berserk_strength_more")]
    pub berserk_strength_more: f64,
    /// More% VIT while berserk (negative)
    #[serde(default = "default_berserk_vitality_more")]
    pub berserk_vitality_more: f64,
    /// Berserk duration in seconds
    #[serde(default = "default_berserk_duration")]
    pub berserk_duration: f64,
}

impl Default for RageConstants {
    fn default() -> Self {
        RageConstants {
            per_combo_hit: default_per_combo_hit(),
            berserk_threshold: default_berserk_threshold(),
            berserk_strength_more: default_berserk_strength_more(),
            berserk_vitality_more: default_berserk_vitality_more(),
            berserk_duration: default_berserk_duration(),
        }
    }
}

fn default_per_combo_hit() -> u32 {
    5
}
fn default_berserk_threshold() -> u32 {
    100
}
fn default_berserk_strength_more() -> f64 {
    0.5
}
fn default_berserk_vitality_more() -> f64 {
    -0.3
}
fn default_berserk_duration() -> f64 {
    10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = GameConstants::default();
        assert!((constants.combat.combo_window - 0.5).abs() < f64::EPSILON);
        assert!((constants.combat.crit_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((constants.progression.death_restore_fraction - 0.3).abs() < f64::EPSILON);
        assert_eq!(constants.rage.berserk_threshold, 100);
    }

    #[test]
    fn test_base_caps_by_level() {
        let progression = ProgressionConstants::default();
        assert!((progression.base_hp_at(1) - 100.0).abs() < f64::EPSILON);
        assert!((progression.base_hp_at(3) - 140.0).abs() < f64::EPSILON);
        assert!((progression.base_sp_at(2) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[combat]
crit_multiplier = 1.5
combo_window = 0.4

[progression]
job_change_level = 5
"#;

        let constants: GameConstants = toml::from_str(toml).unwrap();
        assert!((constants.combat.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((constants.combat.combo_window - 0.4).abs() < f64::EPSILON);
        // Unspecified fields keep their defaults
        assert!((constants.combat.defense_per_vit - 0.8).abs() < f64::EPSILON);
        assert_eq!(constants.progression.job_change_level, 5);
        assert_eq!(constants.rage.per_combo_hit, 5);
    }
}
