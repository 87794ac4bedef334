//! Configuration loading from TOML files

mod constants;
mod elements;
mod skills;

pub use constants::{CombatConstants, GameConstants, ProgressionConstants, RageConstants};
pub use elements::{load_element_table, parse_element_table};
pub use skills::{default_skills, load_skill_configs, parse_skill_configs};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load game constants, falling back to defaults for anything left out
pub fn load_constants(path: &Path) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = load_toml(path)?;
    validate_constants(&constants)?;
    Ok(constants)
}

/// Parse game constants from a TOML string
pub fn parse_constants(content: &str) -> Result<GameConstants, ConfigError> {
    let constants: GameConstants = parse_toml(content)?;
    validate_constants(&constants)?;
    Ok(constants)
}

fn validate_constants(constants: &GameConstants) -> Result<(), ConfigError> {
    let combat = &constants.combat;
    if combat.combo_window < 0.0 || combat.combo_decay < 0.0 {
        return Err(ConfigError::ValidationError(
            "combo timings must not be negative".to_string(),
        ));
    }
    if combat.combo_decay < combat.combo_window {
        return Err(ConfigError::ValidationError(format!(
            "combo_decay {} shorter than combo_window {}",
            combat.combo_decay, combat.combo_window
        )));
    }
    if constants.progression.exp_base < 1.0 || constants.progression.exp_growth < 1.0 {
        return Err(ConfigError::ValidationError(
            "experience curve must start at 1 and never shrink".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&constants.progression.death_restore_fraction) {
        return Err(ConfigError::ValidationError(format!(
            "death_restore_fraction {} outside [0, 1]",
            constants.progression.death_restore_fraction
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_constants() {
        let toml = r#"
[combat]
crit_multiplier = 1.5

[progression]
exp_base = 200
"#;
        let constants = parse_constants(toml).unwrap();
        assert!((constants.combat.crit_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((constants.combat.combo_window - 0.5).abs() < f64::EPSILON);
        assert!((constants.progression.exp_base - 200.0).abs() < f64::EPSILON);
        assert_eq!(constants.rage.berserk_threshold, 100);
    }

    #[test]
    fn test_rejects_bad_restore_fraction() {
        let toml = r#"
[progression]
death_restore_fraction = 1.5
"#;
        assert!(matches!(
            parse_constants(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_decay_inside_window() {
        let toml = r#"
[combat]
combo_window = 0.8
combo_decay = 0.5
"#;
        assert!(matches!(
            parse_constants(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_constants(Path::new("/nonexistent/constants.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
