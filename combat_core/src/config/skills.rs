//! Skill configuration loading

use super::ConfigError;
use crate::skill::{Skill, SkillLibrary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for skill configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(rename = "skills")]
    pub skills: Vec<Skill>,
}

/// Load skill configurations from a TOML file
pub fn load_skill_configs(path: &Path) -> Result<SkillLibrary, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    build_library(config)
}

/// Load skill configurations from a TOML string
pub fn parse_skill_configs(content: &str) -> Result<SkillLibrary, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    build_library(config)
}

fn build_library(config: SkillsConfig) -> Result<SkillLibrary, ConfigError> {
    for skill in &config.skills {
        validate_skill(skill)?;
    }
    Ok(config.skills.into_iter().collect())
}

fn validate_skill(skill: &Skill) -> Result<(), ConfigError> {
    let numbers = [
        ("sp_cost", skill.sp_cost),
        ("cast_time", skill.cast_time),
        ("cooldown", skill.cooldown),
    ];
    for (field, value) in numbers {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "skill {}: {field} must be a non-negative number, got {value}",
                skill.id
            )));
        }
    }
    Ok(())
}

/// Get default skill configurations
pub fn default_skills() -> SkillLibrary {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_configs(toml).unwrap_or_else(|err| {
        warn!(%err, "bundled skills failed to load");
        SkillLibrary::new()
    })
}
