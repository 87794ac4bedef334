//! Element table loading

use super::ConfigError;
use crate::element::{ElementEntry, ElementTable};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for element chart entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementsConfig {
    #[serde(default)]
    pub entries: Vec<ElementEntry>,
}

/// Load an element table from a TOML file
pub fn load_element_table(path: &Path) -> Result<ElementTable, ConfigError> {
    let config: ElementsConfig = super::load_toml(path)?;
    build_table(config)
}

/// Load an element table from a TOML string
pub fn parse_element_table(content: &str) -> Result<ElementTable, ConfigError> {
    let config: ElementsConfig = super::parse_toml(content)?;
    build_table(config)
}

fn build_table(config: ElementsConfig) -> Result<ElementTable, ConfigError> {
    for entry in &config.entries {
        if entry.attack == Element::Neutral || entry.target == Element::Neutral {
            return Err(ConfigError::ValidationError(format!(
                "{:?} -> {:?}: neutral always uses 1.0",
                entry.attack, entry.target
            )));
        }
        if !entry.multiplier.is_finite() || entry.multiplier < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{:?} -> {:?}: multiplier must be a non-negative number",
                entry.attack, entry.target
            )));
        }
    }
    Ok(ElementTable::from_entries(config.entries))
}
