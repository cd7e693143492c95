use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::core::layout::{WidthMode, WidthPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Column width policy: "fixed", "max" or "mode"
    pub width_mode: String,

    /// Width used by the fixed policy
    pub fixed_width: u16,

    /// Cells between columns
    pub column_gap: u16,

    /// Cap applied to every computed width
    pub max_column_width: u16,

    /// Floor applied to every computed width
    pub min_column_width: u16,

    /// The mode policy uses the maximum length when the modal length is
    /// within this percentage of it
    pub mode_slack_percent: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Wrap width for the full-cell popup
    pub popup_wrap_width: u16,

    /// Attempt to copy yanked cells to the system clipboard
    pub clipboard: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width_mode: "max".to_string(),
            fixed_width: 20,
            column_gap: 2,
            max_column_width: 250,
            min_column_width: 3,
            mode_slack_percent: 25,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            popup_wrap_width: 78,
            clipboard: true,
        }
    }
}

impl Config {
    /// Load config from the default location, creating it with defaults on
    /// first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("gridview").join("config.toml"))
    }

    /// The width policy the display settings describe; an unknown
    /// `width_mode` string falls back to "max".
    pub fn width_policy(&self) -> WidthPolicy {
        WidthPolicy {
            mode: WidthMode::from_name(&self.display.width_mode).unwrap_or(WidthMode::Max),
            fixed: self.display.fixed_width,
            min: self.display.min_column_width,
            max: self.display.max_column_width,
            mode_slack_percent: self.display.mode_slack_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.width_mode, "max");
        assert_eq!(config.display.column_gap, 2);
        assert!(config.behavior.clipboard);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.display.max_column_width, 250);
        assert_eq!(parsed.behavior.popup_wrap_width, 78);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[display]\ncolumn_gap = 4\n").unwrap();
        assert_eq!(parsed.display.column_gap, 4);
        assert_eq!(parsed.display.width_mode, "max");
    }

    #[test]
    fn unknown_width_mode_falls_back_to_max() {
        let mut config = Config::default();
        config.display.width_mode = "bogus".into();
        assert_eq!(config.width_policy().mode, WidthMode::Max);
    }
}
