//! Configuration file schema
//!
//! The same schema is used for the project file (`faultline.toml`) and the
//! global file (`~/.faultline/config.toml`).

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Accepted values for `report.color`
pub const COLOR_MODES: &[&str] = &["auto", "always", "never"];

/// Accepted values for `logging.backend`
pub const LOG_BACKENDS: &[&str] = &["stderr", "memory", "none"];

/// Contents of a faultline configuration file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FaultlineConfig {
    /// Fault report rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,

    /// Fault event logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

/// `[report]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Maximum number of frames rendered per report (unbounded when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_frames: Option<usize>,

    /// Always print raw code addresses next to resolved frames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_addresses: Option<bool>,

    /// Terminal colors ("auto", "always", "never")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Where fault events go ("stderr", "memory", "none")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl FaultlineConfig {
    /// Load and validate a configuration file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration text; `origin` is only used for error messages
    pub fn parse(content: &str, origin: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: origin.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate field values that the schema alone cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(report) = &self.report {
            if report.max_frames == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "report.max_frames".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            if let Some(color) = &report.color {
                validate_choice("report.color", color, COLOR_MODES)?;
            }
        }

        if let Some(logging) = &self.logging {
            if let Some(backend) = &logging.backend {
                validate_choice("logging.backend", backend, LOG_BACKENDS)?;
            }
        }

        Ok(())
    }

    /// Get the global config file path (~/.faultline/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".faultline").join("config.toml"))
    }

    /// Merge another config into this one, field by field.
    /// Values set in `other` take precedence.
    pub fn merge(&mut self, other: &FaultlineConfig) {
        if let Some(theirs) = &other.report {
            let ours = self.report.get_or_insert_with(ReportConfig::default);
            if theirs.max_frames.is_some() {
                ours.max_frames = theirs.max_frames;
            }
            if theirs.show_addresses.is_some() {
                ours.show_addresses = theirs.show_addresses;
            }
            if theirs.color.is_some() {
                ours.color = theirs.color.clone();
            }
        }
        if let Some(theirs) = &other.logging {
            let ours = self.logging.get_or_insert_with(LoggingConfig::default);
            if theirs.backend.is_some() {
                ours.backend = theirs.backend.clone();
            }
        }
    }
}

pub(crate) fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if !allowed.contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be one of {}, got '{}'", allowed.join(", "), value),
        });
    }
    Ok(())
}
