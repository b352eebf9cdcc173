//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::{validate_choice, FaultlineConfig, COLOR_MODES, LOG_BACKENDS};
use crate::{ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.faultline/config.toml) - lowest priority
/// 2. Project config (./faultline.toml) - overrides global
/// 3. Environment variables (FAULTLINE_*) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective settings after merging every source
    pub settings: FaultlineConfig,

    /// Project root directory (where faultline.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Use an explicit global config file instead of ~/.faultline/config.toml
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find faultline.toml, merges it over the
    /// global config if one exists, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = find_project_config(start_dir)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&project_config);
        apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = FaultlineConfig::load_from_file(config_path)?;

        let mut settings = self.load_global_config()?;
        settings.merge(&project_config);
        apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Load global configuration; a missing file yields the defaults
    fn load_global_config(&mut self) -> ConfigResult<FaultlineConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match FaultlineConfig::global_config_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory means no global config
                Err(ConfigError::HomeNotFound) => return Ok(FaultlineConfig::default()),
                Err(e) => return Err(e),
            },
        };

        if !path.exists() {
            return Ok(FaultlineConfig::default());
        }

        FaultlineConfig::load_from_file(&path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the nearest faultline.toml at or above `start_dir`
fn find_project_config(start_dir: &Path) -> ConfigResult<(Option<PathBuf>, FaultlineConfig)> {
    // A relative path has no parents to walk; anchor it at the working directory
    let anchored = if start_dir.is_absolute() {
        start_dir.to_path_buf()
    } else {
        env::current_dir()?.join(start_dir)
    };
    let mut current: PathBuf = anchored.components().collect();

    loop {
        let config_path = current.join(PROJECT_CONFIG_FILE);

        if config_path.exists() {
            let project_config = FaultlineConfig::load_from_file(&config_path)?;
            return Ok((Some(current), project_config));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return Ok((None, FaultlineConfig::default())),
        }
    }
}

/// Apply FAULTLINE_* environment variables
///
/// - FAULTLINE_MAX_FRAMES=<n>
/// - FAULTLINE_SHOW_ADDRESSES=true|false
/// - FAULTLINE_COLOR=auto|always|never
/// - FAULTLINE_LOG=stderr|memory|none
fn apply_env_overrides(config: &mut FaultlineConfig) -> ConfigResult<()> {
    if let Ok(raw) = env::var("FAULTLINE_MAX_FRAMES") {
        let max_frames = raw
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "FAULTLINE_MAX_FRAMES".to_string(),
                reason: format!("expected a positive integer, got '{}'", raw),
            })?;
        config.report.get_or_insert_with(Default::default).max_frames = Some(max_frames);
    }

    if let Ok(raw) = env::var("FAULTLINE_SHOW_ADDRESSES") {
        let show = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
            field: "FAULTLINE_SHOW_ADDRESSES".to_string(),
            reason: format!("expected true or false, got '{}'", raw),
        })?;
        config.report.get_or_insert_with(Default::default).show_addresses = Some(show);
    }

    if let Ok(color) = env::var("FAULTLINE_COLOR") {
        validate_choice("FAULTLINE_COLOR", &color, COLOR_MODES)?;
        config.report.get_or_insert_with(Default::default).color = Some(color);
    }

    if let Ok(backend) = env::var("FAULTLINE_LOG") {
        validate_choice("FAULTLINE_LOG", &backend, LOG_BACKENDS)?;
        config.logging.get_or_insert_with(Default::default).backend = Some(backend);
    }

    Ok(())
}

/// Parse a boolean environment value
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Maximum frames per report; `None` means unbounded
    pub fn max_frames(&self) -> Option<usize> {
        self.settings.report.as_ref().and_then(|r| r.max_frames)
    }

    /// Whether raw addresses are always shown (default: false)
    pub fn show_addresses(&self) -> bool {
        self.settings
            .report
            .as_ref()
            .and_then(|r| r.show_addresses)
            .unwrap_or(false)
    }

    /// Color mode (default: "auto")
    pub fn color(&self) -> &str {
        self.settings
            .report
            .as_ref()
            .and_then(|r| r.color.as_deref())
            .unwrap_or("auto")
    }

    /// Logging backend (default: "stderr")
    pub fn log_backend(&self) -> &str {
        self.settings
            .logging
            .as_ref()
            .and_then(|l| l.backend.as_deref())
            .unwrap_or("stderr")
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a faultline.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
