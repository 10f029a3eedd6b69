// src/config/loader.rs
//! Configuration loader with layered TOML files and environment overrides

use crate::config::ConditioningConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variables with this prefix override file values
pub const DEFAULT_ENV_PREFIX: &str = "EMG_COND_";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parse error: {0}")]
    Parse(String),

    #[error("Configuration validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Loads `ConditioningConfig` from defaults, then each file in order, then the environment
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Loader over the conventional local config locations
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// Loader over explicit paths; later paths take precedence
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
        }
    }

    /// Replace the environment prefix, or disable overrides with `None`
    pub fn with_env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Load, merge and validate the configuration
    pub fn load(&self) -> Result<ConditioningConfig, ConfigError> {
        let mut merged = toml::Value::try_from(ConditioningConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        for config_path in &self.config_paths {
            if !config_path.exists() {
                continue;
            }
            debug!(path = %config_path.display(), "merging configuration file");
            let file_config = Self::load_config_file(config_path)?;
            merge_toml_values(&mut merged, file_config);
        }

        if let Some(prefix) = &self.env_prefix {
            apply_environment_overrides(&mut merged, prefix);
        }

        let config: ConditioningConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Parse and validate a configuration from TOML text
    pub fn load_from_str(content: &str) -> Result<ConditioningConfig, ConfigError> {
        let config: ConditioningConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a configuration file without loading it into a loader
    pub fn validate_config_file<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content).map(|_| ())
    }

    /// Write a configuration to a TOML file
    pub fn export_config<P: AsRef<Path>>(config: &ConditioningConfig, path: P) -> Result<(), ConfigError> {
        let toml_content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;

        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn load_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("config/conditioning.toml"),
            PathBuf::from("conditioning.toml"),
        ]
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides(config: &mut toml::Value, prefix: &str) {
    let toml::Value::Table(table) = config else {
        return;
    };

    for (key, value) in std::env::vars() {
        let Some(field) = key.strip_prefix(prefix) else {
            continue;
        };
        let field = field.to_lowercase();
        if !table.contains_key(&field) {
            warn!(variable = %key, "ignoring override for unknown configuration field");
            continue;
        }
        debug!(variable = %key, field = %field, "applying environment override");
        table.insert(field, parse_env_value(&value));
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}
