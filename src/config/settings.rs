//! Configuration settings for the askpass helper and audit logging.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an alternate config file path.
///
/// The askpass helper takes no command line arguments, so this is the only
/// way to point it at a non-default configuration.
pub const CONFIG_PATH_ENV: &str = "DEXEC_ASKPASS_CONFIG";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dexec/askpass.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub askpass: AskpassConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Secret capture configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AskpassConfig {
    /// How long to wait for input on stdin, in milliseconds.
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_timeout_millis() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for AskpassConfig {
    fn default() -> Self {
        Self {
            timeout_millis: default_timeout_millis(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let settings: Settings = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Locate and load settings for the helper process.
    ///
    /// Order: the path in [`CONFIG_PATH_ENV`] if set (an error there is
    /// fatal), then [`DEFAULT_CONFIG_PATH`] if it exists, otherwise
    /// built-in defaults.
    pub fn discover() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::load(path);
        }
        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            return Self::load(DEFAULT_CONFIG_PATH);
        }
        Ok(Self::default())
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.askpass.timeout_millis == 0 {
            return Err(ConfigError::Invalid {
                message: "askpass.timeout_millis must be greater than zero".to_string(),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        Ok(())
    }
}
