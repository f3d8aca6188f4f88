//! Logger configuration.
//!
//! Describes the severity threshold and the two sinks wired up by the log
//! configurator. Configuration is persisted as TOML on disk; every field has a
//! default so a missing or partial file still yields the fixed harness setup.
//!
//! [`crate::logging::get_instance`] always uses the built-in defaults. Callers
//! that want a file-driven setup load an [`RcsConfig`] and pass its `logging`
//! section to [`crate::logging::LogConfigurator::new`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_LEVEL, DEFAULT_PATTERN, LOGGER_NAME, LOG_FILE_NAME,
};
use crate::error::{RcsError, RcsResult};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RcsConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the named logger and its sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Name of the logger, rendered by `%c`.
    #[serde(default = "default_logger_name")]
    pub logger_name: String,

    /// Root severity threshold: trace, debug, info, warn, error.
    #[serde(default = "default_level")]
    pub level: String,

    /// Write log lines to a file.
    #[serde(default = "default_true")]
    pub use_file_sink: bool,

    /// Directory holding the log file.
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Log file name inside `directory`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Line pattern for the file sink.
    #[serde(default = "default_pattern")]
    pub file_pattern: String,

    /// How often the log file rolls over.
    #[serde(default)]
    pub rotation: Rotation,

    /// Write log lines to standard output.
    #[serde(default = "default_true")]
    pub use_console_sink: bool,

    /// Line pattern for the console sink.
    #[serde(default = "default_pattern")]
    pub console_pattern: String,
}

/// Roll-over policy for the file sink.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Single file, appended to forever.
    #[default]
    Never,
    Minutely,
    Hourly,
    Daily,
}

impl From<Rotation> for tracing_appender::rolling::Rotation {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Never => tracing_appender::rolling::Rotation::NEVER,
            Rotation::Minutely => tracing_appender::rolling::Rotation::MINUTELY,
            Rotation::Hourly => tracing_appender::rolling::Rotation::HOURLY,
            Rotation::Daily => tracing_appender::rolling::Rotation::DAILY,
        }
    }
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_logger_name() -> String {
    LOGGER_NAME.to_string()
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_file_name() -> String {
    LOG_FILE_NAME.to_string()
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            logger_name: default_logger_name(),
            level: default_level(),
            use_file_sink: true,
            directory: default_directory(),
            file_name: default_file_name(),
            file_pattern: default_pattern(),
            rotation: Rotation::default(),
            use_console_sink: true,
            console_pattern: default_pattern(),
        }
    }
}

impl LoggingConfig {
    /// Path of the log file the file sink writes to.
    ///
    /// With rotation enabled the backend appends a date suffix to this name.
    pub fn effective_log_path(&self) -> PathBuf {
        Path::new(&self.directory).join(&self.file_name)
    }
}

impl RcsConfig {
    /// Load configuration from the default config file path, or defaults if
    /// no file exists there.
    pub fn load_default() -> RcsResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> RcsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: RcsConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> RcsResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> RcsResult<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            RcsError::new("configuration error: could not determine config directory")
        })?;
        Ok(base.join(CONFIG_DIR_NAME).join("config.toml"))
    }
}
