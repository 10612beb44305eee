//! src/config.rs
//! ============================================================================
//! # Config: Inspector Configuration Loader (directories only)
//!
//! Reads settings as TOML from the platform config path given by the
//! [`directories`](https://docs.rs/directories) crate, or from an explicit
//! path. A missing file yields defaults. Nothing is ever written back.
//!
//! ```toml
//! [filter]
//! entity_list_delay = "166ms"
//! field_list_delay = "10ms"
//! max_delay = "1s"
//!
//! [display]
//! show_field_path = true
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;
use crate::logging::LoggerConfig;
use crate::util::debounce::DebounceConfig;

/// Filter bar timing and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Quiet period for the entity list filter bar.
    #[serde(with = "humantime_serde")]
    pub entity_list_delay: Duration,

    /// Quiet period for the field list filter bar.
    #[serde(with = "humantime_serde")]
    pub field_list_delay: Duration,

    #[serde(with = "humantime_serde")]
    pub string_table_delay: Duration,

    /// Cap on how long continuous typing may postpone a recompute.
    #[serde(with = "humantime_serde")]
    pub max_delay: Option<Duration>,

    /// Entries filtered between cooperative yields.
    pub chunk_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            entity_list_delay: DebounceConfig::entity_list().delay,
            field_list_delay: DebounceConfig::field_list().delay,
            string_table_delay: DebounceConfig::entity_list().delay,
            max_delay: None,
            chunk_size: 4096,
        }
    }
}

impl FilterConfig {
    #[must_use]
    pub const fn entity_debounce(&self) -> DebounceConfig {
        self.debounce(self.entity_list_delay)
    }

    #[must_use]
    pub const fn field_debounce(&self) -> DebounceConfig {
        self.debounce(self.field_list_delay)
    }

    #[must_use]
    pub const fn string_table_debounce(&self) -> DebounceConfig {
        self.debounce(self.string_table_delay)
    }

    const fn debounce(&self, delay: Duration) -> DebounceConfig {
        DebounceConfig {
            delay,
            max_delay: self.max_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleConfig {
    /// Encoded type prefix marking entity handle fields.
    pub marker: String,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            marker: "CHandle".to_string(),
        }
    }
}

/// Initial display preferences; changed at runtime in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_entity_index: bool,
    pub show_field_encoded_type: bool,
    pub show_field_decoded_type: bool,
    pub show_field_path: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_entity_index: false,
            show_field_encoded_type: true,
            show_field_decoded_type: false,
            show_field_path: false,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub handle: HandleConfig,
    pub display: DisplayConfig,
    pub logging: LoggerConfig,
}

impl Config {
    /// Loads config from the platform config dir, or returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/demscope/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path).await,
            None => {
                info!("No config directory available, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Loads config from `path`; a missing file yields defaults.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        match TokioFs::read_to_string(path).await {
            Ok(text) => {
                info!("Loading config from {}", path.display());
                Ok(toml::from_str(&text)?)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "No config file found at {}, using default configuration",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(source) => Err(AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "demscope").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
