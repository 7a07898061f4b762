//! Runtime configuration.
//!
//! Loaded from `$XDG_CONFIG_HOME/zathura-presence/config.toml` when present.
//! Every key is optional; a missing file yields [`PresenceConfig::default`].
//!
//! ```toml
//! application_id = "1369674663914897453"
//! process_name = "zathura"
//! show_chapters = true
//! tick_interval_ms = 1000
//! bus_retry_secs = 5
//! tagline = "Zathura - a document viewer"
//! log_file = "/tmp/zathura-presence.log"
//!
//! [icons]
//! pdf = "pdf-icon"
//! epub = "epub-icon"
//! default = "blank-icon"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PresenceError, Result};

pub const DEFAULT_APPLICATION_ID: &str = "1369674663914897453";
pub const DEFAULT_PROCESS_NAME: &str = "zathura";
pub const DEFAULT_TAGLINE: &str = "Zathura - a document viewer";
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_BUS_RETRY_SECS: u64 = 5;

const CONFIG_DIR_NAME: &str = "zathura-presence";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PresenceConfig {
    /// Discord application the presence is published under.
    pub application_id: String,
    /// Exact process name of the viewer to track.
    pub process_name: String,
    pub show_chapters: bool,
    pub tick_interval_ms: u64,
    /// Pause after a failed session bus connection.
    pub bus_retry_secs: u64,
    /// Large-image hover text when no chapter is shown.
    pub tagline: String,
    pub log_file: Option<PathBuf>,
    pub icons: IconConfig,
}

/// Asset keys registered with the Discord application.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    pub pdf: String,
    pub epub: String,
    pub default: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            application_id: DEFAULT_APPLICATION_ID.to_string(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            show_chapters: false,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            bus_retry_secs: DEFAULT_BUS_RETRY_SECS,
            tagline: DEFAULT_TAGLINE.to_string(),
            log_file: None,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            pdf: "pdf-icon".to_string(),
            epub: "epub-icon".to_string(),
            default: "blank-icon".to_string(),
        }
    }
}

impl PresenceConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn bus_retry(&self) -> Duration {
        Duration::from_secs(self.bus_retry_secs)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let malformed = |details: &str| PresenceError::ConfigMalformed {
            path: path.to_path_buf(),
            details: details.to_string(),
        };

        if self.application_id.trim().is_empty() {
            return Err(malformed("application_id must not be empty"));
        }
        if self.process_name.trim().is_empty() {
            return Err(malformed("process_name must not be empty"));
        }
        if self.tick_interval_ms == 0 {
            return Err(malformed("tick_interval_ms must be greater than zero"));
        }
        if self.bus_retry_secs == 0 {
            return Err(malformed("bus_retry_secs must be greater than zero"));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or(PresenceError::ConfigDirNotFound)?;
    Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Loads the config at `path`, or the default location when `None`.
pub fn load_config(path: Option<&Path>) -> Result<PresenceConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_path.exists() {
        return Ok(PresenceConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| PresenceError::Io {
        context: format!("Failed to read config {}", config_path.display()),
        source,
    })?;
    let config = toml::from_str::<PresenceConfig>(&content).map_err(|err| {
        PresenceError::ConfigMalformed {
            path: config_path.clone(),
            details: err.to_string(),
        }
    })?;
    config.validate(&config_path)?;
    Ok(config)
}
