//! Global veenzo configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{VeenzoError, VeenzoResult};

static DEFAULT_DATA_PATH: &str = "~/veenzo";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

/// Global configuration at ~/.config/veenzo/config.toml
///
/// Project-specific configuration (connected remote calendar) is stored
/// in each project's .veenzo/config.toml file instead.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VeenzoConfig {
    #[serde(default = "default_data_path")]
    pub data_dir: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Creator recorded on new events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// IANA zone for new events; the system zone when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    #[serde(default)]
    pub sync: SyncSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SyncSettings {
    /// Pause between consecutive remote calls in a batch sync.
    #[serde(default)]
    pub throttle_ms: u64,
}

impl SyncSettings {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

impl Default for VeenzoConfig {
    fn default() -> Self {
        VeenzoConfig {
            data_dir: default_data_path(),
            default_project: None,
            creator: None,
            time_zone: None,
            sync: SyncSettings::default(),
        }
    }
}

impl VeenzoConfig {
    pub fn config_path() -> VeenzoResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| VeenzoError::Config("Could not determine config directory".into()))?
            .join("veenzo");

        Ok(config_dir.join("config.toml"))
    }

    /// Configured zone, if set and valid.
    pub fn time_zone(&self) -> VeenzoResult<Option<Tz>> {
        self.time_zone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| VeenzoError::Config(format!("Unknown time_zone '{}'", name)))
            })
            .transpose()
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &std::path::Path) -> VeenzoResult<()> {
        let contents = format!(
            "\
# veenzo configuration

# Where your projects live:
# data_dir = \"{}\"

# Project used when --project is not given:
# default_project = \"acme\"

# Recorded as the creator of new events:
# creator = \"you@example.com\"

# Time zone for new events (defaults to the system zone):
# time_zone = \"America/Sao_Paulo\"

# [sync]
# Milliseconds to wait between remote calls when syncing a whole project:
# throttle_ms = 250
",
            DEFAULT_DATA_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VeenzoError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| VeenzoError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
