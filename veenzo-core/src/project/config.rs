//! Per-project local configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{VeenzoError, VeenzoResult};

/// Configuration stored in each project's .veenzo/config.toml
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct ProjectConfig {
    pub remote: Option<RemoteConfig>,
}

/// Connected remote calendar (e.g., Google Calendar settings)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RemoteConfig {
    pub provider: String,
    #[serde(flatten)]
    pub params: HashMap<String, toml::Value>,
}

impl RemoteConfig {
    /// String parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}

impl ProjectConfig {
    /// Load config from .veenzo/config.toml
    pub fn load(project_dir: &Path) -> VeenzoResult<Self> {
        let path = project_dir.join(".veenzo/config.toml");
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: ProjectConfig =
                toml::from_str(&content).map_err(|e| VeenzoError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(ProjectConfig::default())
        }
    }

    /// Save config to .veenzo/config.toml
    pub fn save(&self, project_dir: &Path) -> VeenzoResult<()> {
        let dir = project_dir.join(".veenzo");
        std::fs::create_dir_all(&dir)?;

        let path = dir.join("config.toml");
        let content = toml::to_string_pretty(self)
            .map_err(|e| VeenzoError::Serialization(e.to_string()))?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}
