//! Google-specific remote configuration.
//!
//! Typed view over the generic [`RemoteConfig`] a project stores.

use std::collections::HashMap;

use anyhow::Result;
use veenzo_core::project::config::RemoteConfig;

pub const PROVIDER_NAME: &str = "google";
pub const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Clone, PartialEq)]
pub struct GoogleRemoteConfig {
    pub google_account: String,
    pub google_calendar_id: String,
}

impl GoogleRemoteConfig {
    pub fn new(account: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            google_account: account.into(),
            google_calendar_id: calendar_id.into(),
        }
    }
}

impl From<GoogleRemoteConfig> for RemoteConfig {
    fn from(config: GoogleRemoteConfig) -> Self {
        let mut params = HashMap::new();
        params.insert(
            "google_account".to_string(),
            toml::Value::String(config.google_account),
        );
        params.insert(
            "google_calendar_id".to_string(),
            toml::Value::String(config.google_calendar_id),
        );
        RemoteConfig {
            provider: PROVIDER_NAME.to_string(),
            params,
        }
    }
}

impl TryFrom<&RemoteConfig> for GoogleRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(remote: &RemoteConfig) -> Result<Self> {
        if remote.provider != PROVIDER_NAME {
            anyhow::bail!("Unsupported remote provider: {}", remote.provider);
        }

        let google_account = remote
            .param("google_account")
            .ok_or_else(|| anyhow::anyhow!("Missing required field: google_account"))?
            .to_string();

        let google_calendar_id = remote
            .param("google_calendar_id")
            .unwrap_or(DEFAULT_CALENDAR_ID)
            .to_string();

        Ok(Self {
            google_account,
            google_calendar_id,
        })
    }
}
