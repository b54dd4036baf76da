//! Stored bearer credentials for one Google account.
//!
//! veenzo doesn't run the OAuth flow or refresh tokens itself: the caller
//! hands over an access token (and optionally a refresh token) and it is
//! used as-is for every call.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use google_calendar::Client;
use serde::{Deserialize, Serialize};

pub fn base_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not determine config directory")?
        .join("veenzo")
        .join("providers")
        .join("google"))
}

#[derive(Debug, Clone)]
pub struct Session {
    account_email: String,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account_email: &str, access_token: String, refresh_token: Option<String>) -> Self {
        Session {
            account_email: account_email.to_string(),
            data: SessionData {
                access_token,
                refresh_token,
                saved_at: Utc::now().trunc_subsecs(0),
            },
        }
    }

    fn path_in(dir: &Path, account_email: &str) -> PathBuf {
        let email_slug = account_email.replace(['/', '\\', ':'], "_");
        dir.join("session").join(format!("{}.toml", email_slug))
    }

    /// API client that sends the stored access token.
    pub fn client(&self) -> Client {
        Client::new(
            String::new(),
            String::new(),
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone().unwrap_or_default(),
        )
    }

    pub fn load(account_email: &str) -> Result<Self> {
        Self::load_from(&base_dir()?, account_email)
    }

    pub fn load_from(dir: &Path, account_email: &str) -> Result<Self> {
        let path = Self::path_in(dir, account_email);

        if !path.exists() {
            anyhow::bail!(
                "Google session for {} not found. Run `veenzo connect` first.",
                account_email
            );
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

        let data: SessionData = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse Google session from {}", path.display()))?;

        Ok(Session {
            account_email: account_email.to_string(),
            data,
        })
    }

    pub fn save(&self) -> Result<PathBuf> {
        self.save_in(&base_dir()?)
    }

    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = Self::path_in(dir, &self.account_email);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Owner-only, the file holds bearer tokens
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(path)
    }
}
