//! Opening the calendar a project is connected to.

use anyhow::Result;
use veenzo_core::{Project, VeenzoError};
use veenzo_provider_google::{GoogleCalendar, GoogleRemoteConfig};

/// The project's connected calendar, or `None` when it has none.
pub fn connected(project: &Project) -> Result<Option<GoogleCalendar>> {
    let Some(remote) = project.remote() else {
        return Ok(None);
    };

    let config = GoogleRemoteConfig::try_from(remote)?;
    Ok(Some(GoogleCalendar::connect(&config)?))
}

/// Like [`connected`], but a project without a calendar is an error.
pub fn require(project: &Project) -> Result<GoogleCalendar> {
    connected(project)?.ok_or_else(|| VeenzoError::NoRemoteConfigured(project.slug.clone()).into())
}
