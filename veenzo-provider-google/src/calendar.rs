//! [`RemoteCalendar`] backed by the Google Calendar API.

use async_trait::async_trait;
use google_calendar::{Client, ClientError};
use google_calendar::types::{OrderBy, SendUpdates};
use tracing::debug;
use veenzo_core::{
    RemoteCalendar, RemoteEvent, RemoteEventDraft, RemoteQuery, VeenzoError, VeenzoResult,
};

use crate::google_event::{FromGoogle, ToGoogle};
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub struct GoogleCalendar {
    client: Client,
    calendar_id: String,
}

impl GoogleCalendar {
    pub fn new(session: &Session, calendar_id: impl Into<String>) -> Self {
        GoogleCalendar {
            client: session.client(),
            calendar_id: calendar_id.into(),
        }
    }

    /// Open the calendar a project is connected to, using the stored session.
    pub fn connect(config: &GoogleRemoteConfig) -> anyhow::Result<Self> {
        let session = Session::load(&config.google_account)?;
        Ok(Self::new(&session, config.google_calendar_id.clone()))
    }
}

#[async_trait]
impl RemoteCalendar for GoogleCalendar {
    async fn list_events(&self, query: &RemoteQuery) -> VeenzoResult<Vec<RemoteEvent>> {
        let time_min = query.time_min.to_rfc3339();
        let time_max = query.time_max.to_rfc3339();

        let response = self
            .client
            .events()
            .list_all(
                &self.calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                &query.text,
                &[],
                false,
                false,
                false,
                &time_max,
                &time_min,
                "",
                "",
            )
            .await
            .map_err(|e| api_error("list events", e))?;

        let events = response
            .body
            .into_iter()
            .filter(|event| event.status != "cancelled")
            .map(RemoteEvent::from_google)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(|e| VeenzoError::InvalidPayload(e.to_string()))?;

        debug!(text = %query.text, found = events.len(), "listed google events");
        Ok(events)
    }

    async fn create_event(&self, draft: &RemoteEventDraft) -> VeenzoResult<RemoteEvent> {
        let google_event = draft.to_google();

        let response = self
            .client
            .events()
            .insert(
                &self.calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .map_err(|e| api_error(&format!("create event '{}'", draft.summary), e))?;

        RemoteEvent::from_google(response.body)
            .map_err(|e| VeenzoError::InvalidPayload(e.to_string()))
    }

    async fn delete_event(&self, remote_id: &str) -> VeenzoResult<()> {
        let result = self
            .client
            .events()
            .delete(&self.calendar_id, remote_id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_gone(status_of(&e)) => {
                debug!(remote_id, "google event already gone");
                Ok(())
            }
            Err(e) => Err(api_error(&format!("delete event {}", remote_id), e)),
        }
    }
}

/// HTTP status of a failed call, when the API answered at all.
fn status_of(error: &ClientError) -> Option<u16> {
    match error {
        ClientError::HttpError { status, .. } => Some(status.as_u16()),
        _ => None,
    }
}

fn is_gone(status: Option<u16>) -> bool {
    matches!(status, Some(404 | 410))
}

fn api_error(action: &str, error: ClientError) -> VeenzoError {
    classify(action, status_of(&error), error)
}

fn classify(action: &str, status: Option<u16>, error: impl std::fmt::Display) -> VeenzoError {
    let message = format!("Failed to {}: {}", action, error);
    match status {
        Some(401) => VeenzoError::RemoteAuth(message),
        _ => VeenzoError::Remote(message),
    }
}
