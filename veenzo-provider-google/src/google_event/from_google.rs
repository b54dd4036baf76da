use anyhow::{Result, bail};
use veenzo_core::{RemoteEvent, RemoteStart};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for RemoteEvent {
    fn from_google(event: google_calendar::types::Event) -> Result<Self> {
        let start = match event.start {
            Some(ref start) => {
                if let Some(dt) = start.date_time {
                    RemoteStart::DateTime(dt)
                } else if let Some(d) = start.date {
                    RemoteStart::Date(d)
                } else {
                    bail!("Event {} has no start time", event.id);
                }
            }
            None => bail!("Event {} has no start time", event.id),
        };

        Ok(RemoteEvent {
            id: event.id,
            summary: event.summary,
            start,
        })
    }
}
