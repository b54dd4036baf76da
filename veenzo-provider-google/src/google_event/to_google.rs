use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use veenzo_core::RemoteEventDraft;

pub trait ToGoogle {
    fn to_google(&self) -> google_calendar::types::Event;
}

impl ToGoogle for RemoteEventDraft {
    fn to_google(&self) -> google_calendar::types::Event {
        // id stays empty so Google assigns one
        // (otherwise it answers "Invalid resource id value")
        google_calendar::types::Event {
            summary: self.summary.clone(),
            description: self.description.clone().unwrap_or_default(),
            start: Some(zoned_to_google(&self.start, &self.time_zone)),
            end: Some(zoned_to_google(&self.end, &self.time_zone)),
            recurrence: self.recurrence.clone(),
            status: "confirmed".to_string(),
            ..Default::default()
        }
    }
}

/// The instant goes out in UTC; the zone name tells Google how to expand
/// any recurrence rule across DST changes.
fn zoned_to_google(time: &DateTime<Tz>, time_zone: &str) -> google_calendar::types::EventDateTime {
    google_calendar::types::EventDateTime {
        date: None,
        date_time: Some(time.with_timezone(&Utc)),
        time_zone: time_zone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn draft_maps_to_google_fields() {
        let tz = chrono_tz::America::Sao_Paulo;
        let draft = RemoteEventDraft {
            summary: "Standup".to_string(),
            description: None,
            start: tz.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            end: tz.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
            time_zone: "America/Sao_Paulo".to_string(),
            recurrence: vec!["RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20250617T025959Z".to_string()],
        };

        let event = draft.to_google();
        assert!(event.id.is_empty());
        assert_eq!(event.summary, "Standup");
        assert_eq!(event.description, "");
        assert_eq!(event.recurrence, draft.recurrence);

        let start = event.start.unwrap();
        assert_eq!(
            start.date_time,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap())
        );
        assert_eq!(start.time_zone, "America/Sao_Paulo");
        assert!(start.date.is_none());
    }
}
