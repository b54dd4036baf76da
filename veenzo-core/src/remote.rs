//! The remote calendar seam.
//!
//! Providers implement [`RemoteCalendar`]; the reconciler only ever talks to
//! this trait, so it can run against a real account or an in-memory fake.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::{VeenzoError, VeenzoResult};
use crate::occurrence::{DedupKey, compose_local};
use crate::persisted::PersistedEvent;

#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// Events whose text matches `query.text` and that start inside
    /// `[time_min, time_max)`.
    async fn list_events(&self, query: &RemoteQuery) -> VeenzoResult<Vec<RemoteEvent>>;

    async fn create_event(&self, draft: &RemoteEventDraft) -> VeenzoResult<RemoteEvent>;

    /// Delete by remote id. An event that is already gone is not an error.
    async fn delete_event(&self, remote_id: &str) -> VeenzoResult<()>;
}

/// A text + time window search against the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteQuery {
    pub text: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

impl RemoteQuery {
    /// The whole local day of `key.date` in `tz`, searching for `key.title`.
    pub fn for_key(key: &DedupKey, tz: Tz) -> Self {
        let time_min = compose_local(tz, key.date, NaiveTime::MIN).with_timezone(&Utc);
        let time_max =
            compose_local(tz, key.date + Duration::days(1), NaiveTime::MIN).with_timezone(&Utc);

        RemoteQuery {
            text: key.title.clone(),
            time_min,
            time_max,
        }
    }
}

/// Provider-neutral event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEventDraft {
    pub summary: String,
    pub description: Option<String>,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// IANA zone name the start/end are expressed in.
    pub time_zone: String,
    /// Full `RRULE:` lines; empty for a one-off event.
    pub recurrence: Vec<String>,
}

impl RemoteEventDraft {
    /// Build the payload that represents `event` remotely.
    ///
    /// A series row maps to its series: the first occurrence at the planned
    /// wall-clock times, carrying the rule. Fails with
    /// [`VeenzoError::InvalidPayload`] when the times or the rule can't
    /// produce a valid event.
    pub fn from_event(event: &PersistedEvent) -> VeenzoResult<Self> {
        let tz = event.occurrence.time_zone();

        let (occurrence, recurrence) = match &event.recurrence {
            Some(meta) => {
                let first = meta.first_occurrence(tz);
                let rule = meta.recurrence_rule(tz);
                rule.check(&first.start)?;
                if rule.to_string() != meta.rule {
                    return Err(VeenzoError::InvalidPayload(format!(
                        "Stored rule '{}' does not match the series days",
                        meta.rule
                    )));
                }
                (first, vec![meta.rule.clone()])
            }
            None => (event.occurrence.clone(), Vec::new()),
        };

        if occurrence.duration() <= Duration::zero() {
            return Err(VeenzoError::InvalidPayload(format!(
                "'{}' ends at or before it starts",
                event.title
            )));
        }

        Ok(RemoteEventDraft {
            summary: event.title.clone(),
            description: event.description.clone(),
            start: occurrence.start,
            end: occurrence.end,
            time_zone: tz.name().to_string(),
            recurrence,
        })
    }
}

/// Start of a remote event as the provider reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteStart {
    DateTime(DateTime<Utc>),
    /// All-day events carry a date only.
    Date(NaiveDate),
}

/// An event as reported back by the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub summary: String,
    pub start: RemoteStart,
}

impl RemoteEvent {
    /// Start date as seen from `tz`.
    pub fn date_in(&self, tz: Tz) -> NaiveDate {
        match self.start {
            RemoteStart::DateTime(dt) => dt.with_timezone(&tz).date_naive(),
            RemoteStart::Date(date) => date,
        }
    }

    /// Exact title and start-date match.
    pub fn matches(&self, key: &DedupKey, tz: Tz) -> bool {
        self.summary == key.title && self.date_in(tz) == key.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_spec::{EventSpec, RecurrenceKind};
    use crate::persisted::rows_from_spec;
    use chrono::{TimeZone, Weekday};

    fn weekly_rows() -> Vec<PersistedEvent> {
        let spec = EventSpec {
            title: "Standup".to_string(),
            description: Some("Daily sync".to_string()),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            recurrence: RecurrenceKind::Weekly,
            weekdays: vec![Weekday::Mon, Weekday::Wed],
            recurrence_end_date: NaiveDate::from_ymd_opt(2025, 6, 16),
            time_zone: chrono_tz::America::Sao_Paulo,
        };
        rows_from_spec(&spec, "acme", "ana")
    }

    #[test]
    fn series_row_drafts_the_first_occurrence() {
        let rows = weekly_rows();
        let tz = chrono_tz::America::Sao_Paulo;

        let draft = RemoteEventDraft::from_event(&rows[3]).unwrap();
        assert_eq!(draft, RemoteEventDraft::from_event(&rows[0]).unwrap());
        assert_eq!(draft.start, tz.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap());
        assert_eq!(draft.end, tz.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap());
        assert_eq!(draft.time_zone, "America/Sao_Paulo");
        assert_eq!(
            draft.recurrence,
            vec!["RRULE:FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=20250617T025959Z".to_string()]
        );
        assert_eq!(draft.description.as_deref(), Some("Daily sync"));
    }

    #[test]
    fn one_off_row_has_no_recurrence() {
        let mut row = weekly_rows().remove(1);
        row.recurrence = None;

        let draft = RemoteEventDraft::from_event(&row).unwrap();
        assert!(draft.recurrence.is_empty());
        assert_eq!(draft.start, row.occurrence.start);
    }

    #[test]
    fn broken_rule_is_an_invalid_payload() {
        let mut row = weekly_rows().remove(0);
        if let Some(meta) = row.recurrence.as_mut() {
            meta.rule = "RRULE:FREQ=SOMETIMES".to_string();
        }
        assert!(matches!(
            RemoteEventDraft::from_event(&row),
            Err(VeenzoError::InvalidPayload(_))
        ));
    }

    #[test]
    fn series_without_days_is_an_invalid_payload() {
        let mut row = weekly_rows().remove(0);
        if let Some(meta) = row.recurrence.as_mut() {
            meta.days.clear();
        }
        assert!(matches!(
            RemoteEventDraft::from_event(&row),
            Err(VeenzoError::InvalidPayload(_))
        ));
    }

    #[test]
    fn gap_shifted_row_drafts_the_planned_start() {
        let tz = chrono_tz::Europe::Madrid;
        let spec = EventSpec {
            title: "Night shift".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
            start_time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 23).unwrap(),
            end_time: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            recurrence: RecurrenceKind::Weekly,
            weekdays: vec![Weekday::Sun],
            recurrence_end_date: NaiveDate::from_ymd_opt(2025, 4, 6),
            time_zone: tz,
        };
        let rows = rows_from_spec(&spec, "acme", "ana");
        assert_eq!(rows.len(), 3);
        // 02:30 doesn't exist on the 30th in Madrid
        assert_eq!(
            rows[1].occurrence.start,
            tz.with_ymd_and_hms(2025, 3, 30, 3, 30, 0).unwrap()
        );

        let draft = RemoteEventDraft::from_event(&rows[1]).unwrap();
        assert_eq!(draft.start, tz.with_ymd_and_hms(2025, 3, 23, 2, 30, 0).unwrap());
        assert_eq!(draft.end, tz.with_ymd_and_hms(2025, 3, 23, 4, 0, 0).unwrap());
    }

    #[test]
    fn inverted_times_are_an_invalid_payload() {
        let mut row = weekly_rows().remove(0);
        row.recurrence = None;
        row.occurrence.end = row.occurrence.start;
        assert!(matches!(
            RemoteEventDraft::from_event(&row),
            Err(VeenzoError::InvalidPayload(_))
        ));
    }

    #[test]
    fn query_covers_the_local_day() {
        let key = DedupKey::new("Standup", NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        let query = RemoteQuery::for_key(&key, chrono_tz::America::Sao_Paulo);

        assert_eq!(query.text, "Standup");
        assert_eq!(query.time_min, Utc.with_ymd_and_hms(2025, 6, 2, 3, 0, 0).unwrap());
        assert_eq!(query.time_max, Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap());
    }

    #[test]
    fn matching_is_exact_on_title_and_local_date() {
        let tz = chrono_tz::America::Sao_Paulo;
        let key = DedupKey::new("Standup", NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());

        // 01:30 UTC on the 3rd is still the 2nd in Sao Paulo
        let late = RemoteEvent {
            id: "r1".to_string(),
            summary: "Standup".to_string(),
            start: RemoteStart::DateTime(Utc.with_ymd_and_hms(2025, 6, 3, 1, 30, 0).unwrap()),
        };
        assert!(late.matches(&key, tz));

        let other_case = RemoteEvent {
            summary: "standup".to_string(),
            ..late.clone()
        };
        assert!(!other_case.matches(&key, tz));

        let all_day = RemoteEvent {
            start: RemoteStart::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            ..late
        };
        assert!(all_day.matches(&key, tz));
    }
}
