//! Locally stored project events.
//!
//! Every occurrence of an expansion becomes its own row. Rows produced by one
//! weekly expansion share a [`RecurrenceMeta`] (same series id, rule, days).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SubsecRound, Utc, Weekday};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::event_spec::EventSpec;
use crate::occurrence::{DedupKey, Occurrence, compose_local};
use crate::recurrence::{RecurrenceRule, end_of_day_utc, expand};

/// Recurrence metadata shared by all rows of one expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceMeta {
    pub series_id: String,
    /// Full `RRULE:` line.
    pub rule: String,
    pub days: Vec<Weekday>,
    pub end_date: NaiveDate,
    /// Start date of the first occurrence. The remote calendar knows the
    /// series by this date.
    pub first_date: NaiveDate,
    /// Wall-clock times the series was planned with. A row that landed in a
    /// DST gap carries shifted times, so these are kept separately.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Days from an occurrence's start date to its end date.
    pub day_span: i64,
}

impl RecurrenceMeta {
    /// First occurrence of the series at its planned wall-clock times.
    pub fn first_occurrence(&self, tz: Tz) -> Occurrence {
        let start = compose_local(tz, self.first_date, self.start_time);
        let end = compose_local(
            tz,
            self.first_date + Duration::days(self.day_span),
            self.end_time,
        );
        Occurrence::new(start, end)
    }

    /// The weekly rule rebuilt from the stored days and end date.
    pub fn recurrence_rule(&self, tz: Tz) -> RecurrenceRule {
        RecurrenceRule::weekly(self.days.clone(), Some(end_of_day_utc(tz, self.end_date)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedEvent {
    pub id: String,
    pub project: String,
    pub creator: String,
    pub title: String,
    pub description: Option<String>,
    pub occurrence: Occurrence,
    pub created: DateTime<Utc>,
    pub recurrence: Option<RecurrenceMeta>,
}

impl PersistedEvent {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn date(&self) -> NaiveDate {
        self.occurrence.date()
    }

    pub fn series_id(&self) -> Option<&str> {
        self.recurrence.as_ref().map(|r| r.series_id.as_str())
    }

    /// Key for this row's own date.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(self.title.clone(), self.date())
    }

    /// Key of the remote event that represents this row: the row itself, or
    /// for a series row, the series (keyed on its first date).
    pub fn remote_key(&self) -> DedupKey {
        match &self.recurrence {
            Some(meta) => DedupKey::new(self.title.clone(), meta.first_date),
            None => self.dedup_key(),
        }
    }
}

/// Expand `spec` and build one row per occurrence, ascending by start.
///
/// Returns an empty list when the spec expands to nothing.
pub fn rows_from_spec(spec: &EventSpec, project: &str, creator: &str) -> Vec<PersistedEvent> {
    let occurrences = expand(spec);
    let Some(first) = occurrences.first() else {
        return Vec::new();
    };

    let recurrence = match (RecurrenceRule::from_spec(spec), spec.recurrence_end_date) {
        (Some(rule), Some(end_date)) => Some(RecurrenceMeta {
            series_id: Uuid::new_v4().to_string(),
            rule: rule.to_string(),
            days: rule.weekdays.clone(),
            end_date,
            first_date: first.date(),
            start_time: spec.start_time,
            end_time: spec.end_time,
            day_span: spec.day_span(),
        }),
        _ => None,
    };

    // Stored files keep whole seconds
    let created = Utc::now().trunc_subsecs(0);

    occurrences
        .into_iter()
        .map(|occurrence| PersistedEvent {
            id: Uuid::new_v4().to_string(),
            project: project.to_string(),
            creator: creator.to_string(),
            title: spec.title.clone(),
            description: spec.description.clone(),
            occurrence,
            created,
            recurrence: recurrence.clone(),
        })
        .collect()
}
