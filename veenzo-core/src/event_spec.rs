//! Event form input and the validated [`EventSpec`] it parses into.
//!
//! `EventForm` carries the raw strings a user submits; `EventSpec` is the
//! typed value the recurrence expander works from.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::occurrence::compose_local;

/// Rules an event submission can break before anything is persisted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Invalid {field}: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Invalid {field}: \"{value}\" (expected HH:MM)")]
    InvalidTime { field: &'static str, value: String },

    #[error("Unknown weekday: \"{0}\"")]
    UnknownWeekday(String),

    #[error("Unknown recurrence type: \"{0}\" (expected none, weekly or custom)")]
    UnknownRecurrence(String),

    #[error("Unknown time zone: \"{0}\"")]
    UnknownTimeZone(String),

    #[error("End date is before start date")]
    EndDateBeforeStartDate,

    #[error("End time must be after start time")]
    EndNotAfterStart,

    #[error("Select at least one weekday for a weekly event")]
    NoWeekdaysSelected,

    #[error("A weekly event needs a recurrence end date")]
    MissingRecurrenceEnd,

    #[error("Recurrence end date is before start date")]
    RecurrenceEndBeforeStart,

    #[error("Recurrence type '{0}' is not supported yet")]
    UnsupportedRecurrence(RecurrenceKind),
}

/// How an event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    #[default]
    None,
    Weekly,
    Custom,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Custom => "custom",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(RecurrenceKind::None),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "custom" => Ok(RecurrenceKind::Custom),
            _ => Err(ValidationError::UnknownRecurrence(s.to_string())),
        }
    }
}

/// Raw event form, as submitted.
///
/// Empty strings are treated as absent values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventForm {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: String,
    pub start_time: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub end_time: String,
    #[serde(default)]
    pub recurrence_type: Option<String>,
    #[serde(default)]
    pub selected_days: Vec<String>,
    #[serde(default)]
    pub recurrence_end_date: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl EventForm {
    /// Parse the form into a typed spec. `default_tz` applies when the form
    /// carries no time zone.
    ///
    /// Only parsing happens here; call [`EventSpec::validate`] before
    /// expanding.
    pub fn into_spec(self, default_tz: Tz) -> Result<EventSpec, ValidationError> {
        let start_date = parse_date("start date", &self.start_date)?;
        let end_date = match non_empty(self.end_date) {
            Some(s) => parse_date("end date", &s)?,
            None => start_date,
        };
        let start_time = parse_time("start time", &self.start_time)?;
        let end_time = parse_time("end time", &self.end_time)?;

        let recurrence = match non_empty(self.recurrence_type) {
            Some(s) => s.parse()?,
            None => RecurrenceKind::None,
        };

        let weekdays = self
            .selected_days
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Result<Vec<_>, _>>()?;

        let recurrence_end_date = non_empty(self.recurrence_end_date)
            .map(|s| parse_date("recurrence end date", &s))
            .transpose()?;

        let time_zone = match non_empty(self.time_zone) {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ValidationError::UnknownTimeZone(name.clone()))?,
            None => default_tz,
        };

        Ok(EventSpec {
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            start_date,
            start_time,
            end_date,
            end_time,
            recurrence,
            weekdays: normalize_weekdays(weekdays),
            recurrence_end_date,
            time_zone,
        })
    }
}

/// A typed event submission: one event, or a weekly series of them.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSpec {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
    pub recurrence: RecurrenceKind,
    /// Monday-first, no duplicates.
    pub weekdays: Vec<Weekday>,
    /// Inclusive upper bound for weekly series.
    pub recurrence_end_date: Option<NaiveDate>,
    pub time_zone: Tz,
}

impl EventSpec {
    /// Number of days an occurrence spans past its start date.
    pub fn day_span(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn selects(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday)
    }

    /// Check the rules a submission must satisfy before it is expanded.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if self.end_date < self.start_date {
            return Err(ValidationError::EndDateBeforeStartDate);
        }

        let start = compose_local(self.time_zone, self.start_date, self.start_time);
        let end = compose_local(self.time_zone, self.end_date, self.end_time);
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }

        match self.recurrence {
            RecurrenceKind::None => Ok(()),
            RecurrenceKind::Custom => Err(ValidationError::UnsupportedRecurrence(self.recurrence)),
            RecurrenceKind::Weekly => {
                if self.weekdays.is_empty() {
                    return Err(ValidationError::NoWeekdaysSelected);
                }
                let until = self
                    .recurrence_end_date
                    .ok_or(ValidationError::MissingRecurrenceEnd)?;
                if until < self.start_date {
                    return Err(ValidationError::RecurrenceEndBeforeStart);
                }
                Ok(())
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        })
}

/// Parse an English weekday name ("monday", "Mon", "mo").
pub fn parse_weekday(value: &str) -> Result<Weekday, ValidationError> {
    let weekday = match value.trim().to_lowercase().as_str() {
        "monday" | "mon" | "mo" => Weekday::Mon,
        "tuesday" | "tue" | "tues" | "tu" => Weekday::Tue,
        "wednesday" | "wed" | "we" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" | "th" => Weekday::Thu,
        "friday" | "fri" | "fr" => Weekday::Fri,
        "saturday" | "sat" | "sa" => Weekday::Sat,
        "sunday" | "sun" | "su" => Weekday::Sun,
        _ => return Err(ValidationError::UnknownWeekday(value.to_string())),
    };
    Ok(weekday)
}

/// Sort Monday-first and drop duplicates.
pub fn normalize_weekdays(mut weekdays: Vec<Weekday>) -> Vec<Weekday> {
    weekdays.sort_by_key(|d| d.num_days_from_monday());
    weekdays.dedup();
    weekdays
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly_form() -> EventForm {
        EventForm {
            title: "Standup".to_string(),
            description: Some(String::new()),
            start_date: "2025-06-02".to_string(),
            start_time: "09:00".to_string(),
            end_date: Some("2025-06-02".to_string()),
            end_time: "10:00".to_string(),
            recurrence_type: Some("weekly".to_string()),
            selected_days: vec!["wednesday".to_string(), "Monday".to_string()],
            recurrence_end_date: Some("2025-06-16".to_string()),
            time_zone: Some("America/Sao_Paulo".to_string()),
        }
    }

    #[test]
    fn form_parses_into_spec() {
        let spec = weekly_form().into_spec(Tz::UTC).unwrap();

        assert_eq!(spec.title, "Standup");
        assert_eq!(spec.description, None);
        assert_eq!(spec.recurrence, RecurrenceKind::Weekly);
        assert_eq!(spec.weekdays, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(spec.time_zone, chrono_tz::America::Sao_Paulo);
        assert_eq!(
            spec.recurrence_end_date,
            NaiveDate::from_ymd_opt(2025, 6, 16)
        );
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn form_defaults_end_date_and_time_zone() {
        let mut form = weekly_form();
        form.end_date = None;
        form.time_zone = Some("  ".to_string());
        form.recurrence_type = None;

        let spec = form.into_spec(chrono_tz::Europe::Madrid).unwrap();
        assert_eq!(spec.end_date, spec.start_date);
        assert_eq!(spec.time_zone, chrono_tz::Europe::Madrid);
        assert_eq!(spec.recurrence, RecurrenceKind::None);
    }

    #[test]
    fn form_rejects_bad_fields() {
        let mut form = weekly_form();
        form.start_time = "9am".to_string();
        assert!(matches!(
            form.into_spec(Tz::UTC),
            Err(ValidationError::InvalidTime { .. })
        ));

        let mut form = weekly_form();
        form.selected_days = vec!["funday".to_string()];
        assert_eq!(
            form.into_spec(Tz::UTC),
            Err(ValidationError::UnknownWeekday("funday".to_string()))
        );

        let mut form = weekly_form();
        form.time_zone = Some("Mars/Olympus".to_string());
        assert!(matches!(
            form.into_spec(Tz::UTC),
            Err(ValidationError::UnknownTimeZone(_))
        ));

        let mut form = weekly_form();
        form.recurrence_type = Some("monthly".to_string());
        assert!(matches!(
            form.into_spec(Tz::UTC),
            Err(ValidationError::UnknownRecurrence(_))
        ));
    }

    #[test]
    fn weekday_names_and_abbreviations() {
        assert_eq!(parse_weekday("TUES").unwrap(), Weekday::Tue);
        assert_eq!(parse_weekday("su").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday(" thursday ").unwrap(), Weekday::Thu);
        assert_eq!(
            normalize_weekdays(vec![Weekday::Sun, Weekday::Mon, Weekday::Sun]),
            vec![Weekday::Mon, Weekday::Sun]
        );
    }

    #[test]
    fn validate_weekly_rules() {
        let spec = weekly_form().into_spec(Tz::UTC).unwrap();

        let mut no_days = spec.clone();
        no_days.weekdays.clear();
        assert_eq!(no_days.validate(), Err(ValidationError::NoWeekdaysSelected));

        let mut no_until = spec.clone();
        no_until.recurrence_end_date = None;
        assert_eq!(
            no_until.validate(),
            Err(ValidationError::MissingRecurrenceEnd)
        );

        let mut until_before = spec.clone();
        until_before.recurrence_end_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        assert_eq!(
            until_before.validate(),
            Err(ValidationError::RecurrenceEndBeforeStart)
        );

        let mut custom = spec;
        custom.recurrence = RecurrenceKind::Custom;
        assert_eq!(
            custom.validate(),
            Err(ValidationError::UnsupportedRecurrence(RecurrenceKind::Custom))
        );
    }

    #[test]
    fn validate_time_ordering() {
        let mut spec = weekly_form().into_spec(Tz::UTC).unwrap();
        spec.recurrence = RecurrenceKind::None;

        let mut same_time = spec.clone();
        same_time.end_time = same_time.start_time;
        assert_eq!(same_time.validate(), Err(ValidationError::EndNotAfterStart));

        let mut end_before = spec.clone();
        end_before.end_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            end_before.validate(),
            Err(ValidationError::EndDateBeforeStartDate)
        );

        // Ending earlier in the day is fine when the event runs overnight
        let mut overnight = spec;
        overnight.start_time = NaiveTime::from_hms_opt(22, 0, 0).unwrap();
        overnight.end_time = NaiveTime::from_hms_opt(1, 0, 0).unwrap();
        overnight.end_date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        assert!(overnight.validate().is_ok());
        assert_eq!(overnight.day_span(), 1);
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut form = weekly_form();
        form.title = "   ".to_string();
        let spec = form.into_spec(Tz::UTC).unwrap();
        assert_eq!(spec.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn form_reads_from_json() {
        let form: EventForm = serde_json::from_str(
            r#"{
                "title": "Review",
                "start_date": "2025-06-05",
                "start_time": "14:00",
                "end_date": null,
                "end_time": "15:30",
                "recurrence_type": ""
            }"#,
        )
        .unwrap();

        let spec = form.into_spec(Tz::UTC).unwrap();
        assert_eq!(spec.recurrence, RecurrenceKind::None);
        assert!(spec.weekdays.is_empty());
        assert_eq!(spec.end_date, spec.start_date);
        assert!(spec.validate().is_ok());
    }
}
