//! Recurrence expansion and weekly RRULE generation.
//!
//! [`expand`] turns an [`EventSpec`] into the ordered list of occurrences to
//! persist. [`RecurrenceRule`] is the same series expressed as an RFC 5545
//! rule, which is what gets pushed to a remote calendar.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::error::{VeenzoError, VeenzoResult};
use crate::event_spec::{EventSpec, RecurrenceKind, normalize_weekdays};
use crate::occurrence::{Occurrence, compose_local};

/// Expand a spec into its occurrences, ascending by start.
///
/// Never fails: inputs that break validation rules (no weekdays, recurrence
/// end before start, end not after start) produce an empty list, and
/// `custom` recurrence is not expanded.
pub fn expand(spec: &EventSpec) -> Vec<Occurrence> {
    match spec.recurrence {
        RecurrenceKind::None => {
            let start = compose_local(spec.time_zone, spec.start_date, spec.start_time);
            let end = compose_local(spec.time_zone, spec.end_date, spec.end_time);
            if end > start {
                vec![Occurrence::new(start, end)]
            } else {
                Vec::new()
            }
        }
        RecurrenceKind::Weekly => expand_weekly(spec),
        RecurrenceKind::Custom => Vec::new(),
    }
}

fn expand_weekly(spec: &EventSpec) -> Vec<Occurrence> {
    let Some(until) = spec.recurrence_end_date else {
        return Vec::new();
    };
    let span = spec.day_span();

    spec.start_date
        .iter_days()
        .take_while(|date| *date <= until)
        .filter(|date| spec.selects(date.weekday()))
        .filter_map(|date| {
            let start = compose_local(spec.time_zone, date, spec.start_time);
            let end = compose_local(spec.time_zone, date + Duration::days(span), spec.end_time);
            (end > start).then(|| Occurrence::new(start, end))
        })
        .collect()
}

/// A weekly RFC 5545 recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Monday-first, no duplicates.
    pub weekdays: Vec<Weekday>,
    pub until: Option<DateTime<Utc>>,
}

impl RecurrenceRule {
    pub fn weekly(weekdays: Vec<Weekday>, until: Option<DateTime<Utc>>) -> Self {
        RecurrenceRule {
            weekdays: normalize_weekdays(weekdays),
            until,
        }
    }

    /// The rule for a weekly spec; `None` for any other recurrence kind.
    pub fn from_spec(spec: &EventSpec) -> Option<Self> {
        if spec.recurrence != RecurrenceKind::Weekly {
            return None;
        }
        let until = spec
            .recurrence_end_date
            .map(|date| end_of_day_utc(spec.time_zone, date));
        Some(Self::weekly(spec.weekdays.clone(), until))
    }

    /// Check the rule by expanding it with the `rrule` crate from `dtstart`.
    pub fn check(&self, dtstart: &DateTime<Tz>) -> VeenzoResult<()> {
        if self.weekdays.is_empty() {
            return Err(VeenzoError::InvalidPayload(
                "weekly rule without BYDAY".to_string(),
            ));
        }
        self.to_rrule_set(dtstart).map(|_| ())
    }

    fn to_rrule_set(&self, dtstart: &DateTime<Tz>) -> VeenzoResult<RRuleSet> {
        let rule = self.to_string();
        let source = format!(
            "DTSTART;TZID={}:{}\n{}",
            dtstart.timezone().name(),
            dtstart.naive_local().format("%Y%m%dT%H%M%S"),
            rule
        );
        source
            .parse::<RRuleSet>()
            .map_err(|e| VeenzoError::InvalidPayload(format!("Invalid RRULE '{}': {}", rule, e)))
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let days: Vec<&str> = self.weekdays.iter().map(|d| weekday_code(*d)).collect();
        write!(f, "RRULE:FREQ=WEEKLY;BYDAY={}", days.join(","))?;
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format("%Y%m%dT%H%M%SZ"))?;
        }
        Ok(())
    }
}

/// Two-letter RFC 5545 day code.
pub fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// 23:59:59 on `date` in `tz`, as UTC.
pub fn end_of_day_utc(tz: Tz, date: NaiveDate) -> DateTime<Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    compose_local(tz, date, last_second).with_timezone(&Utc)
}
