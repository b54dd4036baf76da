//! Concrete event occurrences and the de-duplication key.

use std::fmt;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// One concrete instance of an event: a start/end pair in the event's zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl Occurrence {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Occurrence { start, end }
    }

    /// Calendar date the occurrence starts on, in its own zone.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn time_zone(&self) -> Tz {
        self.start.timezone()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Place a wall-clock date and time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are moved forward by an hour.
pub fn compose_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            match tz.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => tz.from_utc_datetime(&naive),
            }
        }
    }
}

/// The (title, start date) pair used to recognise an event that already
/// exists on the remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub title: String,
    pub date: NaiveDate,
}

impl DedupKey {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        DedupKey {
            title: title.into(),
            date,
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} @ {}", self.title, self.date.format("%Y-%m-%d"))
    }
}
