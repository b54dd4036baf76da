//! ICS file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use super::{
    PROP_CREATOR, PROP_DAY_SPAN, PROP_DAYS, PROP_END_DATE, PROP_END_TIME, PROP_FIRST_DATE,
    PROP_PROJECT, PROP_RULE, PROP_SERIES, PROP_START_TIME,
};
use crate::event_spec::parse_weekday;
use crate::occurrence::{Occurrence, compose_local};
use crate::persisted::{PersistedEvent, RecurrenceMeta};

/// Parse ICS content into a stored event
pub fn parse_event(content: &str) -> Option<PersistedEvent> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let id = vevent.find_prop("UID")?.val.to_string();
    let title = vevent
        .find_prop("SUMMARY")
        .map(text)
        .unwrap_or_else(|| "(No title)".to_string());
    let start = to_zoned(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?)?;
    let end = to_zoned(DatePerhapsTime::try_from(vevent.find_prop("DTEND")?).ok()?)?;

    let description = vevent.find_prop("DESCRIPTION").map(text);
    let project = vevent.find_prop(PROP_PROJECT).map(text).unwrap_or_default();
    let creator = vevent.find_prop(PROP_CREATOR).map(text).unwrap_or_default();

    let created = vevent
        .find_prop("DTSTAMP")
        .and_then(|p| parse_utc_stamp(p.val.as_ref()))
        .unwrap_or_else(Utc::now);

    Some(PersistedEvent {
        id,
        project,
        creator,
        title,
        description,
        occurrence: Occurrence::new(start, end),
        created,
        recurrence: parse_recurrence(vevent),
    })
}

/// Recurrence metadata is all-or-nothing: a row missing any piece is treated
/// as a one-off event.
fn parse_recurrence(vevent: &Component) -> Option<RecurrenceMeta> {
    let series_id = vevent.find_prop(PROP_SERIES).map(text)?;
    let rule = vevent.find_prop(PROP_RULE).map(text)?;
    let days = vevent
        .find_prop(PROP_DAYS)
        .map(text)?
        .split(',')
        .map(|code| parse_weekday(code).ok())
        .collect::<Option<Vec<_>>>()?;
    let end_date = parse_basic_date(&text(vevent.find_prop(PROP_END_DATE)?))?;
    let first_date = parse_basic_date(&text(vevent.find_prop(PROP_FIRST_DATE)?))?;
    let start_time = parse_basic_time(&text(vevent.find_prop(PROP_START_TIME)?))?;
    let end_time = parse_basic_time(&text(vevent.find_prop(PROP_END_TIME)?))?;
    let day_span = text(vevent.find_prop(PROP_DAY_SPAN)?).trim().parse().ok()?;

    Some(RecurrenceMeta {
        series_id,
        rule,
        days,
        end_date,
        first_date,
        start_time,
        end_time,
        day_span,
    })
}

/// Convert icalendar's DatePerhapsTime to a zoned instant.
/// UTC and floating values are read as UTC; all-day values are not stored
/// events and are rejected.
fn to_zoned(dpt: DatePerhapsTime) -> Option<DateTime<Tz>> {
    match dpt {
        DatePerhapsTime::Date(_) => None,
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(dt.with_timezone(&Tz::UTC)),
            CalendarDateTime::Floating(naive) => Some(naive.and_utc().with_timezone(&Tz::UTC)),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz: Tz = tzid.parse().ok()?;
                Some(compose_local(tz, date_time.date(), date_time.time()))
            }
        },
    }
}

/// Property value with RFC 5545 TEXT escapes removed.
fn text(prop: &Property) -> String {
    let raw = prop.val.as_ref();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn parse_basic_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y%m%d").ok()
}

fn parse_basic_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H%M%S").ok()
}

fn parse_utc_stamp(s: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s.trim_end_matches('Z'), "%Y%m%dT%H%M%S")
        .ok()
        .map(|dt| dt.and_utc())
}
