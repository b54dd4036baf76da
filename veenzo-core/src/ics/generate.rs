//! ICS file generation.

use chrono::DateTime;
use chrono_tz::Tz;
use icalendar::{Calendar, Component, EventLike, Property};

use super::{
    PROP_CREATOR, PROP_DAY_SPAN, PROP_DAYS, PROP_END_DATE, PROP_END_TIME, PROP_FIRST_DATE,
    PROP_PROJECT, PROP_RULE, PROP_SERIES, PROP_START_TIME,
};
use crate::persisted::PersistedEvent;
use crate::recurrence::weekday_code;

/// Generate .ics content for a stored event
pub fn generate_ics(event: &PersistedEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.id);
    ics_event.summary(&event.title);
    ics_event.add_property("DTSTAMP", event.created.format("%Y%m%dT%H%M%SZ").to_string());

    add_zoned_property(&mut ics_event, "DTSTART", &event.occurrence.start);
    add_zoned_property(&mut ics_event, "DTEND", &event.occurrence.end);

    if let Some(ref desc) = event.description {
        ics_event.description(desc);
    }

    ics_event.add_property(PROP_PROJECT, &event.project);
    ics_event.add_property(PROP_CREATOR, &event.creator);

    if let Some(ref meta) = event.recurrence {
        let days: Vec<&str> = meta.days.iter().map(|d| weekday_code(*d)).collect();
        ics_event.add_property(PROP_SERIES, &meta.series_id);
        ics_event.add_property(PROP_RULE, &meta.rule);
        ics_event.add_property(PROP_DAYS, days.join(","));
        ics_event.add_property(PROP_END_DATE, meta.end_date.format("%Y%m%d").to_string());
        ics_event.add_property(PROP_FIRST_DATE, meta.first_date.format("%Y%m%d").to_string());
        ics_event.add_property(PROP_START_TIME, meta.start_time.format("%H%M%S").to_string());
        ics_event.add_property(PROP_END_TIME, meta.end_time.format("%H%M%S").to_string());
        ics_event.add_property(PROP_DAY_SPAN, meta.day_span.to_string());
    }

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with VEENZO
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:VEENZO\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

/// Add a local datetime with its TZID parameter
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, time: &DateTime<Tz>) {
    let mut prop = Property::new(
        name,
        time.naive_local().format("%Y%m%dT%H%M%S").to_string(),
    );
    prop.add_parameter("TZID", time.timezone().name());
    ics_event.append_property(prop);
}
