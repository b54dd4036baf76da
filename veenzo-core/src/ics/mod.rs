//! ICS file generation and parsing for stored project events.
//!
//! Each stored row is one VEVENT. Project, creator and recurrence metadata
//! travel as `X-VEENZO-*` properties so that the file stays a plain,
//! non-recurring event for any other calendar tool.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::parse_event;

pub(crate) const PROP_PROJECT: &str = "X-VEENZO-PROJECT";
pub(crate) const PROP_CREATOR: &str = "X-VEENZO-CREATOR";
pub(crate) const PROP_SERIES: &str = "X-VEENZO-SERIES";
pub(crate) const PROP_RULE: &str = "X-VEENZO-RRULE";
pub(crate) const PROP_DAYS: &str = "X-VEENZO-RECURRENCE-DAYS";
pub(crate) const PROP_END_DATE: &str = "X-VEENZO-RECURRENCE-END";
pub(crate) const PROP_FIRST_DATE: &str = "X-VEENZO-SERIES-START";
pub(crate) const PROP_START_TIME: &str = "X-VEENZO-SERIES-START-TIME";
pub(crate) const PROP_END_TIME: &str = "X-VEENZO-SERIES-END-TIME";
pub(crate) const PROP_DAY_SPAN: &str = "X-VEENZO-SERIES-DAY-SPAN";
