use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use veenzo_core::{EventStore, Project};

use crate::render::print_grouped;

pub fn run(project: &Project, date: Option<NaiveDate>) -> Result<()> {
    let events = match date {
        Some(date) => project.events_on(date)?,
        None => project.list()?,
    };

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    print_grouped(&events);
    Ok(())
}
