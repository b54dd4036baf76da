use std::path::Path;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::warn;
use veenzo_core::{EventForm, Project, Reconciler, Veenzo};

use crate::remote;
use crate::render::{Render, pluralize};
use crate::utils::tui;

/// Event form fields as command-line flags.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// HH:MM
    #[arg(long)]
    pub start_time: Option<String>,

    /// YYYY-MM-DD (defaults to the start date)
    #[arg(long)]
    pub end_date: Option<String>,

    /// HH:MM
    #[arg(long)]
    pub end_time: Option<String>,

    /// none, weekly or custom
    #[arg(long)]
    pub recurrence: Option<String>,

    /// Weekdays for a weekly series (e.g. "monday,wednesday")
    #[arg(long, value_delimiter = ',')]
    pub days: Vec<String>,

    /// Last day of a weekly series (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// IANA time zone (defaults to the configured or system zone)
    #[arg(long)]
    pub time_zone: Option<String>,
}

impl FormArgs {
    pub fn into_form(self) -> EventForm {
        EventForm {
            title: self.title.unwrap_or_default(),
            description: self.description,
            start_date: self.start_date.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_default(),
            end_date: self.end_date,
            end_time: self.end_time.unwrap_or_default(),
            recurrence_type: self.recurrence,
            selected_days: self.days,
            recurrence_end_date: self.until,
            time_zone: self.time_zone,
        }
    }
}

pub fn read_form(path: &Path) -> Result<EventForm> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event form from {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse event form from {}", path.display()))
}

pub async fn run(veenzo: &Veenzo, project: &Project, form: EventForm, sync: bool) -> Result<()> {
    let default_tz = default_time_zone(veenzo)?;
    let spec = form.into_spec(default_tz)?;

    let rows = project.create_from_spec(&spec, &creator(veenzo))?;

    println!(
        "{} {} {}",
        "Created".green(),
        rows.len(),
        pluralize("event", rows.len())
    );
    for row in &rows {
        println!("  {} {}", row.date().format("%a %b %-d").dimmed(), row.render());
    }

    // One spec is one remote event: the single row, or the series its rows share
    let Some(representative) = rows.first() else {
        return Ok(());
    };
    if !sync {
        return Ok(());
    }

    // Stored rows stay even if the calendar can't be reached
    let calendar = match remote::connected(project) {
        Ok(Some(calendar)) => calendar,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!(error = %e, "could not open connected calendar");
            println!("{}", format!("Not synced: {e}").yellow());
            return Ok(());
        }
    };

    let reconciler = Reconciler::new(&calendar);

    let spinner = tui::create_spinner("Syncing".to_string());
    let outcome = reconciler.sync_one(representative, true).await;
    spinner.finish_and_clear();

    println!("{}: {}", representative.title, outcome.render());
    Ok(())
}

/// Configured zone, else the system zone, else UTC.
fn default_time_zone(veenzo: &Veenzo) -> Result<Tz> {
    if let Some(tz) = veenzo.config().time_zone()? {
        return Ok(tz);
    }

    Ok(iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC))
}

fn creator(veenzo: &Veenzo) -> String {
    veenzo
        .config()
        .creator
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string())
}
