//! Terminal rendering for veenzo types.

use owo_colors::OwoColorize;
use veenzo_core::{PersistedEvent, SyncOutcome, SyncSummary};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for PersistedEvent {
    fn render(&self) -> String {
        let time = format!(
            "{}-{}",
            self.occurrence.start.format("%H:%M"),
            self.occurrence.end.format("%H:%M")
        );
        let repeat = if self.is_recurring() { " ↻" } else { "" };

        format!(
            "{:>11} {}{} {}",
            time,
            self.title,
            repeat.cyan(),
            short_id(&self.id).dimmed()
        )
    }
}

impl Render for SyncOutcome {
    fn render(&self) -> String {
        let label = match self {
            SyncOutcome::Created { .. } => "synced".green().to_string(),
            SyncOutcome::Skipped { .. } => "already on calendar".dimmed().to_string(),
            SyncOutcome::Failed { reason } => return reason.red().to_string(),
        };
        match self.remote_id() {
            Some(remote_id) => format!("{} {}", label, remote_id.dimmed()),
            None => label,
        }
    }
}

impl Render for SyncSummary {
    fn render(&self) -> String {
        if self.has_errors() {
            self.to_string().yellow().to_string()
        } else {
            self.to_string().green().to_string()
        }
    }
}

/// Print events grouped by start date, ascending.
pub fn print_grouped(events: &[PersistedEvent]) {
    let mut current_date = None;

    for event in events {
        let date = event.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %b %-d %Y").bold());
            current_date = Some(date);
        }
        println!("  {}", event.render());
    }
}

/// First block of a uuid, enough to tell rows apart on screen.
fn short_id(id: &str) -> &str {
    id.split('-').next().unwrap_or(id)
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
