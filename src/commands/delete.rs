use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use tracing::warn;
use veenzo_core::{EventStore, PersistedEvent, Project, Reconciler, VeenzoError, removal_targets};

use crate::remote;
use crate::render::{Render, pluralize};

pub async fn run(project: &Project, ids: &[String], date: Option<NaiveDate>) -> Result<()> {
    let removed = match date {
        Some(date) => project.delete_on_date(date)?,
        None => {
            let events = project.list()?;
            let resolved = resolve_ids(&events, ids)?;
            project.delete_many(&resolved)?
        }
    };

    if removed.is_empty() {
        println!("{}", "No events deleted".dimmed());
        return Ok(());
    }

    println!(
        "{} {} {}",
        "Deleted".red(),
        removed.len(),
        pluralize("event", removed.len())
    );
    for event in &removed {
        println!("  {} {}", event.date().format("%a %b %-d").dimmed(), event.render());
    }

    let remaining = project.list()?;
    let targets = removal_targets(&removed, &remaining);
    if targets.is_empty() {
        return Ok(());
    }

    let calendar = match remote::connected(project) {
        Ok(Some(calendar)) => calendar,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!(error = %e, "could not open connected calendar");
            return Ok(());
        }
    };

    let reconciler = Reconciler::new(&calendar);
    let mut deleted_remotely = 0;
    for target in &targets {
        if reconciler.delete_one(target).await.is_some() {
            deleted_remotely += 1;
        }
    }

    if deleted_remotely > 0 {
        println!(
            "{}",
            format!(
                "Removed {} {} from the calendar",
                deleted_remotely,
                pluralize("event", deleted_remotely)
            )
            .dimmed()
        );
    }

    Ok(())
}

/// Match each input against stored ids, exactly or as a unique prefix.
fn resolve_ids(events: &[PersistedEvent], inputs: &[String]) -> Result<Vec<String>> {
    inputs
        .iter()
        .map(|input| {
            if let Some(event) = events.iter().find(|e| &e.id == input) {
                return Ok(event.id.clone());
            }

            let matches: Vec<&PersistedEvent> =
                events.iter().filter(|e| e.id.starts_with(input.as_str())).collect();
            match matches.as_slice() {
                [event] => Ok(event.id.clone()),
                [] => Err(anyhow::Error::from(VeenzoError::EventNotFound(input.clone()))),
                _ => anyhow::bail!("Id '{}' matches {} events", input, matches.len()),
            }
        })
        .collect()
}
