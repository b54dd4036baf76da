use anyhow::Result;
use owo_colors::OwoColorize;
use veenzo_core::{EventStore, Project, Reconciler, Veenzo};

use crate::remote;
use crate::render::Render;
use crate::utils::tui;

pub async fn run(veenzo: &Veenzo, project: &Project) -> Result<()> {
    let calendar = remote::require(project)?;
    let events = project.list()?;

    if events.is_empty() {
        println!("{}", "Nothing to sync".dimmed());
        return Ok(());
    }

    let reconciler = Reconciler::new(&calendar).with_throttle(veenzo.config().sync.throttle());

    let spinner = tui::create_spinner(format!("Syncing {}", project.slug));
    let summary = reconciler.sync_all(&events).await;
    spinner.finish_and_clear();

    println!("{}", summary.render());

    if summary.has_errors() {
        println!(
            "{}",
            "Some events failed to sync. Run `veenzo sync` again to retry, or -v for details."
                .dimmed()
        );
    }

    Ok(())
}
