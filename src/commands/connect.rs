use anyhow::Result;
use owo_colors::OwoColorize;
use veenzo_core::Project;
use veenzo_provider_google::{GoogleRemoteConfig, Session};

pub fn run(
    mut project: Project,
    account: &str,
    access_token: String,
    refresh_token: Option<String>,
    calendar_id: &str,
) -> Result<()> {
    let session = Session::new(account, access_token, refresh_token);
    let session_path = session.save()?;

    project.set_remote(GoogleRemoteConfig::new(account, calendar_id).into())?;

    println!(
        "{} {} {}",
        project.slug.bold(),
        "→".dimmed(),
        format!("{} ({})", calendar_id, account).green()
    );
    println!(
        "{}",
        format!("Session saved to {}", session_path.display()).dimmed()
    );

    Ok(())
}
