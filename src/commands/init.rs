use anyhow::Result;
use owo_colors::OwoColorize;
use veenzo_core::Veenzo;

pub fn run(veenzo: &Veenzo, name: &str) -> Result<()> {
    let project = veenzo.create_project(name)?;

    println!(
        "{} {}",
        "Created project".green(),
        project.path().display()
    );
    println!(
        "{}",
        format!(
            "Connect a calendar with: veenzo connect -p {} --account <email> --access-token <token>",
            project.slug
        )
        .dimmed()
    );

    Ok(())
}
