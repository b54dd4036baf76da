mod commands;
mod logging;
mod remote;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use veenzo_core::Veenzo;

use crate::commands::new::FormArgs;

#[derive(Parser)]
#[command(name = "veenzo")]
#[command(about = "Plan recurring project events and sync them to your calendar")]
struct Cli {
    /// Project to operate on (by slug)
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a project
    Init { name: String },

    /// Connect a project to a Google calendar
    Connect {
        /// Google account email
        #[arg(long)]
        account: String,

        /// OAuth access token for the account
        #[arg(long)]
        access_token: String,

        #[arg(long)]
        refresh_token: Option<String>,

        #[arg(long, default_value = "primary")]
        calendar_id: String,
    },

    /// Create an event (or a weekly series) and sync it
    New {
        #[command(flatten)]
        form: FormArgs,

        /// Read the event form from a JSON file instead of flags
        #[arg(long, conflicts_with = "title")]
        form_file: Option<PathBuf>,

        /// Store locally only
        #[arg(long)]
        no_sync: bool,
    },

    /// List stored events, grouped by day
    Events {
        /// Only this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Delete events by id, or every event on a day
    Delete {
        /// Event ids (or unique id prefixes)
        #[arg(required_unless_present = "date")]
        ids: Vec<String>,

        #[arg(long, conflicts_with = "ids")]
        date: Option<NaiveDate>,
    },

    /// Push every stored event to the connected calendar
    Sync,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let veenzo = Veenzo::load()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&veenzo, &name),
        Commands::Connect {
            account,
            access_token,
            refresh_token,
            calendar_id,
        } => {
            let project = veenzo.resolve_project(cli.project.as_deref())?;
            commands::connect::run(project, &account, access_token, refresh_token, &calendar_id)
        }
        Commands::New {
            form,
            form_file,
            no_sync,
        } => {
            let project = veenzo.resolve_project(cli.project.as_deref())?;
            let form = match form_file {
                Some(path) => commands::new::read_form(&path)?,
                None => form.into_form(),
            };
            commands::new::run(&veenzo, &project, form, !no_sync).await
        }
        Commands::Events { date } => {
            let project = veenzo.resolve_project(cli.project.as_deref())?;
            commands::events::run(&project, date)
        }
        Commands::Delete { ids, date } => {
            let project = veenzo.resolve_project(cli.project.as_deref())?;
            commands::delete::run(&project, &ids, date).await
        }
        Commands::Sync => {
            let project = veenzo.resolve_project(cli.project.as_deref())?;
            commands::sync::run(&veenzo, &project).await
        }
    }
}
