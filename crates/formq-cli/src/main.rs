//! formq CLI - submit visitor forms and keep them queued while offline
//!
//! Submissions that cannot be delivered are stored locally and resent when
//! the endpoint becomes reachable again.

mod cli;
mod commands;
mod config_profiles;
mod error;
mod notifier;


use clap::Parser;

use crate::cli::{Cli, Commands, QueueCommands};
use crate::commands::common::{resolve_db_path, CliContext};
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::queue::{run_queue_clear, run_queue_list};
use crate::commands::regions::run_regions;
use crate::commands::resync::run_resync;
use crate::commands::submit::run_submit;
use crate::commands::watch::run_watch;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "formq=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = CliContext {
        db_path: resolve_db_path(cli.db_path),
        profile: cli.profile,
        endpoint: cli.endpoint,
        timeout_secs: cli.timeout,
        bell: cli.bell,
    };

    match cli.command {
        Commands::Submit {
            fields,
            attachments,
            offline,
        } => run_submit(&ctx, &fields, &attachments, offline).await?,
        Commands::Queue { command } => match command {
            QueueCommands::List { json } => run_queue_list(json, &ctx.db_path).await?,
            QueueCommands::Clear => run_queue_clear(&ctx.db_path).await?,
        },
        Commands::Resync { json } => run_resync(&ctx, json).await?,
        Commands::Watch { interval } => run_watch(&ctx, interval).await?,
        Commands::Regions { country, state } => run_regions(&country, state.as_deref())?,
        Commands::Config { command } => run_config(command, ctx.profile.as_deref())?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
