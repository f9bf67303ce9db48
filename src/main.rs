//! envwiz - Interactive .env file manager

use anyhow::{Context as _, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envwiz::cli::{actions, args::Commands, Cli, Context};
use envwiz::model::Config;

/// Log filter from `ENVWIZ_LOG`, `warn` when unset; output to the configured
/// file or stderr.
fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_from_env("ENVWIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match &config.log.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle --config early (opens envwiz config file in editor)
    if cli.config {
        return envwiz::config::edit_config();
    }

    let ctx = Context::from_cli(&cli)?;
    init_logging(&ctx.config)?;
    tracing::debug!(env_file = %ctx.env_file.display(), schema = %ctx.schema_file.display(), "starting");

    match &cli.command {
        None | Some(Commands::Prompt) => actions::prompt::execute(&ctx),
        Some(Commands::Get { keys }) => actions::get::execute(&ctx, keys),
        Some(Commands::Set {
            assignments,
            on_conflict,
        }) => actions::set::execute(&ctx, assignments, *on_conflict),
        Some(Commands::List) => actions::list::execute(&ctx),
        Some(Commands::Backup { backup_command }) => actions::backup::execute(&ctx, backup_command),
    }
}
