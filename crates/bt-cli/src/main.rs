use std::io;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bt_cli::commands::{batch, estimate, presets, validate};
use bt_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let now = Utc::now();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Validate(args)) => {
            if !validate::run(&mut stdout, args, &config, now)? {
                bail!("time window is invalid");
            }
        }
        Some(Commands::Estimate(args)) => estimate::run(&mut stdout, args, &config, now)?,
        Some(Commands::Presets) => presets::run(&mut stdout, &config, now)?,
        Some(Commands::Batch(args)) => batch::run(&mut stdout, args, &config, now)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
