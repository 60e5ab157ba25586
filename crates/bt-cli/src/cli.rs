//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::batch::BatchArgs;
use crate::commands::estimate::EstimateArgs;
use crate::commands::validate::ValidateArgs;

/// Baby tracker catch-up mode.
///
/// Retroactively log feedings, diaper changes, and naps with estimated times
/// spread across a time window.
#[derive(Debug, Parser)]
#[command(name = "bt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check a catch-up window for problems.
    Validate(ValidateArgs),

    /// Estimate times for a list of events.
    Estimate(EstimateArgs),

    /// List preset windows.
    Presets,

    /// Build the batch submission payload for a list of events.
    Batch(BatchArgs),
}
