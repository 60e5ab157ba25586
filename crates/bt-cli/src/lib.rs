//! Baby tracker catch-up CLI library.
//!
//! This crate provides the CLI interface over the catch-up estimation engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
