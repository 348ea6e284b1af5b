//! CLI module for the API key console
//!
//! Provides subcommands against a project's API keys:
//! - `list`: print the secret keys table
//! - `create`: create a key and print the refreshed table

pub mod create;
pub mod list;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// API Key Console - manage a project's API keys
#[derive(Parser)]
#[command(name = "api-key-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the project's secret API keys
    List(list::ListArgs),

    /// Create a new API key
    Create(create::CreateArgs),
}

/// Load `.env` and configuration, then install logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&logging::LoggingConfig::from(&config.logging));

    config
}
