//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the Holly API using
//! clap. Running the binary without a subcommand starts the server.

pub mod commands;

use clap::{Parser, Subcommand};

/// Holly API - ElevenLabs conversation webhook backend
#[derive(Parser, Debug)]
#[command(name = "holly-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults and environment are used if it does not exist)
    #[arg(short, long, default_value = "holly.toml", env = "HOLLY_CONFIG", global = true)]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HOLLY_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute (default: serve)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The selected command, with `serve` as the default
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(commands::serve::ServeArgs::default()))
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Provision storage and run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Connect to storage and show container status
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether this command runs the long-lived server
    pub fn is_serve(&self) -> bool {
        matches!(self, Commands::Serve(_))
    }
}
