//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Append command arguments.
#[derive(Debug, Args)]
pub struct AppendCommand {
    /// Text to store (at most 62 bytes)
    pub text: String,
}

/// Replay command arguments.
#[derive(Debug, Args)]
pub struct ReplayCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Erase command arguments.
#[derive(Debug, Args)]
pub struct EraseCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Sample command arguments.
#[derive(Debug, Args)]
pub struct SampleCommand {
    /// Raw sensor value in quarter degrees Celsius
    #[arg(allow_negative_numbers = true)]
    pub raw: i32,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for replayed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Slot, state and payload columns
    #[default]
    Table,
    /// Payloads only, one per line
    Plain,
    /// JSON array
    Json,
}
