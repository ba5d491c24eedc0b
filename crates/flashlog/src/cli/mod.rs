//! Command-line interface for flashlog.
//!
//! This module provides the CLI structure for the `flashlog` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AppendCommand, ConfigCommand, EraseCommand, OutputFormat, ReplayCommand, SampleCommand,
    StatusCommand,
};

/// flashlog - Keep short records on raw flash
///
/// Appends text records to the last page of a simulated NOR flash device,
/// replays them, and erases the page when it fills up.
#[derive(Debug, Parser)]
#[command(name = "flashlog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Append a record
    Append(AppendCommand),

    /// Print every record still on flash
    Replay(ReplayCommand),

    /// Erase the log region
    Erase(EraseCommand),

    /// Show region occupancy
    Status(StatusCommand),

    /// Record a temperature sample
    Sample(SampleCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
