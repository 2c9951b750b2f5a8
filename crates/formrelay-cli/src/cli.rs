//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Watch a directory of form photographs and relay extracted field values
/// into the results table
#[derive(Debug, Parser)]
#[command(name = "formrelay", version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, env = "FORMRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the watch loop (runs until Ctrl+C)
    Run,

    /// Write a default configuration file
    Init,

    /// Print the most recently committed record
    Latest {
        /// Print as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and report each section
    Check,
}
