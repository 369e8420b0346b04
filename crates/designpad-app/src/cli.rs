//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "designpad", author, version, about)]
pub struct Cli {
    /// Directory of the local design store.
    #[arg(long, global = true, conflicts_with = "remote")]
    pub store: Option<PathBuf>,
    /// WebSocket URL of a remote design store (overrides the config file).
    #[arg(long, global = true)]
    pub remote: Option<String>,
    /// Config file (defaults to the user config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// List stored designs.
    List,
    /// Summarize a stored design.
    Show { name: String },
    /// Delete a stored design.
    Delete { name: String },
    /// Print the draw commands for a stored design.
    Render {
        name: String,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
    /// Drive an editing session from a JSON script.
    Replay {
        script: PathBuf,
        /// Save the result under this name.
        #[arg(long)]
        save: Option<String>,
    },
    /// Summarize the local auto-save.
    Restore,
}
