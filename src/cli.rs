// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devconf")]
#[command(about = "Inspect devcontainer.json and devcontainer-feature.json files")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a devcontainer.json and print what it configures
    Show {
        /// Path to the file (default: discovered from the current directory)
        path: Option<PathBuf>,

        /// Print the decoded model as JSON
        #[arg(long)]
        json: bool,

        /// Accept integer ports and blank commands
        #[arg(long)]
        lenient: bool,
    },

    /// Decode a devcontainer-feature.json
    Feature {
        /// Path to the feature descriptor
        path: PathBuf,

        /// Print the decoded descriptor as JSON
        #[arg(long)]
        json: bool,
    },
}
