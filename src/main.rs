// ABOUTME: Entry point for the devconf CLI application.
// ABOUTME: Parses arguments and dispatches to the decoders.

mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use devconf::config::{Decoder, DevContainer, Strictness};
use devconf::error::Result;
use devconf::feature::FeatureDescriptor;
use output::{Output, OutputMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = match &cli.command {
        Commands::Show { json: true, .. } | Commands::Feature { json: true, .. } => {
            OutputMode::Json
        }
        _ => OutputMode::Normal,
    };
    let output = Output::new(mode);

    if let Err(e) = run(cli, &output) {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    match cli.command {
        Commands::Show { path, lenient, .. } => {
            let path = match path {
                Some(path) => path,
                None => DevContainer::locate(&current_dir()?)?,
            };
            let strictness = if lenient {
                Strictness::Lenient
            } else {
                Strictness::Strict
            };

            let mut decoder = Decoder::new(strictness);
            let config = DevContainer::load_with(&path, &mut decoder)?;
            tracing::debug!(
                "decoded {} with {} warning(s)",
                path.display(),
                decoder.diagnostics().warnings().len()
            );
            output.config(&config);
            Ok(())
        }
        Commands::Feature { path, .. } => {
            let feature = FeatureDescriptor::load(&path)?;
            output.feature(&feature);
            Ok(())
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|source| devconf::error::Error::Io {
        path: PathBuf::from("."),
        source,
    })
}
