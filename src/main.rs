//! `lzforge` CLI entry point.
//!
//! Parses arguments, initializes tracing from `RUST_LOG`, and renders any
//! failure through the user-friendly error layer.

use anyhow::Result;
use clap::Parser;
use lzforge::cli::Cli;
use lzforge::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let context = user_friendly_error(e);
            context.display();
            std::process::exit(1);
        }
    }
}
