use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter a raw trip export on stdin, writing only usable rows to stdout.
///
/// The first line is passed through as the header.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    Cli::parse();

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());
    let summary = trips_core::clean_trips(stdin, stdout).context("failed to clean trip rows")?;

    info!(kept = summary.kept, dropped = summary.dropped, "clean complete");
    Ok(())
}
