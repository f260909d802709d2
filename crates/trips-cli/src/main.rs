use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trips_core::SchemaVariant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert a headerless bike-share trip CSV to Parquet", long_about = None)]
struct Cli {
    /// Headerless trip CSV to read
    input: PathBuf,
    /// Parquet file to write (replaced if it exists)
    output: PathBuf,
    /// Column layout to apply
    #[arg(long, value_enum, default_value_t = SchemaArg::Signed)]
    schema: SchemaArg,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SchemaArg {
    /// int32 integers plus a derived `distance` column
    Signed,
    /// uint16/uint32 integers, no distance column
    Compact,
}

impl From<SchemaArg> for SchemaVariant {
    fn from(arg: SchemaArg) -> Self {
        match arg {
            SchemaArg::Signed => SchemaVariant::Signed,
            SchemaArg::Compact => SchemaVariant::Compact,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let variant = SchemaVariant::from(cli.schema);
    info!(input = %cli.input.display(), output = %cli.output.display(), %variant, "starting conversion");

    let summary = trips_core::convert(&cli.input, &cli.output, variant).with_context(|| {
        format!(
            "failed to convert {} to {}",
            cli.input.display(),
            cli.output.display()
        )
    })?;

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
