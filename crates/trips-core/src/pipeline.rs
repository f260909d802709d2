use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::distance::append_distance;
use crate::errors::Result;
use crate::reader::read_trips;
use crate::schema::SchemaVariant;
use crate::writer::write_parquet;

#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub variant: SchemaVariant,
    pub rows: usize,
    pub columns: usize,
    pub bytes_written: u64,
}

/// Read `input`, add the distance column when the variant carries one, and
/// write the result to `output`.
pub fn convert(input: &Path, output: &Path, variant: SchemaVariant) -> Result<ConversionSummary> {
    let mut df = read_trips(input, variant)?;
    if variant.includes_distance() {
        append_distance(&mut df)?;
    }
    let bytes_written = write_parquet(&mut df, output)?;

    let summary = ConversionSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        variant,
        rows: df.height(),
        columns: df.width(),
        bytes_written,
    };
    info!(rows = summary.rows, columns = summary.columns, %variant, "conversion complete");
    Ok(summary)
}
