use std::fs::File;
use std::path::Path;

use polars::io::parquet::write::ParquetWriter;
use polars::prelude::DataFrame;
use tracing::info;

use crate::errors::{Result, TripError};

/// Write `df` to `path` as a single Parquet file, replacing any existing file.
/// Returns the number of bytes written.
pub fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<u64> {
    let file = File::create(path).map_err(|err| TripError::io(path, err))?;
    let bytes = ParquetWriter::new(file).finish(df)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        bytes,
        "wrote parquet"
    );
    Ok(bytes)
}
