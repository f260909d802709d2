use std::io::{BufRead, Write};

use csv::ByteRecord;
use serde::Serialize;
use tracing::debug;

use crate::errors::Result;

/// Field positions that must hold finite numbers for a row to be kept.
/// Position 14 is the trailing `gender` field of the raw export.
const NUMERIC_FIELDS: [usize; 10] = [0, 3, 5, 6, 7, 9, 10, 11, 13, 14];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub kept: usize,
    pub dropped: usize,
}

/// Copy a raw trip export from `source` to `sink`, dropping rows that would
/// not survive typed conversion.
///
/// The first line is treated as a header and always kept, as are blank lines.
/// Kept rows are written byte-for-byte with a `\n` terminator; lines that are
/// not valid UTF-8 are judged on their numeric fields like any other.
pub fn clean_trips<R: BufRead, W: Write>(mut source: R, mut sink: W) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();
    let mut buf = Vec::new();
    let mut index = 0usize;
    loop {
        buf.clear();
        if source.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = strip_terminator(&buf);
        if index == 0 || line.is_empty() || is_usable_row(line) {
            sink.write_all(line)?;
            sink.write_all(b"\n")?;
            if index > 0 && !line.is_empty() {
                summary.kept += 1;
            }
        } else {
            debug!(line = index + 1, "dropping unusable trip row");
            summary.dropped += 1;
        }
        index += 1;
    }
    sink.flush()?;
    Ok(summary)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub(crate) fn is_usable_row(line: &[u8]) -> bool {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line);
    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => {}
        _ => return false,
    }

    let numeric_ok = NUMERIC_FIELDS.iter().all(|&idx| {
        record
            .get(idx)
            .and_then(|value| std::str::from_utf8(value).ok())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .is_some_and(f64::is_finite)
    });

    numeric_ok && !record.iter().any(|value| value.is_empty() || value == b"NULL")
}
