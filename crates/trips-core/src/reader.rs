use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use polars::prelude::*;
use tracing::{debug, info};

use crate::errors::{Result, TripError};
use crate::schema::{ColumnKind, SchemaVariant, TripField, TRIP_FIELD_COUNT};

/// Read a headerless trip CSV into a frame typed per `variant`.
///
/// Only the first [`TRIP_FIELD_COUNT`] fields of each line are used. Any value
/// that does not fit its declared column type aborts the whole read.
pub fn read_trips(path: &Path, variant: SchemaVariant) -> Result<DataFrame> {
    let file = File::open(path).map_err(|err| TripError::io(path, err))?;
    debug!(path = %path.display(), %variant, "reading trip csv");
    let df = read_trips_from(file, variant)?;
    info!(path = %path.display(), rows = df.height(), "parsed trip records");
    Ok(df)
}

pub fn read_trips_from<R: Read>(source: R, variant: SchemaVariant) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut columns = TripColumns::new(variant);
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        columns.push_record(&record, line)?;
    }

    columns.into_dataframe()
}

enum ColumnBuffer {
    Int32(Vec<i32>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Datetime(Vec<Option<i64>>),
    Categorical(Vec<Option<String>>),
}

impl ColumnBuffer {
    fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Int32 => ColumnBuffer::Int32(Vec::new()),
            ColumnKind::UInt16 => ColumnBuffer::UInt16(Vec::new()),
            ColumnKind::UInt32 => ColumnBuffer::UInt32(Vec::new()),
            ColumnKind::Float32 => ColumnBuffer::Float32(Vec::new()),
            ColumnKind::Datetime => ColumnBuffer::Datetime(Vec::new()),
            ColumnKind::Categorical => ColumnBuffer::Categorical(Vec::new()),
        }
    }

    fn push(&mut self, field: TripField, value: &str, line: u64) -> Result<()> {
        let column = field.column_name();
        match self {
            ColumnBuffer::Int32(values) => values.push(parse_integer(value, line, column)?),
            ColumnBuffer::UInt16(values) => values.push(parse_integer(value, line, column)?),
            ColumnBuffer::UInt32(values) => values.push(parse_integer(value, line, column)?),
            ColumnBuffer::Float32(values) => values.push(parse_float(value, line, column)?),
            ColumnBuffer::Datetime(values) => {
                values.push(parse_optional_timestamp(value, line, column)?)
            }
            ColumnBuffer::Categorical(values) => {
                values.push(Some(value).filter(|v| !is_missing(v)).map(str::to_string))
            }
        }
        Ok(())
    }

    fn into_column(self, field: TripField) -> Result<Column> {
        let name = field.column_name().into();
        let series = match self {
            ColumnBuffer::Int32(values) => Series::new(name, values),
            ColumnBuffer::UInt16(values) => Series::new(name, values),
            ColumnBuffer::UInt32(values) => Series::new(name, values),
            ColumnBuffer::Float32(values) => Series::new(name, values),
            ColumnBuffer::Datetime(values) => {
                Series::new(name, values).cast(&ColumnKind::Datetime.dtype())?
            }
            ColumnBuffer::Categorical(values) => {
                let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
                Series::new(name, utf8).cast(&ColumnKind::Categorical.dtype())?
            }
        };
        Ok(series.into())
    }
}

struct TripColumns {
    buffers: Vec<(TripField, ColumnBuffer)>,
}

impl TripColumns {
    fn new(variant: SchemaVariant) -> Self {
        let buffers = TripField::ALL
            .iter()
            .map(|field| (*field, ColumnBuffer::for_kind(variant.kind_of(*field))))
            .collect();
        Self { buffers }
    }

    fn push_record(&mut self, record: &StringRecord, line: u64) -> Result<()> {
        if record.len() < TRIP_FIELD_COUNT {
            return Err(TripError::TooFewFields {
                line,
                expected: TRIP_FIELD_COUNT,
                found: record.len(),
            });
        }
        for ((field, buffer), value) in self.buffers.iter_mut().zip(record.iter()) {
            buffer.push(*field, value, line)?;
        }
        Ok(())
    }

    fn into_dataframe(self) -> Result<DataFrame> {
        let columns = self
            .buffers
            .into_iter()
            .map(|(field, buffer)| buffer.into_column(field))
            .collect::<Result<Vec<Column>>>()?;
        Ok(DataFrame::new(columns)?)
    }
}

pub(crate) fn parse_integer<T>(value: &str, line: u64, column: &'static str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| TripError::DataRow {
        line,
        column,
        value: value.to_string(),
        message: format!("not a valid {}: {err}", std::any::type_name::<T>()),
    })
}

/// Tokens read as a missing value in float, datetime and categorical columns.
/// Integer columns have no missing representation and reject these.
pub(crate) const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) fn is_missing(value: &str) -> bool {
    NA_TOKENS.contains(&value.trim())
}

/// Missing coordinates become NaN rather than an error; NaN flows through the
/// distance computation untouched.
pub(crate) fn parse_float(value: &str, line: u64, column: &'static str) -> Result<f32> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(f32::NAN);
    }
    trimmed.parse::<f32>().map_err(|err| TripError::DataRow {
        line,
        column,
        value: value.to_string(),
        message: format!("not a valid float: {err}"),
    })
}

fn parse_optional_timestamp(value: &str, line: u64, column: &'static str) -> Result<Option<i64>> {
    let trimmed = value.trim();
    if is_missing(trimmed) {
        return Ok(None);
    }
    parse_timestamp(trimmed)
        .map(Some)
        .ok_or_else(|| TripError::DataRow {
            line,
            column,
            value: value.to_string(),
            message: "unrecognized timestamp format".to_string(),
        })
}

/// Parse a timestamp into microseconds since the epoch.
///
/// Naive values are taken as-is; values carrying an offset are normalised to
/// UTC. A bare date maps to midnight.
pub fn parse_timestamp(value: &str) -> Option<i64> {
    static FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S%.f",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc().timestamp_micros());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_micros());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_micros())
}
