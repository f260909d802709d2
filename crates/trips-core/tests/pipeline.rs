use std::fs::{self, File};
use std::path::PathBuf;

use polars::prelude::*;
use tempfile::tempdir;
use trips_core::{convert, SchemaVariant, TripError, DISTANCE_COLUMN};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn read_back(path: &std::path::Path) -> DataFrame {
    let file = File::open(path).expect("output parquet should exist");
    ParquetReader::new(file)
        .finish()
        .expect("output should be readable parquet")
}

#[test]
fn signed_conversion_writes_distance_column() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("trips.parquet");

    let summary = convert(&fixture("trips_sample.csv"), &output, SchemaVariant::Signed)
        .expect("conversion succeeded");
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.columns, 15);
    assert!(summary.bytes_written > 0);

    let df = read_back(&output);
    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names_str(),
        SchemaVariant::Signed.column_names()
    );
    assert_eq!(df.column("duration").unwrap().dtype(), &DataType::Int32);
    assert_eq!(df.column("birth_year").unwrap().dtype(), &DataType::Int32);
    assert_eq!(
        df.column("end_station_longitude").unwrap().dtype(),
        &DataType::Float32
    );
    assert_eq!(
        df.column("stop_time").unwrap().dtype(),
        &DataType::Datetime(TimeUnit::Microseconds, None)
    );

    let distance = df.column(DISTANCE_COLUMN).unwrap().f64().unwrap();
    assert!((distance.get(0).unwrap() - 78.296).abs() < 0.05);
    assert!(distance.get(1).unwrap() > 0.0);
    assert_eq!(distance.get(2), Some(0.0));

    let user_type = df
        .column("user_type")
        .unwrap()
        .cast(&DataType::String)
        .unwrap();
    let user_type = user_type.str().unwrap();
    assert_eq!(user_type.get(0), Some("Subscriber"));
    assert_eq!(user_type.get(2), Some("Customer"));
}

#[test]
fn compact_conversion_has_no_distance() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("trips.parquet");

    let summary = convert(&fixture("trips_sample.csv"), &output, SchemaVariant::Compact)
        .expect("conversion succeeded");
    assert_eq!(summary.columns, 14);

    let df = read_back(&output);
    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names_str(),
        SchemaVariant::Compact.column_names()
    );
    assert!(df.column(DISTANCE_COLUMN).is_err());
    assert_eq!(df.column("duration").unwrap().dtype(), &DataType::UInt16);
    assert_eq!(df.column("bike_id").unwrap().dtype(), &DataType::UInt32);

    let duration = df.column("duration").unwrap().u16().unwrap();
    assert_eq!(duration.get(0), Some(970));
    let birth_year = df.column("birth_year").unwrap().u16().unwrap();
    assert_eq!(birth_year.get(1), Some(1969));
}

#[test]
fn conversion_is_deterministic() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.parquet");
    let second = dir.path().join("second.parquet");

    convert(&fixture("trips_sample.csv"), &first, SchemaVariant::Signed).unwrap();
    convert(&fixture("trips_sample.csv"), &second, SchemaVariant::Signed).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn existing_output_is_replaced() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("trips.parquet");
    fs::write(&output, b"stale contents that are not parquet").unwrap();

    convert(&fixture("trips_sample.csv"), &output, SchemaVariant::Compact).unwrap();
    assert_eq!(read_back(&output).height(), 3);
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("does-not-exist.csv");
    let output = dir.path().join("trips.parquet");

    match convert(&input, &output, SchemaVariant::Signed) {
        Err(TripError::Io { path, .. }) => assert_eq!(path, input),
        other => panic!("expected Io error, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn missing_output_directory_is_an_io_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("nested/missing/trips.parquet");

    match convert(&fixture("trips_sample.csv"), &output, SchemaVariant::Signed) {
        Err(TripError::Io { path, .. }) => assert_eq!(path, output),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn malformed_row_aborts_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    let output = dir.path().join("trips.parquet");
    let sample = fs::read_to_string(fixture("trips_sample.csv")).unwrap();
    fs::write(&input, sample.replacen("32536", "n/a", 1)).unwrap();

    match convert(&input, &output, SchemaVariant::Signed) {
        Err(TripError::DataRow { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "bike_id");
        }
        other => panic!("expected DataRow error, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn missing_values_survive_conversion() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("gaps.csv");
    let output = dir.path().join("trips.parquet");
    let sample = fs::read_to_string(fixture("trips_sample.csv")).unwrap();
    let gappy = sample
        .replacen("40.0,-73.9", ",NULL", 1)
        .replacen("\"Station B\"", "\"\"", 1)
        .replacen("\"2018-01-01 14:07:08.1860\"", "", 1);
    fs::write(&input, gappy).unwrap();

    let summary = convert(&input, &output, SchemaVariant::Signed).expect("gaps are not errors");
    assert_eq!(summary.rows, 3);

    let df = read_back(&output);
    assert_eq!(df.height(), 3);

    let distance = df.column(DISTANCE_COLUMN).unwrap().f64().unwrap();
    assert!(distance.get(0).unwrap().is_nan());
    assert!(!distance.get(1).unwrap().is_nan());

    let end_name = df
        .column("end_station_name")
        .unwrap()
        .cast(&DataType::String)
        .unwrap();
    assert_eq!(end_name.str().unwrap().get(0), None);
    assert_eq!(end_name.str().unwrap().get(1), Some("8 Ave & W 31 St"));

    let stop_time = df.column("stop_time").unwrap();
    assert_eq!(stop_time.null_count(), 1);
    assert!(stop_time.get(0).unwrap().is_null());
}
