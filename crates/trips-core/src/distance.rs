use polars::prelude::*;
use tracing::debug;

use crate::schema::{TripField, DISTANCE_COLUMN};

/// Mean Earth radius used for the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points given in degrees.
///
/// NaN inputs produce NaN.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Append a `distance` column (Float64, km) computed from the start and end
/// station coordinates of every row.
pub fn append_distance(df: &mut DataFrame) -> PolarsResult<()> {
    let start_lat = coordinate(df, TripField::StartStationLatitude)?;
    let start_lon = coordinate(df, TripField::StartStationLongitude)?;
    let end_lat = coordinate(df, TripField::EndStationLatitude)?;
    let end_lon = coordinate(df, TripField::EndStationLongitude)?;

    let distances: Vec<f64> = start_lat
        .iter()
        .zip(start_lon.iter())
        .zip(end_lat.iter().zip(end_lon.iter()))
        .map(|((lat1, lon1), (lat2, lon2))| haversine_km(*lat1, *lon1, *lat2, *lon2))
        .collect();

    debug!(rows = distances.len(), "computed trip distances");
    df.with_column(Series::new(DISTANCE_COLUMN.into(), distances))?;
    Ok(())
}

fn coordinate(df: &DataFrame, field: TripField) -> PolarsResult<Vec<f64>> {
    let column = df
        .column(field.column_name())?
        .cast(&DataType::Float64)?;
    Ok(column
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(f64::NAN))
        .collect())
}
