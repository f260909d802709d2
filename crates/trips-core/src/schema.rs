use std::fmt;

use polars::prelude::*;
use serde::Serialize;

/// Number of positional fields read from each input line. Anything past this
/// is ignored.
pub const TRIP_FIELD_COUNT: usize = 14;

pub const DISTANCE_COLUMN: &str = "distance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripField {
    Duration,
    StartTime,
    StopTime,
    StartStationId,
    StartStationName,
    StartStationLatitude,
    StartStationLongitude,
    EndStationId,
    EndStationName,
    EndStationLatitude,
    EndStationLongitude,
    BikeId,
    UserType,
    BirthYear,
}

impl TripField {
    /// Input order. Position `i` in this array is field `i` of every line.
    pub const ALL: [TripField; TRIP_FIELD_COUNT] = [
        TripField::Duration,
        TripField::StartTime,
        TripField::StopTime,
        TripField::StartStationId,
        TripField::StartStationName,
        TripField::StartStationLatitude,
        TripField::StartStationLongitude,
        TripField::EndStationId,
        TripField::EndStationName,
        TripField::EndStationLatitude,
        TripField::EndStationLongitude,
        TripField::BikeId,
        TripField::UserType,
        TripField::BirthYear,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            TripField::Duration => "duration",
            TripField::StartTime => "start_time",
            TripField::StopTime => "stop_time",
            TripField::StartStationId => "start_station_id",
            TripField::StartStationName => "start_station_name",
            TripField::StartStationLatitude => "start_station_latitude",
            TripField::StartStationLongitude => "start_station_longitude",
            TripField::EndStationId => "end_station_id",
            TripField::EndStationName => "end_station_name",
            TripField::EndStationLatitude => "end_station_latitude",
            TripField::EndStationLongitude => "end_station_longitude",
            TripField::BikeId => "bike_id",
            TripField::UserType => "user_type",
            TripField::BirthYear => "birth_year",
        }
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Storage type of a single trip column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int32,
    UInt16,
    UInt32,
    Float32,
    Datetime,
    Categorical,
}

impl ColumnKind {
    pub fn dtype(&self) -> DataType {
        match self {
            ColumnKind::Int32 => DataType::Int32,
            ColumnKind::UInt16 => DataType::UInt16,
            ColumnKind::UInt32 => DataType::UInt32,
            ColumnKind::Float32 => DataType::Float32,
            ColumnKind::Datetime => DataType::Datetime(TimeUnit::Microseconds, None),
            ColumnKind::Categorical => {
                DataType::Categorical(None, CategoricalOrdering::Physical)
            }
        }
    }
}

/// The two trip layouts in circulation. They share column names and order and
/// differ only in integer width/signedness and the derived distance column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaVariant {
    /// 32-bit signed integers, plus a trailing `distance` column in km.
    #[default]
    Signed,
    /// uint16 duration/birth year, uint32 identifiers, no distance column.
    Compact,
}

impl SchemaVariant {
    pub fn name(&self) -> &'static str {
        match self {
            SchemaVariant::Signed => "signed",
            SchemaVariant::Compact => "compact",
        }
    }

    pub fn kind_of(&self, field: TripField) -> ColumnKind {
        use TripField::*;
        match field {
            StartTime | StopTime => ColumnKind::Datetime,
            StartStationName | EndStationName | UserType => ColumnKind::Categorical,
            StartStationLatitude | StartStationLongitude | EndStationLatitude
            | EndStationLongitude => ColumnKind::Float32,
            Duration | BirthYear => match self {
                SchemaVariant::Signed => ColumnKind::Int32,
                SchemaVariant::Compact => ColumnKind::UInt16,
            },
            StartStationId | EndStationId | BikeId => match self {
                SchemaVariant::Signed => ColumnKind::Int32,
                SchemaVariant::Compact => ColumnKind::UInt32,
            },
        }
    }

    pub fn includes_distance(&self) -> bool {
        matches!(self, SchemaVariant::Signed)
    }

    /// Column names of the written file, in order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.output_schema().into_iter().map(|(name, _)| name).collect()
    }

    pub fn output_schema(&self) -> Vec<(&'static str, DataType)> {
        let mut columns: Vec<(&'static str, DataType)> = TripField::ALL
            .iter()
            .map(|field| (field.column_name(), self.kind_of(*field).dtype()))
            .collect();
        if self.includes_distance() {
            columns.push((DISTANCE_COLUMN, DataType::Float64));
        }
        columns
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
