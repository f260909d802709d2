pub mod clean;
pub mod distance;
pub mod errors;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod writer;

pub use clean::{clean_trips, CleanSummary};
pub use distance::{append_distance, haversine_km, EARTH_RADIUS_KM};
pub use errors::{Result, TripError};
pub use pipeline::{convert, ConversionSummary};
pub use reader::{parse_timestamp, read_trips, read_trips_from};
pub use schema::{ColumnKind, SchemaVariant, TripField, DISTANCE_COLUMN, TRIP_FIELD_COUNT};
pub use writer::write_parquet;
