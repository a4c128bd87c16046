pub mod bucketizer;
pub mod drop_report;
pub mod legacy;
pub mod normalizer;
pub mod trip_combiner;
pub mod type_keys;

pub use bucketizer::{
    cloud_cover_level, precipitation_level, temperature_level, time_of_day, wind_level,
};
pub use drop_report::DropReport;
pub use legacy::LegacyTripTables;
pub use normalizer::{TableNormalizer, TripTables};
pub use trip_combiner::TripCombiner;
pub use type_keys::{composite_key, TypeLookup};
