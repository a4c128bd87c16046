pub mod category;
pub mod schema;
pub mod table;
pub mod tables;

pub use category::{CloudCoverLevel, PrecipitationLevel, TemperatureLevel, TimeOfDay, WindLevel};
pub use schema::{
    check_input_columns, ColumnCheck, OutputTable, TableSchema, TripColumns, WeatherColumns,
    RAW_TRIP_SCHEMA, RAW_WEATHER_SCHEMA,
};
pub use table::Table;
pub use tables::{
    Rental, RideLocation, RideTiming, RideType, StartStation, Station, TimeSlot, TripType,
    TypeId, WeatherObservation,
};
