/// Default input locations
pub const DEFAULT_DATA_FOLDER: &str = "../data";
pub const DEFAULT_RENTALS_FILE: &str = "tripdata_connected.csv";
pub const DEFAULT_WEATHER_FILE: &str = "weather_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_COMBINED_FILE: &str = "tripdata_connected.csv";

/// Source formats
pub const TRIP_DELIMITER: char = ',';
pub const TRIP_ENCODING: &str = "utf-8";
pub const WEATHER_DELIMITER: char = ';';
pub const WEATHER_ENCODING: &str = "windows-1250";

/// Timestamp formats
pub const TRIP_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M";
pub const WEATHER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Output table names
pub const TABLE_RENTALS: &str = "rentals";
pub const TABLE_TIME: &str = "time";
pub const TABLE_LOCATION: &str = "location";
pub const TABLE_STATIONS: &str = "stations";
pub const TABLE_TYPES: &str = "types";
pub const TABLE_WEATHER: &str = "weather";
pub const REPORT_FILE: &str = "report.json";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "BIKESHARE";

pub const SECONDS_PER_MINUTE: i64 = 60;
