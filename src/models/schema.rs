use crate::error::{ProcessingError, Result};
use crate::models::Table;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Expected column set of an input table
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSchema {
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().copied()
    }

    pub fn missing_columns(&self, table: &Table) -> Vec<&'static str> {
        self.column_names()
            .filter(|name| !table.has_column(name))
            .collect()
    }

    pub fn conforms(&self, table: &Table) -> bool {
        self.columns.iter().all(|name| table.has_column(name))
    }
}

pub mod trip_columns {
    pub const RIDE_ID: &str = "Ride_Id";
    pub const RIDEABLE_TYPE: &str = "Rideable_Type";
    pub const STARTED_AT: &str = "Started_At";
    pub const ENDED_AT: &str = "Ended_At";
    pub const START_STATION_NAME: &str = "Start_Station_Name";
    pub const START_STATION_ID: &str = "Start_Station_Id";
    pub const END_STATION_NAME: &str = "End_Station_Name";
    pub const END_STATION_ID: &str = "End_Station_Id";
    pub const START_LAT: &str = "Start_Lat";
    pub const START_LNG: &str = "Start_Lng";
    pub const END_LAT: &str = "End_Lat";
    pub const END_LNG: &str = "End_Lng";
    pub const MEMBER_CASUAL: &str = "Member_Casual";
    pub const RIDE_LENGTH: &str = "Ride_Length";
    pub const DAY_OF_THE_WEEK: &str = "Day_Of_The_Week";
    pub const DAY: &str = "Day";
}

pub mod weather_columns {
    pub const TIME: &str = "time";
    pub const TEMPERATURE: &str = "temperature_2m (°C)";
    pub const PRECIPITATION: &str = "precipitation (mm)";
    pub const CLOUDCOVER: &str = "cloudcover (%)";
    pub const WINDSPEED: &str = "windspeed_10m (km/h)";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ELEVATION: &str = "elevation";
    pub const UTC_OFFSET_SECONDS: &str = "utc_offset_seconds";
    pub const TIMEZONE: &str = "timezone";
    pub const TIMEZONE_ABBREVIATION: &str = "timezone_abbreviation";
}

pub const RAW_TRIP_SCHEMA: TableSchema = {
    use trip_columns::*;
    TableSchema {
        name: "trips",
        columns: &[
            RIDE_ID,
            RIDEABLE_TYPE,
            STARTED_AT,
            ENDED_AT,
            START_STATION_NAME,
            START_STATION_ID,
            END_STATION_NAME,
            END_STATION_ID,
            START_LAT,
            START_LNG,
            END_LAT,
            END_LNG,
            MEMBER_CASUAL,
            RIDE_LENGTH,
            DAY_OF_THE_WEEK,
            DAY,
        ],
    }
};

pub const RAW_WEATHER_SCHEMA: TableSchema = {
    use weather_columns::*;
    TableSchema {
        name: "weather",
        columns: &[
            TIME,
            TEMPERATURE,
            PRECIPITATION,
            CLOUDCOVER,
            WINDSPEED,
            LATITUDE,
            LONGITUDE,
            ELEVATION,
            UTC_OFFSET_SECONDS,
            TIMEZONE,
            TIMEZONE_ABBREVIATION,
        ],
    }
};

/// Column positions of a trip table that conforms to [`RAW_TRIP_SCHEMA`]
#[derive(Debug, Clone, Copy)]
pub struct TripColumns {
    pub ride_id: usize,
    pub rideable_type: usize,
    pub started_at: usize,
    pub ended_at: usize,
    pub start_station_name: usize,
    pub start_station_id: usize,
    pub end_station_name: usize,
    pub end_station_id: usize,
    pub start_lat: usize,
    pub start_lng: usize,
    pub end_lat: usize,
    pub end_lng: usize,
    pub member_casual: usize,
    pub ride_length: usize,
    pub day_of_week: usize,
    pub day: usize,
}

impl TripColumns {
    pub fn resolve(table: &Table) -> Option<Self> {
        use trip_columns::*;
        Some(Self {
            ride_id: table.column_index(RIDE_ID)?,
            rideable_type: table.column_index(RIDEABLE_TYPE)?,
            started_at: table.column_index(STARTED_AT)?,
            ended_at: table.column_index(ENDED_AT)?,
            start_station_name: table.column_index(START_STATION_NAME)?,
            start_station_id: table.column_index(START_STATION_ID)?,
            end_station_name: table.column_index(END_STATION_NAME)?,
            end_station_id: table.column_index(END_STATION_ID)?,
            start_lat: table.column_index(START_LAT)?,
            start_lng: table.column_index(START_LNG)?,
            end_lat: table.column_index(END_LAT)?,
            end_lng: table.column_index(END_LNG)?,
            member_casual: table.column_index(MEMBER_CASUAL)?,
            ride_length: table.column_index(RIDE_LENGTH)?,
            day_of_week: table.column_index(DAY_OF_THE_WEEK)?,
            day: table.column_index(DAY)?,
        })
    }
}

/// Column positions of a weather table that conforms to [`RAW_WEATHER_SCHEMA`]
#[derive(Debug, Clone, Copy)]
pub struct WeatherColumns {
    pub time: usize,
    pub temperature: usize,
    pub precipitation: usize,
    pub cloudcover: usize,
    pub windspeed: usize,
    pub latitude: usize,
    pub longitude: usize,
}

impl WeatherColumns {
    pub fn resolve(table: &Table) -> Option<Self> {
        use weather_columns::*;
        if !RAW_WEATHER_SCHEMA.conforms(table) {
            return None;
        }
        Some(Self {
            time: table.column_index(TIME)?,
            temperature: table.column_index(TEMPERATURE)?,
            precipitation: table.column_index(PRECIPITATION)?,
            cloudcover: table.column_index(CLOUDCOVER)?,
            windspeed: table.column_index(WINDSPEED)?,
            latitude: table.column_index(LATITUDE)?,
            longitude: table.column_index(LONGITUDE)?,
        })
    }
}

/// Which input tables carry their full column set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCheck {
    pub trips: bool,
    pub weather: bool,
}

/// Fail unless at least one of the two inputs has its complete column set.
pub fn check_input_columns(trips: &Table, weather: &Table) -> Result<ColumnCheck> {
    let check = ColumnCheck {
        trips: RAW_TRIP_SCHEMA.conforms(trips),
        weather: RAW_WEATHER_SCHEMA.conforms(weather),
    };

    if check.trips || check.weather {
        return Ok(check);
    }

    Err(ProcessingError::ColumnMismatch(format!(
        "{} is missing [{}]; {} is missing [{}]",
        RAW_TRIP_SCHEMA.name,
        RAW_TRIP_SCHEMA.missing_columns(trips).join(", "),
        RAW_WEATHER_SCHEMA.name,
        RAW_WEATHER_SCHEMA.missing_columns(weather).join(", "),
    )))
}

/// A row type persisted as one output table; `COLUMNS` matches field order.
pub trait OutputTable: Serialize + DeserializeOwned {
    const COLUMNS: &'static [&'static str];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(columns: &[&str]) -> Table {
        Table::new(columns.iter().map(|c| c.to_string()).collect(), Vec::new())
    }

    fn trip_table() -> Table {
        table_with(&RAW_TRIP_SCHEMA.column_names().collect::<Vec<_>>())
    }

    fn weather_table() -> Table {
        table_with(&RAW_WEATHER_SCHEMA.column_names().collect::<Vec<_>>())
    }

    #[test]
    fn test_missing_columns_reported_in_schema_order() {
        let table = table_with(&["Ride_Id", "Started_At", "Day"]);
        let missing = RAW_TRIP_SCHEMA.missing_columns(&table);
        assert_eq!(missing.len(), 13);
        assert_eq!(missing[0], "Rideable_Type");
        assert!(!missing.contains(&"Day"));
    }

    #[test]
    fn test_resolve_requires_every_column() {
        assert!(TripColumns::resolve(&trip_table()).is_some());
        assert!(TripColumns::resolve(&table_with(&["Ride_Id"])).is_none());
        assert!(WeatherColumns::resolve(&weather_table()).is_some());
        assert!(WeatherColumns::resolve(&table_with(&["time"])).is_none());
    }

    #[test]
    fn test_check_passes_when_either_table_conforms() {
        let empty = table_with(&["unrelated"]);

        let check = check_input_columns(&trip_table(), &empty).unwrap();
        assert!(check.trips && !check.weather);

        let check = check_input_columns(&empty, &weather_table()).unwrap();
        assert!(!check.trips && check.weather);
    }

    #[test]
    fn test_check_fails_when_neither_conforms() {
        let empty = table_with(&["unrelated"]);
        let err = check_input_columns(&empty, &empty).unwrap_err();
        assert!(matches!(err, ProcessingError::ColumnMismatch(_)));
        assert!(err.to_string().contains("Ride_Id"));
        assert!(err.to_string().contains("windspeed_10m (km/h)"));
    }
}
