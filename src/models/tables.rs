use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::category::{
    CloudCoverLevel, PrecipitationLevel, TemperatureLevel, TimeOfDay, WindLevel,
};
use crate::models::schema::OutputTable;

/// Surrogate key of a (vehicle kind, membership kind) pair
pub type TypeId = u32;

/// Timestamps are written as `YYYY-MM-DD HH:MM:SS`
mod timestamp {
    use crate::utils::constants::OUTPUT_TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(OUTPUT_TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, OUTPUT_TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    #[serde(rename = "Ride_Id")]
    pub ride_id: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Start_Station_Id")]
    pub start_station_id: String,
    #[serde(rename = "End_Station_Id")]
    pub end_station_id: String,
    /// Whole minutes, floor-divided; negative when the ride ends before it starts
    #[serde(rename = "Ride_Length")]
    pub ride_length: i64,
    #[serde(rename = "Started_At", with = "timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(rename = "Type_Id")]
    pub type_id: TypeId,
}

impl OutputTable for Rental {
    const COLUMNS: &'static [&'static str] = &[
        "Ride_Id",
        "Date",
        "Start_Station_Id",
        "End_Station_Id",
        "Ride_Length",
        "Started_At",
        "Type_Id",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "Started_At", with = "timestamp")]
    pub started_at: NaiveDateTime,
    #[serde(rename = "Time_Of_The_Day")]
    pub time_of_day: TimeOfDay,
    #[serde(rename = "Day_Of_The_Week")]
    pub day_of_week: String,
}

impl OutputTable for TimeSlot {
    const COLUMNS: &'static [&'static str] = &["Started_At", "Time_Of_The_Day", "Day_Of_The_Week"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "Station_Id")]
    pub station_id: String,
    #[serde(rename = "Station_Name")]
    pub name: String,
    #[serde(rename = "Lat")]
    pub latitude: f64,
    #[serde(rename = "Lng")]
    pub longitude: f64,
}

impl OutputTable for Station {
    const COLUMNS: &'static [&'static str] = &["Station_Id", "Station_Name", "Lat", "Lng"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripType {
    #[serde(rename = "Type_Id")]
    pub type_id: TypeId,
    #[serde(rename = "Rideable_Type")]
    pub rideable_type: String,
    #[serde(rename = "Member_Casual")]
    pub member_casual: String,
    #[serde(rename = "Type_Key")]
    pub type_key: String,
}

impl OutputTable for TripType {
    const COLUMNS: &'static [&'static str] =
        &["Type_Id", "Rideable_Type", "Member_Casual", "Type_Key"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(rename = "Time", with = "timestamp")]
    pub time: NaiveDateTime,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Temperature")]
    pub temperature: TemperatureLevel,
    #[serde(rename = "Precipitation")]
    pub precipitation: PrecipitationLevel,
    #[serde(rename = "Wind_Speed")]
    pub wind_speed: WindLevel,
    #[serde(rename = "Cloudcover")]
    pub cloud_cover: CloudCoverLevel,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

impl OutputTable for WeatherObservation {
    const COLUMNS: &'static [&'static str] = &[
        "Time",
        "Date",
        "Temperature",
        "Precipitation",
        "Wind_Speed",
        "Cloudcover",
        "Latitude",
        "Longitude",
    ];
}

// Tables of the older five-file layout

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideTiming {
    #[serde(rename = "Ride_Id")]
    pub ride_id: String,
    /// Precomputed length as found in the trip file
    #[serde(rename = "Ride_Length")]
    pub ride_length: String,
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "Time_Of_The_Day")]
    pub time_of_day: TimeOfDay,
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
}

impl OutputTable for RideTiming {
    const COLUMNS: &'static [&'static str] = &[
        "Ride_Id",
        "Ride_Length",
        "Duration",
        "Time_Of_The_Day",
        "Day",
        "Date",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideLocation {
    #[serde(rename = "Ride_Id")]
    pub ride_id: String,
    #[serde(rename = "Start_Station_Id")]
    pub start_station_id: String,
    #[serde(rename = "End_Station_Id")]
    pub end_station_id: String,
}

impl OutputTable for RideLocation {
    const COLUMNS: &'static [&'static str] = &["Ride_Id", "Start_Station_Id", "End_Station_Id"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartStation {
    #[serde(rename = "Start_Station_Id")]
    pub station_id: String,
    #[serde(rename = "Start_Station_Name")]
    pub name: String,
    #[serde(rename = "Start_Lat")]
    pub latitude: f64,
    #[serde(rename = "Start_Lng")]
    pub longitude: f64,
}

impl OutputTable for StartStation {
    const COLUMNS: &'static [&'static str] = &[
        "Start_Station_Id",
        "Start_Station_Name",
        "Start_Lat",
        "Start_Lng",
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideType {
    #[serde(rename = "Ride_Id")]
    pub ride_id: String,
    #[serde(rename = "Rideable_Type")]
    pub rideable_type: String,
    #[serde(rename = "Member_Casual")]
    pub member_casual: String,
}

impl OutputTable for RideType {
    const COLUMNS: &'static [&'static str] = &["Ride_Id", "Rideable_Type", "Member_Casual"];
}

impl From<Station> for StartStation {
    fn from(station: Station) -> Self {
        Self {
            station_id: station.station_id,
            name: station.name,
            latitude: station.latitude,
            longitude: station.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_of<T: OutputTable>(row: &T) -> Vec<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(row).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        text.lines()
            .next()
            .unwrap()
            .split(',')
            .map(str::to_string)
            .collect()
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_declared_columns_match_serialized_header() {
        let rental = Rental {
            ride_id: "A1".to_string(),
            date: at(8).date(),
            start_station_id: "S1".to_string(),
            end_station_id: "S2".to_string(),
            ride_length: 15,
            started_at: at(8),
            type_id: 0,
        };
        assert_eq!(header_of(&rental), Rental::COLUMNS);

        let weather = WeatherObservation {
            time: at(8),
            date: at(8).date(),
            temperature: TemperatureLevel::Cool,
            precipitation: PrecipitationLevel::No,
            wind_speed: WindLevel::Calm,
            cloud_cover: CloudCoverLevel::Few,
            latitude: 41.9,
            longitude: -87.6,
        };
        assert_eq!(header_of(&weather), WeatherObservation::COLUMNS);

        let timing = RideTiming {
            ride_id: "A1".to_string(),
            ride_length: "0:15:00".to_string(),
            duration: 15,
            time_of_day: TimeOfDay::Morning,
            day: "1".to_string(),
            date: at(8).date(),
        };
        assert_eq!(header_of(&timing), RideTiming::COLUMNS);
    }

    #[test]
    fn test_timestamps_serialize_with_space_separator() {
        let slot = TimeSlot {
            started_at: at(23),
            time_of_day: TimeOfDay::Night,
            day_of_week: "7".to_string(),
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&slot).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert!(text.contains("2022-01-01 23:00:00,Night,7"));
    }
}
