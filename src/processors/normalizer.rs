use crate::error::{ProcessingError, Result};
use crate::models::{
    Rental, Station, Table, TimeSlot, TripColumns, TripType, WeatherColumns, WeatherObservation,
    RAW_TRIP_SCHEMA, RAW_WEATHER_SCHEMA,
};
use crate::processors::bucketizer::{
    cloud_cover_level, precipitation_level, temperature_level, time_of_day, wind_level,
};
use crate::processors::drop_report::DropReport;
use crate::processors::type_keys::TypeLookup;
use crate::utils::constants::{SECONDS_PER_MINUTE, TRIP_TIMESTAMP_FORMAT, WEATHER_TIMESTAMP_FORMAT};
use crate::utils::numbers::{non_empty, parse_decimal};
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashSet;
use tracing::debug;

/// Trip-derived tables of the normalized layout
#[derive(Debug, Clone, Default)]
pub struct TripTables {
    pub rentals: Vec<Rental>,
    pub time_slots: Vec<TimeSlot>,
    pub stations: Vec<Station>,
    pub types: Vec<TripType>,
}

/// One raw trip row with its timestamps parsed
pub(crate) struct TripRow<'a> {
    table: &'a Table,
    columns: &'a TripColumns,
    row: usize,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
}

impl<'a> TripRow<'a> {
    pub fn get(&self, column: impl Fn(&TripColumns) -> usize) -> Option<&'a str> {
        non_empty(self.table.cell(self.row, column(self.columns)))
    }

    pub fn ride_id(&self) -> Option<&'a str> {
        self.get(|c| c.ride_id)
    }

    pub fn index(&self) -> usize {
        self.row
    }

    /// Whole minutes between start and end, floor-divided
    pub fn duration_minutes(&self) -> Option<i64> {
        let (start, end) = (self.started_at?, self.ended_at?);
        Some((end - start).num_seconds().div_euclid(SECONDS_PER_MINUTE))
    }
}

/// Station attributes from one side of a trip
pub(crate) enum StationSide {
    Start,
    End,
}

/// Turns the wide raw trip and weather tables into the narrow output tables.
pub struct TableNormalizer {
    trip_timestamp_format: String,
    weather_timestamp_format: String,
}

impl TableNormalizer {
    pub fn new() -> Self {
        Self {
            trip_timestamp_format: TRIP_TIMESTAMP_FORMAT.to_string(),
            weather_timestamp_format: WEATHER_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_timestamp_formats(trip_format: &str, weather_format: &str) -> Self {
        Self {
            trip_timestamp_format: trip_format.to_string(),
            weather_timestamp_format: weather_format.to_string(),
        }
    }

    fn parse_timestamp(raw: Option<&str>, format: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw?, format).ok()
    }

    pub(crate) fn resolve_trip_columns(trips: &Table) -> Result<TripColumns> {
        TripColumns::resolve(trips).ok_or_else(|| {
            ProcessingError::ColumnMismatch(format!(
                "{} is missing [{}]",
                RAW_TRIP_SCHEMA.name,
                RAW_TRIP_SCHEMA.missing_columns(trips).join(", ")
            ))
        })
    }

    /// Parse the timestamps of every trip row, counting failures
    pub(crate) fn parse_trips<'a>(
        &self,
        trips: &'a Table,
        columns: &'a TripColumns,
        report: &mut DropReport,
    ) -> Vec<TripRow<'a>> {
        report.trips_read = trips.len();

        (0..trips.len())
            .map(|row| {
                let mut trip = TripRow {
                    table: trips,
                    columns,
                    row,
                    started_at: None,
                    ended_at: None,
                };
                trip.started_at =
                    Self::parse_timestamp(trip.get(|c| c.started_at), &self.trip_timestamp_format);
                trip.ended_at =
                    Self::parse_timestamp(trip.get(|c| c.ended_at), &self.trip_timestamp_format);

                if trip.started_at.is_none() {
                    report.unparseable_start += 1;
                    debug!(row, ride_id = trip.ride_id(), "Unparseable start timestamp");
                } else if trip.ended_at.is_none() {
                    report.unparseable_end += 1;
                    debug!(row, ride_id = trip.ride_id(), "Unparseable end timestamp");
                }
                trip
            })
            .collect()
    }

    /// Derive rentals, time slots, stations and the type dimension
    pub fn normalize_trips(&self, trips: &Table, report: &mut DropReport) -> Result<TripTables> {
        let columns = Self::resolve_trip_columns(trips)?;
        let rows = self.parse_trips(trips, &columns, report);

        let lookup = Self::type_lookup(&rows);
        let rentals = Self::rentals(&rows, &lookup, report);
        let time_slots = Self::time_slots(&rows, report);
        let stations = Self::stations(&rows, &[StationSide::Start, StationSide::End], report);

        Ok(TripTables {
            rentals,
            time_slots,
            stations,
            types: lookup.into_entries(),
        })
    }

    pub(crate) fn type_lookup(rows: &[TripRow<'_>]) -> TypeLookup {
        TypeLookup::from_pairs(rows.iter().map(|trip| {
            (
                trip.get(|c| c.rideable_type).unwrap_or_default(),
                trip.get(|c| c.member_casual).unwrap_or_default(),
            )
        }))
    }

    fn rentals(rows: &[TripRow<'_>], lookup: &TypeLookup, report: &mut DropReport) -> Vec<Rental> {
        let mut seen_rides: HashSet<&str> = HashSet::with_capacity(rows.len());
        let mut rentals = Vec::with_capacity(rows.len());

        for trip in rows {
            let (Some(started_at), Some(ride_length)) = (trip.started_at, trip.duration_minutes())
            else {
                // Already counted as an unparseable timestamp
                continue;
            };

            let type_id = match (trip.get(|c| c.rideable_type), trip.get(|c| c.member_casual)) {
                (Some(vehicle), Some(membership)) => lookup.type_id(vehicle, membership),
                _ => None,
            };

            let (Some(ride_id), Some(start_station_id), Some(end_station_id), Some(type_id)) = (
                trip.ride_id(),
                trip.get(|c| c.start_station_id),
                trip.get(|c| c.end_station_id),
                type_id,
            ) else {
                report.incomplete_rentals += 1;
                debug!(row = trip.index(), ride_id = trip.ride_id(), "Incomplete rental");
                continue;
            };

            if !seen_rides.insert(ride_id) {
                report.duplicate_rides += 1;
                debug!(row = trip.index(), ride_id, "Duplicate ride id");
                continue;
            }

            if ride_length < 0 {
                report.negative_durations += 1;
            }

            rentals.push(Rental {
                ride_id: ride_id.to_string(),
                date: started_at.date(),
                start_station_id: start_station_id.to_string(),
                end_station_id: end_station_id.to_string(),
                ride_length,
                started_at,
                type_id,
            });
        }

        rentals
    }

    fn time_slots(rows: &[TripRow<'_>], report: &mut DropReport) -> Vec<TimeSlot> {
        rows.iter()
            .filter_map(|trip| {
                let started_at = trip.started_at?;
                let Some(day_of_week) = trip.get(|c| c.day_of_week) else {
                    report.incomplete_time_rows += 1;
                    debug!(row = trip.index(), "Missing day of the week");
                    return None;
                };

                Some(TimeSlot {
                    started_at,
                    time_of_day: time_of_day(started_at.hour()),
                    day_of_week: day_of_week.to_string(),
                })
            })
            .collect()
    }

    /// Union the requested station sides, drop incomplete entries, then keep
    /// the first occurrence of every station id.
    pub(crate) fn stations(
        rows: &[TripRow<'_>],
        sides: &[StationSide],
        report: &mut DropReport,
    ) -> Vec<Station> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stations = Vec::new();

        for side in sides {
            for trip in rows {
                let attributes = match side {
                    StationSide::Start => (
                        trip.get(|c| c.start_station_id),
                        trip.get(|c| c.start_station_name),
                        trip.get(|c| c.start_lat).and_then(parse_decimal),
                        trip.get(|c| c.start_lng).and_then(parse_decimal),
                    ),
                    StationSide::End => (
                        trip.get(|c| c.end_station_id),
                        trip.get(|c| c.end_station_name),
                        trip.get(|c| c.end_lat).and_then(parse_decimal),
                        trip.get(|c| c.end_lng).and_then(parse_decimal),
                    ),
                };

                let (Some(station_id), Some(name), Some(latitude), Some(longitude)) = attributes
                else {
                    report.incomplete_stations += 1;
                    continue;
                };

                if !seen.insert(station_id) {
                    report.duplicate_stations += 1;
                    continue;
                }

                stations.push(Station {
                    station_id: station_id.to_string(),
                    name: name.to_string(),
                    latitude,
                    longitude,
                });
            }
        }

        stations
    }

    /// Bucket hourly observations; rows with any unparseable field are dropped
    pub fn normalize_weather(
        &self,
        weather: &Table,
        report: &mut DropReport,
    ) -> Result<Vec<WeatherObservation>> {
        let columns = WeatherColumns::resolve(weather).ok_or_else(|| {
            ProcessingError::ColumnMismatch(format!(
                "{} is missing [{}]",
                RAW_WEATHER_SCHEMA.name,
                RAW_WEATHER_SCHEMA.missing_columns(weather).join(", ")
            ))
        })?;

        report.weather_read = weather.len();
        let mut observations = Vec::with_capacity(weather.len());

        for row in 0..weather.len() {
            match self.weather_row(weather, &columns, row) {
                Some(observation) => observations.push(observation),
                None => {
                    report.incomplete_weather += 1;
                    debug!(row, time = weather.cell(row, columns.time), "Unparseable weather row");
                }
            }
        }

        Ok(observations)
    }

    fn weather_row(
        &self,
        weather: &Table,
        columns: &WeatherColumns,
        row: usize,
    ) -> Option<WeatherObservation> {
        let measurement = |column: usize| parse_decimal(weather.cell(row, column));

        let time = Self::parse_timestamp(
            non_empty(weather.cell(row, columns.time)),
            &self.weather_timestamp_format,
        )?;

        Some(WeatherObservation {
            time,
            date: time.date(),
            temperature: temperature_level(measurement(columns.temperature)?),
            precipitation: precipitation_level(measurement(columns.precipitation)?),
            wind_speed: wind_level(measurement(columns.windspeed)?),
            cloud_cover: cloud_cover_level(measurement(columns.cloudcover)?),
            latitude: measurement(columns.latitude)?,
            longitude: measurement(columns.longitude)?,
        })
    }
}

impl Default for TableNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{CloudCoverLevel, PrecipitationLevel, TemperatureLevel, TimeOfDay, WindLevel};
    use pretty_assertions::assert_eq;

    /// Build a trip table from (ride, vehicle, start, end, start station, end station, member)
    pub(crate) fn trip_table(rows: &[[&str; 7]]) -> Table {
        let headers: Vec<String> = RAW_TRIP_SCHEMA.column_names().map(str::to_string).collect();
        let rows = rows
            .iter()
            .map(|[ride, vehicle, start, end, from, to, member]| {
                vec![
                    ride.to_string(),
                    vehicle.to_string(),
                    start.to_string(),
                    end.to_string(),
                    format!("Station {}", from),
                    from.to_string(),
                    format!("Station {}", to),
                    to.to_string(),
                    "41.88".to_string(),
                    "-87.63".to_string(),
                    "41,90".to_string(),
                    "-87.62".to_string(),
                    member.to_string(),
                    "0:15:00".to_string(),
                    "7".to_string(),
                    "1".to_string(),
                ]
            })
            .collect();
        Table::new(headers, rows)
    }

    fn weather_table(rows: &[[&str; 7]]) -> Table {
        let headers: Vec<String> = RAW_WEATHER_SCHEMA.column_names().map(str::to_string).collect();
        let rows = rows
            .iter()
            .map(|cells| {
                let mut row: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
                row.extend(
                    ["181", "-18000", "America/Chicago", "CDT"]
                        .iter()
                        .map(|c| c.to_string()),
                );
                row
            })
            .collect();
        Table::new(headers, rows)
    }

    #[test]
    fn test_two_trip_scenario() {
        let trips = trip_table(&[
            ["A", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S1", "S2", "casual"],
            ["B", "classic_bike", "01/01/2022 23:00", "01/02/2022 00:00", "S1", "S2", "casual"],
        ]);
        let mut report = DropReport::new();
        let tables = TableNormalizer::new()
            .normalize_trips(&trips, &mut report)
            .unwrap();

        let lengths: Vec<i64> = tables.rentals.iter().map(|r| r.ride_length).collect();
        assert_eq!(lengths, vec![15, 60]);

        let labels: Vec<TimeOfDay> = tables.time_slots.iter().map(|t| t.time_of_day).collect();
        assert_eq!(labels, vec![TimeOfDay::Morning, TimeOfDay::Night]);

        assert_eq!(tables.types.len(), 1);
        assert_eq!(tables.types[0].type_key, "classic_bike_casual");
        assert!(tables.rentals.iter().all(|r| r.type_id == 0));
        assert_eq!(report.total_dropped(), 0);
    }

    #[test]
    fn test_unparseable_timestamps_drop_rows() {
        let trips = trip_table(&[
            ["A", "classic_bike", "2022-01-01 08:00", "01/01/2022 08:15", "S1", "S2", "member"],
            ["B", "classic_bike", "01/01/2022 09:00", "garbage", "S1", "S2", "member"],
            ["C", "classic_bike", "01/01/2022 10:00", "01/01/2022 10:05", "S1", "S2", "member"],
        ]);
        let mut report = DropReport::new();
        let tables = TableNormalizer::new()
            .normalize_trips(&trips, &mut report)
            .unwrap();

        assert_eq!(tables.rentals.len(), 1);
        assert_eq!(tables.rentals[0].ride_id, "C");
        // Time rows need only a start timestamp
        assert_eq!(tables.time_slots.len(), 2);
        assert_eq!(report.unparseable_start, 1);
        assert_eq!(report.unparseable_end, 1);
    }

    #[test]
    fn test_duration_floors_and_keeps_negative() {
        let trips = trip_table(&[
            ["A", "electric_bike", "01/01/2022 08:00", "01/01/2022 08:00", "S1", "S2", "member"],
            ["B", "electric_bike", "01/01/2022 09:00", "01/01/2022 08:59", "S1", "S2", "member"],
            ["C", "electric_bike", "01/01/2022 09:00", "01/01/2022 11:29", "S1", "S2", "member"],
        ]);
        let mut report = DropReport::new();
        let tables = TableNormalizer::new()
            .normalize_trips(&trips, &mut report)
            .unwrap();

        let lengths: Vec<i64> = tables.rentals.iter().map(|r| r.ride_length).collect();
        assert_eq!(lengths, vec![0, -1, 149]);
        assert_eq!(report.negative_durations, 1);
    }

    #[test]
    fn test_missing_values_and_duplicate_rides_dropped() {
        let trips = trip_table(&[
            ["A", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "", "S2", "casual"],
            ["B", "", "01/01/2022 08:00", "01/01/2022 08:15", "S1", "S2", "casual"],
            ["C", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S1", "S2", "casual"],
            ["C", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S1", "S2", "casual"],
        ]);
        let mut report = DropReport::new();
        let tables = TableNormalizer::new()
            .normalize_trips(&trips, &mut report)
            .unwrap();

        assert_eq!(tables.rentals.len(), 1);
        assert_eq!(report.incomplete_rentals, 2);
        assert_eq!(report.duplicate_rides, 1);
    }

    #[test]
    fn test_stations_unique_first_occurrence_wins() {
        let mut trips = trip_table(&[
            ["A", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S1", "S2", "casual"],
            ["B", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S2", "S1", "casual"],
            ["C", "classic_bike", "01/01/2022 08:00", "01/01/2022 08:15", "S3", "S1", "casual"],
        ]);
        // Second trip's start side renames S2; the first occurrence of S2 is
        // still this start row because start sides come before end sides.
        trips.rows[1][4] = "Renamed".to_string();
        // Third trip starts at an incomplete station
        trips.rows[2][8] = String::new();

        let mut report = DropReport::new();
        let tables = TableNormalizer::new()
            .normalize_trips(&trips, &mut report)
            .unwrap();

        let ids: Vec<&str> = tables.stations.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["S1", "S2"]);
        assert_eq!(tables.stations[1].name, "Renamed");
        assert_eq!(tables.stations[0].latitude, 41.88);
        assert_eq!(report.incomplete_stations, 1);
        assert_eq!(report.duplicate_stations, 3);
    }

    #[test]
    fn test_type_order_counts_rows_missing_membership() {
        let trips = trip_table(&[
            ["A", "electric_bike", "01/01/2022 08:00", "01/01/2022 08:10", "S1", "S2", ""],
            ["B", "classic_bike", "01/01/2022 09:00", "01/01/2022 09:10", "S1", "S2", "member"],
            ["C", "electric_bike", "01/01/2022 10:00", "01/01/2022 10:10", "S1", "S2", "member"],
        ]);
        let mut report = DropReport::new();
        let tables = TableNormalizer::new().normalize_trips(&trips, &mut report).unwrap();

        let keys: Vec<&str> = tables.types.iter().map(|t| t.type_key.as_str()).collect();
        assert_eq!(keys, vec!["electric_bike_member", "classic_bike_member"]);

        let type_ids: Vec<(&str, u32)> = tables
            .rentals
            .iter()
            .map(|r| (r.ride_id.as_str(), r.type_id))
            .collect();
        assert_eq!(type_ids, vec![("B", 1), ("C", 0)]);
        assert_eq!(report.incomplete_rentals, 1);
    }

    #[test]
    fn test_weather_rows_bucketed() {
        let weather = weather_table(&[
            ["2022-01-01 08:00:00", "-3,4", "0,0", "0", "12,2", "41,88", "-87,63"],
            ["2022-07-01 14:00:00", "31.5", "2.5", "49.9", "1.6", "41.88", "-87.63"],
            ["2022-07-01 15:00:00", "", "0", "0", "0", "41.88", "-87.63"],
            ["01/07/2022 16:00", "20", "0", "0", "0", "41.88", "-87.63"],
        ]);
        let mut report = DropReport::new();
        let rows = TableNormalizer::new()
            .normalize_weather(&weather, &mut report)
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].temperature, TemperatureLevel::Cold);
        assert_eq!(rows[0].precipitation, PrecipitationLevel::No);
        assert_eq!(rows[0].cloud_cover, CloudCoverLevel::No);
        assert_eq!(rows[0].wind_speed, WindLevel::Fresh);
        assert_eq!(rows[0].latitude, 41.88);
        assert_eq!(rows[0].date.to_string(), "2022-01-01");

        assert_eq!(rows[1].temperature, TemperatureLevel::Hot);
        assert_eq!(rows[1].precipitation, PrecipitationLevel::Moderate);
        assert_eq!(rows[1].cloud_cover, CloudCoverLevel::Scattered);
        assert_eq!(rows[1].wind_speed, WindLevel::Light);

        assert_eq!(report.weather_read, 4);
        assert_eq!(report.incomplete_weather, 2);
    }

    #[test]
    fn test_missing_columns_rejected() {
        let table = Table::new(vec!["Ride_Id".to_string()], Vec::new());
        let mut report = DropReport::new();
        let normalizer = TableNormalizer::new();

        assert!(normalizer.normalize_trips(&table, &mut report).is_err());
        assert!(normalizer.normalize_weather(&table, &mut report).is_err());
    }
}
