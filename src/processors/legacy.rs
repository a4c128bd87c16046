//! The older five-table layout: per-ride time, location and type rows plus
//! start stations, written next to the same weather table.

use crate::error::Result;
use crate::models::{RideLocation, RideTiming, RideType, StartStation, Table};
use crate::processors::bucketizer::time_of_day;
use crate::processors::drop_report::DropReport;
use crate::processors::normalizer::{StationSide, TableNormalizer, TripRow};
use chrono::Timelike;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct LegacyTripTables {
    pub timings: Vec<RideTiming>,
    pub locations: Vec<RideLocation>,
    pub stations: Vec<StartStation>,
    pub ride_types: Vec<RideType>,
}

impl TableNormalizer {
    pub fn legacy_trip_tables(&self, trips: &Table, report: &mut DropReport) -> Result<LegacyTripTables> {
        let columns = Self::resolve_trip_columns(trips)?;
        let rows = self.parse_trips(trips, &columns, report);

        Ok(LegacyTripTables {
            timings: timings(&rows, report),
            locations: locations(&rows, report),
            stations: Self::stations(&rows, &[StationSide::Start], report)
                .into_iter()
                .map(StartStation::from)
                .collect(),
            ride_types: ride_types(&rows, report),
        })
    }
}

fn timings(rows: &[TripRow<'_>], report: &mut DropReport) -> Vec<RideTiming> {
    rows.iter()
        .filter_map(|trip| {
            let (started_at, duration) = (trip.started_at?, trip.duration_minutes()?);

            let (Some(ride_id), Some(ride_length), Some(day)) = (
                trip.ride_id(),
                trip.get(|c| c.ride_length),
                trip.get(|c| c.day),
            ) else {
                report.incomplete_time_rows += 1;
                debug!(row = trip.index(), "Incomplete time row");
                return None;
            };

            if duration < 0 {
                report.negative_durations += 1;
            }

            Some(RideTiming {
                ride_id: ride_id.to_string(),
                ride_length: ride_length.to_string(),
                duration,
                time_of_day: time_of_day(started_at.hour()),
                day: day.to_string(),
                date: started_at.date(),
            })
        })
        .collect()
}

fn locations(rows: &[TripRow<'_>], report: &mut DropReport) -> Vec<RideLocation> {
    rows.iter()
        .filter_map(|trip| {
            let (Some(ride_id), Some(start), Some(end)) = (
                trip.ride_id(),
                trip.get(|c| c.start_station_id),
                trip.get(|c| c.end_station_id),
            ) else {
                report.incomplete_locations += 1;
                debug!(row = trip.index(), "Incomplete location row");
                return None;
            };

            Some(RideLocation {
                ride_id: ride_id.to_string(),
                start_station_id: start.to_string(),
                end_station_id: end.to_string(),
            })
        })
        .collect()
}

fn ride_types(rows: &[TripRow<'_>], report: &mut DropReport) -> Vec<RideType> {
    rows.iter()
        .filter_map(|trip| {
            let (Some(ride_id), Some(vehicle), Some(membership)) = (
                trip.ride_id(),
                trip.get(|c| c.rideable_type),
                trip.get(|c| c.member_casual),
            ) else {
                report.incomplete_ride_types += 1;
                debug!(row = trip.index(), "Incomplete ride type row");
                return None;
            };

            Some(RideType {
                ride_id: ride_id.to_string(),
                rideable_type: vehicle.to_string(),
                member_casual: membership.to_string(),
            })
        })
        .collect()
}
