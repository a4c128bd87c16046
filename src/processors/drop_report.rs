use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Row counts for one batch run, including every row dropped along the way
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropReport {
    pub trips_read: usize,
    pub weather_read: usize,
    pub unparseable_start: usize,
    pub unparseable_end: usize,
    pub incomplete_rentals: usize,
    pub duplicate_rides: usize,
    pub incomplete_time_rows: usize,
    /// Legacy layout only
    pub incomplete_locations: usize,
    /// Legacy layout only
    pub incomplete_ride_types: usize,
    pub incomplete_stations: usize,
    pub incomplete_weather: usize,
    /// Kept in the output, reported for inspection
    pub negative_durations: usize,
    /// Later occurrences removed by station de-duplication
    pub duplicate_stations: usize,
    pub rows_written: BTreeMap<String, usize>,
}

impl DropReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_written(&mut self, table: &str, rows: usize) {
        self.rows_written.insert(table.to_string(), rows);
    }

    pub fn total_dropped(&self) -> usize {
        self.unparseable_start
            + self.unparseable_end
            + self.incomplete_rentals
            + self.duplicate_rides
            + self.incomplete_time_rows
            + self.incomplete_locations
            + self.incomplete_ride_types
            + self.incomplete_stations
            + self.incomplete_weather
    }

    pub fn has_drops(&self) -> bool {
        self.total_dropped() > 0
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Batch Summary:\n");
        summary.push_str(&format!("  Trip rows read: {}\n", self.trips_read));
        summary.push_str(&format!("  Weather rows read: {}\n", self.weather_read));

        summary.push_str("\nDropped Rows:\n");
        let reasons = [
            ("Unparseable start timestamp", self.unparseable_start),
            ("Unparseable end timestamp", self.unparseable_end),
            ("Incomplete rental", self.incomplete_rentals),
            ("Duplicate ride id", self.duplicate_rides),
            ("Incomplete time row", self.incomplete_time_rows),
            ("Incomplete location row", self.incomplete_locations),
            ("Incomplete ride type row", self.incomplete_ride_types),
            ("Incomplete station reference", self.incomplete_stations),
            ("Unparseable weather row", self.incomplete_weather),
        ];
        for (reason, count) in reasons {
            summary.push_str(&format!("  {}: {}\n", reason, count));
        }
        summary.push_str(&format!("  Total: {}\n", self.total_dropped()));

        if self.negative_durations > 0 {
            summary.push_str(&format!(
                "\nRides ending before they start (kept): {}\n",
                self.negative_durations
            ));
        }

        if !self.rows_written.is_empty() {
            summary.push_str("\nTables Written:\n");
            for (table, rows) in &self.rows_written {
                summary.push_str(&format!("  {}: {} rows\n", table, rows));
            }
        }

        summary
    }

    /// Emit the counters as log lines; warns when anything was dropped
    pub fn log(&self) {
        if self.has_drops() {
            warn!(
                unparseable_start = self.unparseable_start,
                unparseable_end = self.unparseable_end,
                incomplete_rentals = self.incomplete_rentals,
                duplicate_rides = self.duplicate_rides,
                incomplete_time_rows = self.incomplete_time_rows,
                incomplete_locations = self.incomplete_locations,
                incomplete_ride_types = self.incomplete_ride_types,
                incomplete_stations = self.incomplete_stations,
                incomplete_weather = self.incomplete_weather,
                "Dropped {} rows",
                self.total_dropped()
            );
        } else {
            info!("No rows dropped");
        }

        if self.negative_durations > 0 {
            warn!(
                "{} rides end before they start; durations kept as negative",
                self.negative_durations
            );
        }
    }
}
