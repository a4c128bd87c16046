use crate::config::{OutputLayout, PipelineConfig};
use crate::error::Result;
use crate::models::{
    check_input_columns, ColumnCheck, OutputTable, Table, RAW_TRIP_SCHEMA, RAW_WEATHER_SCHEMA,
};
use crate::processors::{DropReport, TableNormalizer};
use crate::readers::{DelimitedReader, TableSource};
use crate::utils::constants::*;
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvTableWriter, TableSink};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub columns: ColumnCheck,
    pub report: DropReport,
    pub written: Vec<PathBuf>,
}

/// One batch run: load both inputs, check columns, derive and write tables.
pub struct Pipeline {
    config: PipelineConfig,
    silent: bool,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    fn normalizer(&self) -> TableNormalizer {
        TableNormalizer::with_timestamp_formats(
            &self.config.trip_timestamp_format,
            &self.config.weather_timestamp_format,
        )
    }

    pub fn load_inputs(&self) -> Result<(Table, Table)> {
        let progress = ProgressReporter::new_spinner("Loading input tables...", self.silent);

        let trip_reader = DelimitedReader::new(&self.config.trip_source)?;
        let weather_reader = DelimitedReader::new(&self.config.weather_source)?;

        let rentals_path = self.config.rentals_path();
        progress.set_message(&format!("Reading {}", rentals_path.display()));
        let trips = trip_reader.read_table(&rentals_path)?;

        let weather_path = self.config.weather_path();
        progress.set_message(&format!("Reading {}", weather_path.display()));
        let weather = weather_reader.read_table(&weather_path)?;

        progress.finish_with_message(&format!(
            "Loaded {} trip rows and {} weather rows",
            trips.len(),
            weather.len()
        ));
        info!(
            trips = trips.len(),
            weather = weather.len(),
            "Data loaded successfully"
        );

        Ok((trips, weather))
    }

    /// Column-presence check only
    pub fn check(&self) -> Result<ColumnCheck> {
        let (trips, weather) = self.load_inputs()?;
        let columns = check_input_columns(&trips, &weather)?;
        log_column_check(&columns, &trips, &weather);
        Ok(columns)
    }

    /// Run against the configured files and output directory
    pub fn run(&self) -> Result<PipelineOutcome> {
        let (trips, weather) = self.load_inputs()?;
        let mut sink = CsvTableWriter::new(&self.config.output_dir);

        let progress = ProgressReporter::new_spinner("Writing tables...", self.silent);
        let mut outcome = self.run_with(&trips, &weather, &mut sink)?;
        progress.finish_with_message(&format!("Wrote {} tables", outcome.written.len()));

        std::fs::create_dir_all(&self.config.output_dir)?;
        let report_path = self.config.output_dir.join(REPORT_FILE);
        let writer = BufWriter::new(File::create(&report_path)?);
        serde_json::to_writer_pretty(writer, &outcome.report)?;
        info!("Wrote drop report to {}", report_path.display());
        outcome.written.push(report_path);

        Ok(outcome)
    }

    /// Derive every table from already-loaded inputs and hand each to `sink`.
    /// Nothing is written when neither input has its full column set.
    pub fn run_with<S: TableSink>(
        &self,
        trips: &Table,
        weather: &Table,
        sink: &mut S,
    ) -> Result<PipelineOutcome> {
        let columns = check_input_columns(trips, weather)?;
        log_column_check(&columns, trips, weather);

        let normalizer = self.normalizer();
        let mut report = DropReport::new();
        let mut written = Vec::new();

        if columns.trips {
            match self.config.layout {
                OutputLayout::Normalized => {
                    let tables = normalizer.normalize_trips(trips, &mut report)?;
                    info!("Trip tables created successfully");

                    written.push(write(sink, &mut report, TABLE_RENTALS, &tables.rentals)?);
                    written.push(write(sink, &mut report, TABLE_TIME, &tables.time_slots)?);
                    written.push(write(sink, &mut report, TABLE_STATIONS, &tables.stations)?);
                    written.push(write(sink, &mut report, TABLE_TYPES, &tables.types)?);
                }
                OutputLayout::Legacy => {
                    let tables = normalizer.legacy_trip_tables(trips, &mut report)?;
                    info!("Trip tables created successfully");

                    written.push(write(sink, &mut report, TABLE_TIME, &tables.timings)?);
                    written.push(write(sink, &mut report, TABLE_LOCATION, &tables.locations)?);
                    written.push(write(sink, &mut report, TABLE_STATIONS, &tables.stations)?);
                    written.push(write(sink, &mut report, TABLE_TYPES, &tables.ride_types)?);
                }
            }
        }

        if columns.weather {
            let observations = normalizer.normalize_weather(weather, &mut report)?;
            info!("Weather table created successfully");
            written.push(write(sink, &mut report, TABLE_WEATHER, &observations)?);
        }

        info!("Tables saved successfully");
        report.log();

        Ok(PipelineOutcome {
            columns,
            report,
            written,
        })
    }
}

fn write<S: TableSink, T: OutputTable>(
    sink: &mut S,
    report: &mut DropReport,
    name: &str,
    rows: &[T],
) -> Result<PathBuf> {
    let path = sink.write_table(name, rows)?;
    report.record_written(name, rows.len());
    Ok(path)
}

fn log_column_check(columns: &ColumnCheck, trips: &Table, weather: &Table) {
    if columns.trips {
        info!("Rental columns are present");
    } else {
        warn!(
            "Rental columns are missing [{}]; skipping trip tables",
            RAW_TRIP_SCHEMA.missing_columns(trips).join(", ")
        );
    }

    if columns.weather {
        info!("Weather columns are present");
    } else {
        warn!(
            "Weather columns are missing [{}]; skipping weather table",
            RAW_WEATHER_SCHEMA.missing_columns(weather).join(", ")
        );
    }
}
