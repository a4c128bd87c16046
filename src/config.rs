use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Which set of five tables a run produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// rentals, time, stations, types, weather
    #[default]
    Normalized,
    /// time, location, stations, types, weather
    Legacy,
}

/// How a delimited input file is encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SourceOptions {
    pub delimiter: char,

    #[validate(length(min = 1))]
    pub encoding: String,
}

impl SourceOptions {
    pub fn trips() -> Self {
        Self {
            delimiter: TRIP_DELIMITER,
            encoding: TRIP_ENCODING.to_string(),
        }
    }

    pub fn weather() -> Self {
        Self {
            delimiter: WEATHER_DELIMITER,
            encoding: WEATHER_ENCODING.to_string(),
        }
    }

    /// Delimiter as the single byte the csv crate expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            return Err(ProcessingError::Config(format!(
                "Delimiter must be an ASCII character, got '{}'",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    pub data_folder: PathBuf,

    #[validate(length(min = 1))]
    pub rentals_file: String,

    #[validate(length(min = 1))]
    pub weather_file: String,

    pub output_dir: PathBuf,

    pub layout: OutputLayout,

    #[validate(nested)]
    pub trip_source: SourceOptions,

    #[validate(nested)]
    pub weather_source: SourceOptions,

    #[validate(length(min = 1))]
    pub trip_timestamp_format: String,

    #[validate(length(min = 1))]
    pub weather_timestamp_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from(DEFAULT_DATA_FOLDER),
            rentals_file: DEFAULT_RENTALS_FILE.to_string(),
            weather_file: DEFAULT_WEATHER_FILE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            layout: OutputLayout::default(),
            trip_source: SourceOptions::trips(),
            weather_source: SourceOptions::weather(),
            trip_timestamp_format: TRIP_TIMESTAMP_FORMAT.to_string(),
            weather_timestamp_format: WEATHER_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Values given on the command line; each one applies on its own
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_folder: Option<PathBuf>,
    pub rentals_file: Option<String>,
    pub weather_file: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub layout: Option<OutputLayout>,
}

impl PipelineConfig {
    /// Layer built-in defaults, an optional config file and `BIKESHARE_*`
    /// environment variables, in that order.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        if let Some(data_folder) = overrides.data_folder {
            self.data_folder = data_folder;
        }
        if let Some(rentals_file) = overrides.rentals_file {
            self.rentals_file = rentals_file;
        }
        if let Some(weather_file) = overrides.weather_file {
            self.weather_file = weather_file;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(layout) = overrides.layout {
            self.layout = layout;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn rentals_path(&self) -> PathBuf {
        self.data_folder.join(&self.rentals_file)
    }

    pub fn weather_path(&self) -> PathBuf {
        self.data_folder.join(&self.weather_file)
    }
}
