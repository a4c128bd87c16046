//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Pipeline stages log at `info`, dropped-row summaries at `warn` and
//! individual dropped rows at `debug`. `RUST_LOG` overrides the level chosen
//! on the command line.

use crate::error::{ProcessingError, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub with_ansi: bool,
    /// When set, log lines are appended to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_ansi: true,
            log_file: None,
        }
    }
}

impl LogConfig {
    pub fn new(verbose: bool, log_file: Option<PathBuf>) -> Self {
        Self {
            level: if verbose { Level::DEBUG } else { Level::INFO },
            with_ansi: log_file.is_none(),
            log_file,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber. Call once, before the pipeline starts.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false)
        .with_ansi(config.with_ansi);

    let installed = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_selects_debug() {
        assert_eq!(LogConfig::new(true, None).level, Level::DEBUG);
        assert_eq!(LogConfig::new(false, None).level, Level::INFO);
    }

    #[test]
    fn test_log_file_disables_ansi() {
        let config = LogConfig::new(false, Some(PathBuf::from("run.log")));
        assert!(!config.with_ansi);
        assert!(LogConfig::default().with_ansi);
    }
}
