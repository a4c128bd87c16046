pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::{OutputLayout, PipelineConfig};
pub use error::{ProcessingError, Result};
pub use pipeline::{Pipeline, PipelineOutcome};
