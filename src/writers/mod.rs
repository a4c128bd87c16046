pub mod csv_writer;

pub use csv_writer::CsvTableWriter;

use crate::error::Result;
use crate::models::OutputTable;
use std::path::PathBuf;

/// Persists a named output table, returning where it went
pub trait TableSink {
    fn write_table<T: OutputTable>(&mut self, name: &str, rows: &[T]) -> Result<PathBuf>;
}
