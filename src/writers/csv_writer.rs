use crate::error::Result;
use crate::models::OutputTable;
use crate::writers::TableSink;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes each table as `<output_dir>/<name>.csv`, header first, no index column.
pub struct CsvTableWriter {
    output_dir: PathBuf,
}

impl CsvTableWriter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.csv", name))
    }

    /// Read a table previously written by this sink
    pub fn read_table<T: OutputTable>(&self, name: &str) -> Result<Vec<T>> {
        let mut reader = ReaderBuilder::new().from_path(self.table_path(name))?;

        let mut rows = Vec::new();
        for row in reader.deserialize::<T>() {
            rows.push(row?);
        }
        Ok(rows)
    }
}

impl TableSink for CsvTableWriter {
    fn write_table<T: OutputTable>(&mut self, name: &str, rows: &[T]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.table_path(name);

        let mut writer = WriterBuilder::new()
            .has_headers(!rows.is_empty())
            .from_path(&path)?;

        if rows.is_empty() {
            // serde only emits a header alongside the first record
            writer.write_record(T::COLUMNS)?;
        }
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }
}
