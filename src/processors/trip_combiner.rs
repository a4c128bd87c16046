use crate::error::{ProcessingError, Result};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Concatenates monthly trip-history files into a single file with one header.
pub struct TripCombiner {
    delimiter: u8,
}

impl TripCombiner {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Combiner for files split on something other than a comma
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Append every input in order; returns the number of data rows written.
    pub fn combine(&self, inputs: &[PathBuf], output: &Path) -> Result<usize> {
        if inputs.is_empty() {
            return Err(ProcessingError::MissingData(
                "No input files to combine".to_string(),
            ));
        }

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_path(output)?;

        let mut header: Option<ByteRecord> = None;
        let mut total_rows = 0;
        let mut record = ByteRecord::new();

        for input in inputs {
            let mut reader = ReaderBuilder::new()
                .delimiter(self.delimiter)
                .flexible(true)
                .from_path(input)?;

            let file_header = reader.byte_headers()?.clone();
            match &header {
                None => {
                    writer.write_byte_record(&file_header)?;
                    header = Some(file_header);
                }
                Some(first) if *first != file_header => {
                    warn!("Header of {} differs from the first file", input.display());
                }
                Some(_) => {}
            }

            let mut file_rows = 0;
            while reader.read_byte_record(&mut record)? {
                writer.write_byte_record(&record)?;
                file_rows += 1;
            }

            info!("Appended {} rows from {}", file_rows, input.display());
            total_rows += file_rows;
        }

        writer.flush()?;
        info!(
            "Combined {} files into {} ({} rows)",
            inputs.len(),
            output.display(),
            total_rows
        );

        Ok(total_rows)
    }
}

impl Default for TripCombiner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_combine_keeps_single_header() -> Result<()> {
        let dir = TempDir::new()?;
        let oct = write_file(dir.path(), "oct2021_tripdata.csv", "Ride_Id,Day\nA,1\nB,2\n");
        let nov = write_file(dir.path(), "nov2021_tripdata.csv", "Ride_Id,Day\nC,3\n");
        let output = dir.path().join("out").join("tripdata_connected.csv");

        let rows = TripCombiner::new().combine(&[oct, nov], &output)?;

        assert_eq!(rows, 3);
        assert_eq!(fs::read_to_string(&output)?, "Ride_Id,Day\nA,1\nB,2\nC,3\n");
        Ok(())
    }

    #[test]
    fn test_header_mismatch_still_appends() -> Result<()> {
        let dir = TempDir::new()?;
        let first = write_file(dir.path(), "a.csv", "Ride_Id,Day\nA,1\n");
        let second = write_file(dir.path(), "b.csv", "ride_id,day\nB,2\n");
        let output = dir.path().join("combined.csv");

        let rows = TripCombiner::new().combine(&[first, second], &output)?;

        assert_eq!(rows, 2);
        assert_eq!(fs::read_to_string(&output)?, "Ride_Id,Day\nA,1\nB,2\n");
        Ok(())
    }

    #[test]
    fn test_semicolon_files_keep_their_delimiter() -> Result<()> {
        let dir = TempDir::new()?;
        let first = write_file(dir.path(), "a.csv", "Ride_Id;Station_Name\nA;Clark St, Elm St\n");
        let second = write_file(dir.path(), "b.csv", "Ride_Id;Station_Name\nB;Wells St\n");
        let output = dir.path().join("combined.csv");

        let rows = TripCombiner::with_delimiter(b';').combine(&[first, second], &output)?;

        assert_eq!(rows, 2);
        assert_eq!(
            fs::read_to_string(&output)?,
            "Ride_Id;Station_Name\nA;Clark St, Elm St\nB;Wells St\n"
        );
        Ok(())
    }

    #[test]
    fn test_no_inputs_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = TripCombiner::new().combine(&[], &dir.path().join("out.csv"));
        assert!(matches!(result, Err(ProcessingError::MissingData(_))));
    }

    #[test]
    fn test_missing_input_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = TripCombiner::new().combine(
            &[dir.path().join("missing.csv")],
            &dir.path().join("out.csv"),
        );
        assert!(result.is_err());
    }
}
