use crate::config::SourceOptions;
use crate::error::{ProcessingError, Result};
use crate::models::Table;
use crate::readers::TableSource;
use csv::ReaderBuilder;
use encoding_rs::Encoding;
use std::path::Path;
use tracing::{debug, warn};

/// Reads a whole delimited text file into memory, decoding it first.
pub struct DelimitedReader {
    delimiter: u8,
    encoding: &'static Encoding,
}

impl DelimitedReader {
    pub fn new(options: &SourceOptions) -> Result<Self> {
        let delimiter = options.delimiter_byte()?;
        let encoding = Encoding::for_label(options.encoding.trim().as_bytes())
            .ok_or_else(|| ProcessingError::UnknownEncoding(options.encoding.clone()))?;

        Ok(Self {
            delimiter,
            encoding,
        })
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Parse already-decoded text
    pub fn read_str(&self, text: &str) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(normalize_header)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
        }

        Ok(Table::new(headers, rows))
    }

    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let (text, actual, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            warn!(
                "Input is not valid {}; undecodable bytes were replaced",
                actual.name()
            );
        }
        self.read_str(&text)
    }
}

impl TableSource for DelimitedReader {
    fn read_table(&self, path: &Path) -> Result<Table> {
        let delimiter = self.delimiter as char;
        debug!(
            path = %path.display(),
            encoding = self.encoding.name(),
            %delimiter,
            "Reading table"
        );
        let bytes = std::fs::read(path)?;
        self.read_bytes(&bytes)
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn options(delimiter: char, encoding: &str) -> SourceOptions {
        SourceOptions {
            delimiter,
            encoding: encoding.to_string(),
        }
    }

    #[test]
    fn test_read_comma_separated_utf8() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "\u{feff}Ride_Id,Rideable_Type")?;
        writeln!(file, "A1, classic_bike")?;
        writeln!(file, "A2")?;

        let reader = DelimitedReader::new(&options(',', "utf-8"))?;
        let table = reader.read_table(file.path())?;

        assert_eq!(table.headers, vec!["Ride_Id", "Rideable_Type"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 1), "classic_bike");
        assert_eq!(table.cell(1, 1), "");
        Ok(())
    }

    #[test]
    fn test_read_semicolon_windows_1250() -> Result<()> {
        // "temperature_2m (°C)" with the degree sign as byte 0xB0
        let mut bytes = b"time;temperature_2m (".to_vec();
        bytes.push(0xB0);
        bytes.extend_from_slice(b"C)\n2022-01-01 00:00:00;-1,5\n");

        let reader = DelimitedReader::new(&options(';', "Windows-1250"))?;
        assert_eq!(reader.encoding_name(), "windows-1250");

        let table = reader.read_bytes(&bytes)?;
        assert_eq!(table.headers[1], "temperature_2m (°C)");
        assert_eq!(table.cell(0, 1), "-1,5");
        Ok(())
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let err = DelimitedReader::new(&options(',', "klingon")).err().unwrap();
        assert!(matches!(err, ProcessingError::UnknownEncoding(_)));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(DelimitedReader::new(&options('§', "utf-8")).is_err());
    }
}
