pub mod delimited_reader;

pub use delimited_reader::DelimitedReader;

use crate::error::Result;
use crate::models::Table;
use std::path::Path;

/// Supplies untyped rows from a file
pub trait TableSource {
    fn read_table(&self, path: &Path) -> Result<Table>;
}
