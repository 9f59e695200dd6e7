//! Tables exported as CSV files, as written by `mdb-export`.

use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{Row, TableSource, Value};
use crate::pdb::types::error::{PdbError, Result};

/// A directory with one `<Table>.csv` file per table.
///
/// The first line of each file names the columns. Empty cells read as
/// [`Value::Null`], every other cell as [`Value::Text`]; the typed
/// accessors of [`Row`] convert on access.
#[derive(Debug, Clone)]
pub struct CsvTables {
    dir: PathBuf,
}

impl CsvTables {
    /// # Errors
    /// [`PdbError::Io`] if `dir` is not a readable directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Opening table exports in {}", dir.display());
        let meta = std::fs::metadata(dir)?;
        if !meta.is_dir() {
            return Err(PdbError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a directory", dir.display()),
            )));
        }
        Ok(Self { dir: dir.to_path_buf() })
    }

    /// Path of the export file of a table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }
}

impl TableSource for CsvTables {
    fn rows(&self, table: &str) -> Result<Vec<Row>> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(PdbError::MissingTable(table.to_owned()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row = Row::new(table);
            for (column, cell) in headers.iter().zip(record.iter()) {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::Text(cell.to_owned())
                };
                row.insert(column, value);
            }
            rows.push(row);
        }

        debug!("Table '{}': {} rows from {}", table, rows.len(), path.display());
        Ok(rows)
    }
}
