//! Table-based reader for desktop calendar databases.
//!
//! The desktop application keeps its data in tables ("Category", "Main")
//! instead of a PDB container. Tables are read through a [`TableSource`];
//! [`ScheduleTableReader`] turns them into the same
//! [`PdbDatabase`](crate::pdb::PdbDatabase) the PDB reader produces.
//!
//! # Sources
//!
//! - [`MemoryTables`]: rows built in memory
//! - [`CsvTables`]: a directory of `<Table>.csv` exports, one per table

pub mod export;
pub mod memory;
pub mod schedule;

use std::collections::HashMap;
use std::fmt;

pub use export::CsvTables;
pub use memory::MemoryTables;
pub use schedule::ScheduleTableReader;

use crate::pdb::types::error::{PdbError, Result};

/// A provider of named tables.
pub trait TableSource {
    /// Returns all rows of a table in stored order.
    ///
    /// # Errors
    /// [`PdbError::MissingTable`] if the table does not exist.
    fn rows(&self, table: &str) -> Result<Vec<Row>>;
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// One table row, mapping column names to values.
///
/// The typed accessors convert between representations where that is
/// unambiguous, so a text cell "42" reads as int 42 and "true" or "1" as
/// bool `true`. Exports do not carry column types, so this keeps the
/// reader independent of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    table: String,
    values: HashMap<String, Value>,
}

impl Row {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: HashMap::new(),
        }
    }

    /// Adds a column value, builder style.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(column.into(), value.into());
    }

    /// Name of the table the row belongs to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// # Errors
    /// [`PdbError::MissingColumn`] if the row has no such column.
    pub fn get(&self, column: &str) -> Result<&Value> {
        self.values.get(column).ok_or_else(|| PdbError::MissingColumn {
            table: self.table.clone(),
            column: column.to_owned(),
        })
    }

    fn type_error(&self, column: &str, expected: &'static str) -> PdbError {
        PdbError::ColumnType {
            column: format!("{}.{}", self.table, column),
            expected,
        }
    }

    /// Reads a text column. Null reads as an empty string.
    pub fn text(&self, column: &str) -> Result<&str> {
        match self.get(column)? {
            Value::Text(s) => Ok(s),
            Value::Null => Ok(""),
            _ => Err(self.type_error(column, "text")),
        }
    }

    /// Reads a boolean column. Null reads as `false`.
    pub fn bool(&self, column: &str) -> Result<bool> {
        match self.get(column)? {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::Null => Ok(false),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                _ => Err(self.type_error(column, "bool")),
            },
        }
    }

    /// Reads an integer column.
    pub fn int(&self, column: &str) -> Result<i64> {
        match self.get(column)? {
            Value::Int(i) => Ok(*i),
            Value::Text(s) => s.trim().parse().map_err(|_| self.type_error(column, "int")),
            _ => Err(self.type_error(column, "int")),
        }
    }

    /// Reads a timestamp column stored as seconds since 1970.
    pub fn seconds(&self, column: &str) -> Result<i64> {
        match self.get(column)? {
            Value::Int(i) => Ok(*i),
            Value::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| self.type_error(column, "seconds since 1970")),
            _ => Err(self.type_error(column, "seconds since 1970")),
        }
    }
}
