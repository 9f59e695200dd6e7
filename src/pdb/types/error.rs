//! Custom error types for the pdb-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum PdbError {
    /// An error originating from I/O operations (opening, seeking).
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The stream ended while a fixed-size field was still expected.
    #[error("Unexpected end of file while reading {context}")]
    Truncated { context: String },

    /// The file is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The converter does not accept this database (name/creator signature mismatch).
    #[error("Wrong database format for {converter} converter: name='{name}', creator='{creator}'")]
    WrongFormat {
        converter: &'static str,
        name: String,
        creator: String,
    },

    /// A tag byte inside a record has a value the layout does not define.
    #[error("Unknown {kind}: {value}")]
    UnknownEnumerant { kind: &'static str, value: u32 },

    /// Wraps a failure that happened while decoding a specific record.
    #[error("Record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: Box<PdbError>,
    },

    /// A table required by the table-based reader does not exist.
    #[error("Table '{0}' not found")]
    MissingTable(String),

    /// A row lacks a column the table reader needs.
    #[error("Table '{table}': column '{column}' is undefined")]
    MissingColumn { table: String, column: String },

    /// A column holds a value that cannot be read as the expected type.
    #[error("Column '{column}': expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// An error reported by the CSV table backend.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A category filter names a category that is not defined.
    #[error("Category '{0}' is not defined")]
    NoSuchCategory(String),

    /// A date range filter was given an unusable range.
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
}

impl PdbError {
    pub(crate) fn truncated(context: impl Into<String>) -> Self {
        PdbError::Truncated {
            context: context.into(),
        }
    }

    /// Attaches a record index to this error.
    pub(crate) fn in_record(self, index: usize) -> Self {
        match self {
            already @ PdbError::Record { .. } => already,
            other => PdbError::Record {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Returns the innermost error, looking through record context.
    pub fn root(&self) -> &PdbError {
        match self {
            PdbError::Record { source, .. } => source.root(),
            other => other,
        }
    }

    /// `true` if a converter rejected the database, i.e. "not this format".
    pub fn is_wrong_format(&self) -> bool {
        matches!(self.root(), PdbError::WrongFormat { .. })
    }

    /// `true` if the file could not be read because its structure is broken.
    pub fn is_structural(&self) -> bool {
        matches!(
            self.root(),
            PdbError::Truncated { .. } | PdbError::InvalidFormat(_) | PdbError::Io(_)
        )
    }
}

/// A convenience `Result` type alias using the crate's `PdbError` type.
pub type Result<T> = std::result::Result<T, PdbError>;
