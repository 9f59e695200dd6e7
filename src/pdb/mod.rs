//! Core PDB reader module

pub mod codec;
pub mod converter;
pub mod filter;
pub mod format;
pub mod reader;
pub mod repeat;
pub mod types;
mod utils;

pub use converter::{AnyConverter, Converter, Schema};
pub use reader::{PdbFile, read_database};
pub use types::category::{AppInfo, Category, CategoryAppInfo};
pub use types::error::{PdbError, Result};
pub use types::models::{DatabaseHeader, PdbDatabase, PdbRecord, RecordAttributes};
pub use types::records::{AnyAppInfo, DatedRecord, Record};
