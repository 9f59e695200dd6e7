//! # pdb-reader
//!
//! A reader for Palm OS PDB databases (.pdb) and for the table exports of
//! the Palm Desktop calendar.
//!
//! Supported schemas: address book, memo pad, to-do list, notepad,
//! calendar, plus a raw fallback for anything else. Calendar recurrences
//! can be written in iCalendar rule syntax.
//!
//! ```no_run
//! use pdb_reader::pdb::converter::MemoConverter;
//! use pdb_reader::pdb::read_database;
//!
//! let db = read_database("MemoDB.pdb", &MemoConverter)?;
//! for memo in &db.records {
//!     println!("{}", memo.memo);
//! }
//! # Ok::<(), pdb_reader::PdbError>(())
//! ```
pub mod mdb;
pub mod pdb;

// Re-export the main types for convenience
pub use pdb::{
    AnyConverter, Converter, PdbDatabase, PdbError, PdbFile, Record, Result, Schema,
    read_database,
    types::models::DatabaseHeader,
};
