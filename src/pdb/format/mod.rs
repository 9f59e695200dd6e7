//! Container layout parsing.
//!
//! Bridges raw reads of [`PdbFile`](crate::pdb::reader::PdbFile) and the
//! schema converters.
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! ├─────────────────┤
//! │  Record table   │ ← header::parse()
//! ├─────────────────┤
//! │  App info       │ ← appinfo::read_categories() + converter
//! ├─────────────────┤
//! │  Records        │ ← converter
//! └─────────────────┘
//! ```

pub mod appinfo;
pub mod header;
