//! Foundational data structures, error types, and record definitions.

pub mod category;
pub mod error;
pub mod models;
pub mod records;
