//! Codec layer for PalmOS primitive encodings.
//!
//! # Submodules
//!
//! - [`text`][]: single-byte text decoding and special-character remapping
//! - [`date`][]: epoch timestamps, packed dates, times of day

pub mod date;
pub mod text;
