//! Low-level helpers shared by the PDB parsers

use std::io::ErrorKind;

use super::types::error::{PdbError, Result};

/// Maps I/O results of fixed-size reads to the crate error.
///
/// Running out of bytes while a field is expected is a structural
/// failure, so `UnexpectedEof` becomes [`PdbError::Truncated`] with the
/// given context. Everything else stays an I/O error.
pub(crate) trait ReadContext<T> {
    fn or_truncated(self, context: impl FnOnce() -> String) -> Result<T>;
}

impl<T> ReadContext<T> for std::io::Result<T> {
    fn or_truncated(self, context: impl FnOnce() -> String) -> Result<T> {
        self.map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => PdbError::truncated(context()),
            _ => PdbError::Io(e),
        })
    }
}
