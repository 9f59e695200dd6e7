//! Schema converters.
//!
//! A [`Converter`] knows one database schema: which databases it accepts,
//! how its application info block is laid out, and how to decode one
//! record. [`PdbFile::read_database`](crate::pdb::reader::PdbFile::read_database)
//! drives any converter without knowing the schema.
//!
//! | Converter            | Database                 |
//! |----------------------|--------------------------|
//! | [`AddressConverter`] | `AddressDB` / `addr`     |
//! | [`MemoConverter`]    | `MemoDB` / `memo`        |
//! | [`TodoConverter`]    | `ToDoDB` / `todo`        |
//! | [`NotepadConverter`] | `npadDB` / `npad`        |
//! | [`ScheduleConverter`]| any name / `PDat`        |
//! | [`RawConverter`]     | anything                 |
//! | [`AnyConverter`]     | picks one of the above   |

pub mod address;
pub mod any;
pub mod memo;
pub mod notepad;
pub mod raw;
pub mod schedule;
pub mod todo;

use std::io::{Read, Seek};

pub use address::AddressConverter;
pub use any::{AnyConverter, Schema};
pub use memo::MemoConverter;
pub use notepad::NotepadConverter;
pub use raw::RawConverter;
pub use schedule::ScheduleConverter;
pub use todo::TodoConverter;

use super::reader::PdbFile;
use super::types::error::Result;
use super::types::models::{DatabaseHeader, RecordAttributes};

/// What a converter gets to know about the record it decodes.
#[derive(Debug)]
pub struct RecordContext<'a, A> {
    /// Position of the record in the record table.
    pub index: usize,
    /// Bytes between the record start and the next record (or end of file).
    pub size: u64,
    pub attributes: RecordAttributes,
    pub header: &'a DatabaseHeader,
    /// The decoded application info, if the database has one.
    pub app_info: Option<&'a A>,
}

impl<'a, A> RecordContext<'a, A> {
    /// The same context with a different view of the application info.
    pub fn map_app_info<B>(&self, f: impl FnOnce(&'a A) -> Option<&'a B>) -> RecordContext<'a, B> {
        RecordContext {
            index: self.index,
            size: self.size,
            attributes: self.attributes,
            header: self.header,
            app_info: self.app_info.and_then(f),
        }
    }

    /// `true` for a deleted entry with no bytes of its own. Decoding it
    /// would read the next record.
    pub fn is_vacant(&self) -> bool {
        self.attributes.is_deleted() && self.size == 0
    }
}

/// Decoding of one database schema.
pub trait Converter {
    /// A short name used in logs and errors.
    const DEBUG_NAME: &'static str;

    /// The record type this converter produces.
    type Record;

    /// The application info type this converter produces.
    type AppInfo;

    /// Checks whether the database belongs to this schema.
    ///
    /// Called after the header and application info are read, and before
    /// any record is decoded.
    fn is_acceptable(&self, header: &DatabaseHeader, app_info: Option<&Self::AppInfo>) -> bool;

    /// Decodes the application info block. The file is positioned at its
    /// start, `size` is the number of bytes up to the first record.
    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        size: u64,
        header: &DatabaseHeader,
    ) -> Result<Self::AppInfo>;

    /// Decodes one record. The file is positioned at the record start.
    ///
    /// Returns `Ok(None)` to leave the record out of the result.
    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, Self::AppInfo>,
    ) -> Result<Option<Self::Record>>;
}

/// `true` if the header carries the given name and creator.
pub(crate) fn has_signature(header: &DatabaseHeader, name: &str, creator: &str) -> bool {
    header.name == name && header.creator == creator
}
