//! Core data structures for PDB container components.
//!
//! This module defines the container-level types:
//! - The database header
//! - Record table entries and record attributes
//! - The decoded database aggregate

use chrono::NaiveDateTime;

use super::category::{AppInfo, Category, CategoryAppInfo};

/// Database attribute flags (or'ed into [`DatabaseHeader::attributes`]).
pub mod db_attr {
    pub const RESDB: u16 = 0x0001;
    pub const READONLY: u16 = 0x0002;
    pub const APPINFO_DIRTY: u16 = 0x0004;
    pub const BACKUP: u16 = 0x0008;
    pub const OK_INSTALL_NEWER: u16 = 0x0010;
    pub const RESET: u16 = 0x0020;
    pub const COPY_PREVENTION: u16 = 0x0040;
    pub const STREAM: u16 = 0x0080;
    pub const HIDDEN: u16 = 0x0100;
    pub const LAUNCHABLE_DATA: u16 = 0x0200;
    pub const RECYCLABLE: u16 = 0x0400;
    pub const BUNDLE: u16 = 0x0800;
    pub const OPEN: u16 = 0x8000;
}

/// Parsed PDB database header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseHeader {
    /// Database name, for example "MemoDB".
    pub name: String,
    pub attributes: u16,
    pub version: u16,
    pub created: NaiveDateTime,
    pub modified: NaiveDateTime,
    /// `None` if the database was never backed up.
    pub backed_up: Option<NaiveDateTime>,
    pub modification_number: u32,
    /// Offset of the application info block, 0 if there is none.
    pub app_info_offset: u32,
    /// Four-character database type, for example "DATA".
    pub db_type: String,
    /// Four-character creator code, for example "memo".
    pub creator: String,
}

impl DatabaseHeader {
    pub fn has_attribute(&self, flag: u16) -> bool {
        self.attributes & flag != 0
    }
}

/// Attribute byte of a record table entry.
///
/// - Bit 0x80: deleted
/// - Bit 0x40: dirty
/// - Bit 0x20: busy
/// - Bit 0x10: secret
/// - Bits 0x0F: category index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RecordAttributes(pub u8);

impl RecordAttributes {
    pub const DELETED: u8 = 0x80;
    pub const DIRTY: u8 = 0x40;
    pub const BUSY: u8 = 0x20;
    pub const SECRET: u8 = 0x10;
    pub const CATEGORY_MASK: u8 = 0x0F;

    pub fn is_deleted(&self) -> bool {
        self.0 & Self::DELETED != 0
    }

    pub fn is_dirty(&self) -> bool {
        self.0 & Self::DIRTY != 0
    }

    pub fn is_busy(&self) -> bool {
        self.0 & Self::BUSY != 0
    }

    pub fn is_secret(&self) -> bool {
        self.0 & Self::SECRET != 0
    }

    /// Category index, always in `0..=15`.
    pub fn category_index(&self) -> usize {
        usize::from(self.0 & Self::CATEGORY_MASK)
    }
}

impl From<u8> for RecordAttributes {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// One entry of the record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordEntry {
    /// Absolute byte offset of the record data.
    pub offset: u32,
    pub attributes: RecordAttributes,
}

/// Behaviour shared by every decoded record.
pub trait PdbRecord {
    fn attributes(&self) -> RecordAttributes;

    fn is_secret(&self) -> bool {
        self.attributes().is_secret()
    }

    fn is_deleted(&self) -> bool {
        self.attributes().is_deleted()
    }

    fn category_index(&self) -> usize {
        self.attributes().category_index()
    }
}

/// A fully decoded database.
///
/// `T` is the record type, `U` the application info type produced by the
/// converter that read the file.
#[derive(Debug, Clone)]
pub struct PdbDatabase<T, U> {
    pub header: DatabaseHeader,
    /// `None` if the file has no application info block.
    pub app_info: Option<U>,
    /// Records in record table order.
    pub records: Vec<T>,
}

impl<T, U> PdbDatabase<T, U> {
    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn creator(&self) -> &str {
        &self.header.creator
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: PdbRecord, U: AppInfo> PdbDatabase<T, U> {
    /// The category table, if the app info carries one.
    pub fn categories(&self) -> Option<&CategoryAppInfo> {
        self.app_info.as_ref().and_then(AppInfo::categories)
    }

    /// Resolves the category of a record to its definition.
    pub fn category_of(&self, record: &T) -> Option<&Category> {
        self.categories()?.get(record.category_index())
    }
}
