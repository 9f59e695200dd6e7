//! Database header and record table parsing.

use std::io::{Read, Seek};

use log::{debug, info, trace};

use crate::pdb::reader::PdbFile;
use crate::pdb::types::error::Result;
use crate::pdb::types::models::{DatabaseHeader, RecordAttributes, RecordEntry};

/// Length of the database name field.
pub const NAME_LENGTH: usize = 32;

/// Size of the fixed header in bytes, up to and including the record count.
pub const HEADER_SIZE: u64 = 78;

/// Size of one record table entry in bytes.
pub const RECORD_ENTRY_SIZE: u64 = 8;

/// Parses the database header and the record table that follows it.
///
/// # Header Structure
/// ```text
/// [32 bytes] Name, zero-terminated
/// [2 bytes ] Attributes
/// [2 bytes ] Version
/// [4 bytes ] Creation time
/// [4 bytes ] Modification time
/// [4 bytes ] Backup time (0 = never)
/// [4 bytes ] Modification number
/// [4 bytes ] Application info offset (0 = none)
/// [4 bytes ] Sort info offset (ignored)
/// [4 bytes ] Type
/// [4 bytes ] Creator
/// [4 bytes ] Unique ID seed (ignored)
/// [4 bytes ] Next record list (ignored)
/// [2 bytes ] Record count
/// ```
///
/// Each record table entry is a u32 offset, a u8 attribute and a 3-byte
/// unique ID that is ignored.
pub fn parse<R: Read + Seek>(file: &mut PdbFile<R>) -> Result<(DatabaseHeader, Vec<RecordEntry>)> {
    file.seek(0)?;

    let name = file.read_terminated_fixed_string(NAME_LENGTH)?;
    let attributes = file.read_u16()?;
    let version = file.read_u16()?;
    let created = file.read_date()?;
    let modified = file.read_date()?;
    let backed_up = file.read_optional_date()?;
    let modification_number = file.read_u32()?;
    let app_info_offset = file.read_u32()?;
    let _sort_info_offset = file.read_u32()?;
    let db_type = file.read_fixed_string(4)?;
    let creator = file.read_fixed_string(4)?;
    let _unique_id_seed = file.read_u32()?;
    let _next_record_list = file.read_u32()?;
    let record_count = file.read_u16()?;

    debug!(
        "Header: name='{}', type={}, creator={}, attributes={:#06x}, version={}, records={}",
        name, db_type, creator, attributes, version, record_count
    );

    let mut entries = Vec::with_capacity(usize::from(record_count));
    for ix in 0..record_count {
        let offset = file.read_u32()?;
        let attributes = RecordAttributes(file.read_u8()?);
        file.skip(3)?;
        trace!("Record entry {}: offset={}, attributes={:#04x}", ix, offset, attributes.0);
        entries.push(RecordEntry { offset, attributes });
    }

    info!("Parsed header of '{}' ({} record entries)", name, entries.len());

    let header = DatabaseHeader {
        name,
        attributes,
        version,
        created,
        modified,
        backed_up,
        modification_number,
        app_info_offset,
        db_type,
        creator,
    };
    Ok((header, entries))
}
