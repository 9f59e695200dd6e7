use std::io::{Read, Seek};

use log::trace;

use super::{Converter, RecordContext, has_signature};
use crate::pdb::format::appinfo;
use crate::pdb::reader::PdbFile;
use crate::pdb::types::category::CategoryAppInfo;
use crate::pdb::types::error::{PdbError, Result};
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::NotepadRecord;

const FLAG_TITLE: u16 = 0x0002;
const FLAG_ALARM: u16 = 0x0004;

/// Number of u32 words between the title and the image data.
const IMAGE_HEADER_WORDS: u64 = 6;

/// Converter for handwritten notes (`npadDB`).
///
/// # Record Structure
/// ```text
/// [14 bytes] Created, date-time words
/// [14 bytes] Modified, date-time words
/// [2 bytes ] Flags
/// [14 bytes] Alarm, date-time words (if flag 0x0004)
/// [n bytes ] Title, zero-terminated, padded to even length (if flag 0x0002)
/// [24 bytes] Image header (ignored)
/// [n bytes ] Image data, up to the end of the record
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NotepadConverter;

impl NotepadConverter {
    pub const NAME: &'static str = "npadDB";
    pub const CREATOR: &'static str = "npad";
}

impl Converter for NotepadConverter {
    const DEBUG_NAME: &'static str = "Notepad";
    type Record = NotepadRecord;
    type AppInfo = CategoryAppInfo;

    fn is_acceptable(&self, header: &DatabaseHeader, _app_info: Option<&CategoryAppInfo>) -> bool {
        has_signature(header, Self::NAME, Self::CREATOR)
    }

    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        _size: u64,
        _header: &DatabaseHeader,
    ) -> Result<CategoryAppInfo> {
        Ok(appinfo::read_categories(file)?.0)
    }

    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, CategoryAppInfo>,
    ) -> Result<Option<NotepadRecord>> {
        if context.is_vacant() {
            return Ok(None);
        }
        let start = file.position();

        let created = file.read_date_time_words()?;
        let modified = file.read_date_time_words()?;
        let flags = file.read_u16()?;

        let alarm = if flags & FLAG_ALARM != 0 {
            file.read_date_time_words()?
        } else {
            None
        };

        let title = if flags & FLAG_TITLE != 0 {
            let title_start = file.position();
            let title = file.read_terminated_string()?;
            if (file.position() - title_start) % 2 == 1 {
                file.skip(1)?;
            }
            Some(title)
        } else {
            None
        };

        file.skip(IMAGE_HEADER_WORDS * 4)?;

        let consumed = file.position() - start;
        let image_size = context.size.checked_sub(consumed).ok_or_else(|| {
            PdbError::InvalidFormat(format!(
                "notepad header of {} bytes exceeds record size {}",
                consumed, context.size
            ))
        })?;
        let image_size = usize::try_from(image_size)
            .map_err(|_| PdbError::InvalidFormat(format!("image of {} bytes is too large", image_size)))?;
        trace!("Notepad record {}: title={:?}, image={} bytes", context.index, title, image_size);
        let image = file.read_bytes(image_size)?;

        Ok(Some(NotepadRecord {
            attributes: context.attributes,
            created,
            modified,
            alarm,
            title,
            image,
        }))
    }
}
