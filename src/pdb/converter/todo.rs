use std::io::{Read, Seek};

use super::{Converter, RecordContext, has_signature};
use crate::pdb::format::appinfo;
use crate::pdb::reader::PdbFile;
use crate::pdb::types::category::CategoryAppInfo;
use crate::pdb::types::error::Result;
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::TodoRecord;

const FLAG_COMPLETED: u8 = 0x80;
const PRIORITY_MASK: u8 = 0x7F;

/// Converter for the to-do list (`ToDoDB`).
///
/// # Record Structure
/// ```text
/// [2 bytes] Due date, packed (0xFFFF = none)
/// [1 byte ] Flags: 0x80 completed, 0x7F priority
/// [n bytes] Description, zero-terminated
/// [n bytes] Note, zero-terminated (may be empty)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TodoConverter;

impl TodoConverter {
    pub const NAME: &'static str = "ToDoDB";
    pub const CREATOR: &'static str = "todo";
}

impl Converter for TodoConverter {
    const DEBUG_NAME: &'static str = "ToDo";
    type Record = TodoRecord;
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
    ) -> Result<Option<TodoRecord>> {
        if context.is_vacant() {
            return Ok(None);
        }
        let due = file.read_packed_date()?;
        let flags = file.read_u8()?;
        let description = file.read_terminated_string()?;
        let note = file.read_terminated_string()?;

        Ok(Some(TodoRecord {
            attributes: context.attributes,
            due,
            priority: flags & PRIORITY_MASK,
            completed: flags & FLAG_COMPLETED != 0,
            description,
            note: (!note.is_empty()).then_some(note),
        }))
    }
}
