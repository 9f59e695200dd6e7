use std::io::{Read, Seek};

use super::{Converter, RecordContext, has_signature};
use crate::pdb::format::appinfo;
use crate::pdb::reader::PdbFile;
use crate::pdb::types::category::CategoryAppInfo;
use crate::pdb::types::error::Result;
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::MemoRecord;

/// Converter for the memo pad (`MemoDB`).
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoConverter;

impl MemoConverter {
    pub const NAME: &'static str = "MemoDB";
    pub const CREATOR: &'static str = "memo";
}

impl Converter for MemoConverter {
    const DEBUG_NAME: &'static str = "Memo";
    type Record = MemoRecord;
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
    ) -> Result<Option<MemoRecord>> {
        if context.is_vacant() {
            return Ok(None);
        }
        let memo = file.read_terminated_string()?;
        Ok(Some(MemoRecord {
            attributes: context.attributes,
            memo,
        }))
    }
}
