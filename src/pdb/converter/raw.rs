use std::io::{Read, Seek};

use super::{Converter, RecordContext};
use crate::pdb::reader::PdbFile;
use crate::pdb::types::error::{PdbError, Result};
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::{RawAppInfo, RawRecord};

/// Converter that accepts any database and keeps records undecoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawConverter;

fn span(size: u64) -> Result<usize> {
    usize::try_from(size).map_err(|_| PdbError::InvalidFormat(format!("block of {} bytes is too large", size)))
}

impl Converter for RawConverter {
    const DEBUG_NAME: &'static str = "Raw";
    type Record = RawRecord;
    type AppInfo = RawAppInfo;

    fn is_acceptable(&self, _header: &DatabaseHeader, _app_info: Option<&RawAppInfo>) -> bool {
        true
    }

    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        size: u64,
        _header: &DatabaseHeader,
    ) -> Result<RawAppInfo> {
        Ok(RawAppInfo {
            data: file.read_bytes(span(size)?)?,
        })
    }

    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, RawAppInfo>,
    ) -> Result<Option<RawRecord>> {
        Ok(Some(RawRecord {
            attributes: context.attributes,
            data: file.read_bytes(span(context.size)?)?,
        }))
    }
}
