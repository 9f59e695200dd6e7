use std::io::{Read, Seek};

use log::trace;

use super::{Converter, RecordContext};
use crate::pdb::codec::date::{ShortDate, ShortTime};
use crate::pdb::format::appinfo;
use crate::pdb::reader::PdbFile;
use crate::pdb::repeat::binary::{self, REPEAT_SIZE};
use crate::pdb::types::category::CategoryAppInfo;
use crate::pdb::types::error::Result;
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::{Alarm, AlarmUnit, ScheduleRecord};

pub const FLAG_ALARM: u16 = 0x4000;
pub const FLAG_REPEAT: u16 = 0x2000;
pub const FLAG_NOTE: u16 = 0x1000;
pub const FLAG_EXCEPTIONS: u16 = 0x0800;
pub const FLAG_DESCRIPTION: u16 = 0x0400;
pub const FLAG_LOCATION: u16 = 0x0200;

/// Converter for the calendar (creator `PDat`).
///
/// # Record Structure
/// ```text
/// [4 bytes] Start hour, start minute, end hour, end minute (negative = untimed)
/// [2 bytes] Date, packed
/// [2 bytes] Flags
/// [2 bytes] Alarm: advance (signed), unit          (if FLAG_ALARM)
/// [8 bytes] Repeat, see repeat::binary             (if FLAG_REPEAT)
/// [n bytes] Exception count, packed dates          (if FLAG_EXCEPTIONS)
/// [n bytes] Description, zero-terminated           (if FLAG_DESCRIPTION)
/// [n bytes] Note, zero-terminated                  (if FLAG_NOTE)
/// [n bytes] Location, zero-terminated              (if FLAG_LOCATION)
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleConverter;

impl ScheduleConverter {
    pub const CREATOR: &'static str = "PDat";
}

impl Converter for ScheduleConverter {
    const DEBUG_NAME: &'static str = "Schedule";
    type Record = ScheduleRecord;
    type AppInfo = CategoryAppInfo;

    fn is_acceptable(&self, header: &DatabaseHeader, _app_info: Option<&CategoryAppInfo>) -> bool {
        header.creator == Self::CREATOR
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
    ) -> Result<Option<ScheduleRecord>> {
        if context.is_vacant() {
            return Ok(None);
        }
        let start_hour = file.read_i8()?;
        let start_minute = file.read_i8()?;
        let end_hour = file.read_i8()?;
        let end_minute = file.read_i8()?;
        let date = ShortDate::from_packed(file.read_u16()?);
        let flags = file.read_u16()?;

        let mut record = ScheduleRecord::new(context.attributes, date);
        record.start_time = ShortTime::from_signed(start_hour, start_minute);
        record.end_time = ShortTime::from_signed(end_hour, end_minute);
        record.category = context
            .app_info
            .and_then(|info| info.name(context.attributes.category_index()))
            .map(str::to_owned);

        if flags & FLAG_ALARM != 0 {
            let value = i32::from(file.read_i8()?);
            let unit = AlarmUnit::try_from(file.read_u8()?)?;
            record.alarm = Some(Alarm { value, unit });
        }

        if flags & FLAG_REPEAT != 0 {
            let mut block = [0u8; REPEAT_SIZE];
            block.copy_from_slice(&file.read_bytes(REPEAT_SIZE)?);
            record.repeat = Some(binary::decode(&block)?);
        }

        if flags & FLAG_EXCEPTIONS != 0 {
            let count = file.read_u16()?;
            for _ in 0..count {
                record.exceptions.push(ShortDate::from_packed(file.read_u16()?));
            }
        }

        if flags & FLAG_DESCRIPTION != 0 {
            record.description = Some(file.read_terminated_string()?);
        }
        if flags & FLAG_NOTE != 0 {
            record.note = Some(file.read_terminated_string()?);
        }
        if flags & FLAG_LOCATION != 0 {
            record.location = Some(file.read_terminated_string()?);
        }

        trace!(
            "Schedule record {}: date={}, flags={:#06x}, repeat={:?}",
            context.index, record.date, flags, record.repeat
        );

        Ok(Some(record))
    }
}
