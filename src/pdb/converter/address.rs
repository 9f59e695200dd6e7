use std::io::{Read, Seek};

use log::{debug, trace};

use super::{Converter, RecordContext, has_signature};
use crate::pdb::format::appinfo;
use crate::pdb::reader::PdbFile;
use crate::pdb::types::error::Result;
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::{AddressAppInfo, AddressField, AddressRecord, PhoneLabel};

/// Number of labels in the app info: one per field plus three phone labels.
pub const NUM_LABELS: usize = AddressField::COUNT + 3;

const LABEL_LENGTH: usize = 16;

/// Number of phone slots in a record.
const PHONE_SLOTS: usize = 5;

/// Converter for the address book (`AddressDB`).
///
/// # Record Structure
/// ```text
/// [4 bytes] Options: 4-bit phone label per slot (bits 0..20),
///           displayed phone slot (bits 20..24)
/// [4 bytes] Field mask, bit i set if field i is present
/// [1 byte ] Offset of the company field (ignored)
/// [n bytes] Present fields in storage order, zero-terminated
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressConverter;

impl AddressConverter {
    pub const NAME: &'static str = "AddressDB";
    pub const CREATOR: &'static str = "addr";
}

impl Converter for AddressConverter {
    const DEBUG_NAME: &'static str = "Address";
    type Record = AddressRecord;
    type AppInfo = AddressAppInfo;

    fn is_acceptable(&self, header: &DatabaseHeader, _app_info: Option<&AddressAppInfo>) -> bool {
        has_signature(header, Self::NAME, Self::CREATOR)
    }

    /// Reads categories, then as much of the label block as `size` allows.
    ///
    /// # Structure after the categories
    /// ```text
    /// [4 bytes ] Last unique ID and padding (ignored)
    /// [4 bytes ] Renamed labels bitmask
    /// [22 x 16 ] Labels, zero-terminated
    /// [2 bytes ] Country
    /// [1 byte  ] Sort by company
    /// ```
    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        size: u64,
        _header: &DatabaseHeader,
    ) -> Result<AddressAppInfo> {
        let (categories, consumed) = appinfo::read_categories(file)?;
        let mut info = AddressAppInfo {
            categories,
            ..AddressAppInfo::default()
        };

        let mut remaining = size.saturating_sub(consumed);
        if remaining < 8 {
            debug!("Address app info ends after categories");
            return Ok(info);
        }
        file.skip(4)?;
        info.dirty_labels = file.read_u32()?;
        remaining -= 8;

        while info.labels.len() < NUM_LABELS && remaining >= LABEL_LENGTH as u64 {
            info.labels.push(file.read_terminated_fixed_string(LABEL_LENGTH)?);
            remaining -= LABEL_LENGTH as u64;
        }

        if info.labels.len() == NUM_LABELS && remaining >= 3 {
            info.country = file.read_u16()?;
            info.sort_by_company = file.read_u8()? != 0;
        }

        debug!(
            "Address app info: {} labels, country={}, sort_by_company={}",
            info.labels.len(),
            info.country,
            info.sort_by_company
        );
        Ok(info)
    }

    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, AddressAppInfo>,
    ) -> Result<Option<AddressRecord>> {
        if context.is_vacant() {
            return Ok(None);
        }
        let options = file.read_u32()?;
        let field_mask = file.read_u32()?;
        let _company_offset = file.read_u8()?;

        let mut phone_labels = [PhoneLabel::Work; PHONE_SLOTS];
        for (slot, label) in phone_labels.iter_mut().enumerate() {
            *label = PhoneLabel::try_from(((options >> (4 * slot)) & 0x0F) as u8)?;
        }
        let display_phone = ((options >> 20) & 0x0F) as u8;

        let mut fields: [Option<String>; AddressField::COUNT] = Default::default();
        for (ix, field) in fields.iter_mut().enumerate() {
            if field_mask & (1 << ix) != 0 {
                *field = Some(file.read_terminated_string()?);
            }
        }

        trace!(
            "Address record {}: mask={:#010x}, display_phone={}",
            context.index, field_mask, display_phone
        );

        Ok(Some(AddressRecord {
            attributes: context.attributes,
            fields,
            phone_labels,
            display_phone,
        }))
    }
}
