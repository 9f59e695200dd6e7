use std::fmt;
use std::io::{Read, Seek};
use std::str::FromStr;

use log::debug;

use super::{
    AddressConverter, Converter, MemoConverter, NotepadConverter, RawConverter, RecordContext, ScheduleConverter,
    TodoConverter,
};
use crate::pdb::reader::PdbFile;
use crate::pdb::types::error::{PdbError, Result};
use crate::pdb::types::models::DatabaseHeader;
use crate::pdb::types::records::{AnyAppInfo, Record};

/// The schemas this crate can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    Address,
    Memo,
    Todo,
    Notepad,
    Schedule,
    Raw,
}

impl Schema {
    /// All schemas in detection order. `Raw` matches everything and comes last.
    pub const ALL: [Schema; 6] = [
        Schema::Address,
        Schema::Memo,
        Schema::Todo,
        Schema::Notepad,
        Schema::Schedule,
        Schema::Raw,
    ];

    /// Picks the schema whose signature matches the header.
    pub fn detect(header: &DatabaseHeader) -> Schema {
        Self::ALL
            .into_iter()
            .find(|schema| schema.accepts(header))
            .unwrap_or(Schema::Raw)
    }

    /// Checks the name/creator signature of this schema.
    pub fn accepts(self, header: &DatabaseHeader) -> bool {
        match self {
            Schema::Address => AddressConverter.is_acceptable(header, None),
            Schema::Memo => MemoConverter.is_acceptable(header, None),
            Schema::Todo => TodoConverter.is_acceptable(header, None),
            Schema::Notepad => NotepadConverter.is_acceptable(header, None),
            Schema::Schedule => ScheduleConverter.is_acceptable(header, None),
            Schema::Raw => RawConverter.is_acceptable(header, None),
        }
    }

    pub fn debug_name(self) -> &'static str {
        match self {
            Schema::Address => AddressConverter::DEBUG_NAME,
            Schema::Memo => MemoConverter::DEBUG_NAME,
            Schema::Todo => TodoConverter::DEBUG_NAME,
            Schema::Notepad => NotepadConverter::DEBUG_NAME,
            Schema::Schedule => ScheduleConverter::DEBUG_NAME,
            Schema::Raw => RawConverter::DEBUG_NAME,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.debug_name())
    }
}

impl FromStr for Schema {
    type Err = PdbError;

    /// Parses a schema name, ignoring case ("memo", "ToDo", "schedule", ...).
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|schema| schema.debug_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PdbError::InvalidFormat(format!("unknown schema '{}'", s)))
    }
}

/// Converter that dispatches to the schema matching the database header.
///
/// Produces [`Record`] and [`AnyAppInfo`]. Unknown databases are read
/// with [`RawConverter`]. With [`AnyConverter::with_schema`] the schema is
/// fixed instead, and databases that do not match it are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyConverter {
    schema: Option<Schema>,
}

impl AnyConverter {
    /// Detects the schema from each database header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always uses `schema`.
    pub fn with_schema(schema: Schema) -> Self {
        Self { schema: Some(schema) }
    }

    fn schema_for(&self, header: &DatabaseHeader) -> Schema {
        self.schema.unwrap_or_else(|| Schema::detect(header))
    }
}

impl Converter for AnyConverter {
    const DEBUG_NAME: &'static str = "Any";
    type Record = Record;
    type AppInfo = AnyAppInfo;

    fn is_acceptable(&self, header: &DatabaseHeader, _app_info: Option<&AnyAppInfo>) -> bool {
        match self.schema {
            Some(schema) => schema.accepts(header),
            None => true,
        }
    }

    fn convert_app_info<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        size: u64,
        header: &DatabaseHeader,
    ) -> Result<AnyAppInfo> {
        let schema = self.schema_for(header);
        debug!("Using {} schema for '{}'", schema, header.name);
        Ok(match schema {
            Schema::Address => AnyAppInfo::Address(AddressConverter.convert_app_info(file, size, header)?),
            Schema::Memo => AnyAppInfo::Categories(MemoConverter.convert_app_info(file, size, header)?),
            Schema::Todo => AnyAppInfo::Categories(TodoConverter.convert_app_info(file, size, header)?),
            Schema::Notepad => AnyAppInfo::Categories(NotepadConverter.convert_app_info(file, size, header)?),
            Schema::Schedule => AnyAppInfo::Categories(ScheduleConverter.convert_app_info(file, size, header)?),
            Schema::Raw => AnyAppInfo::Raw(RawConverter.convert_app_info(file, size, header)?),
        })
    }

    fn convert<R: Read + Seek>(
        &self,
        file: &mut PdbFile<R>,
        context: &RecordContext<'_, AnyAppInfo>,
    ) -> Result<Option<Record>> {
        let categories = context.map_app_info(|info| match info {
            AnyAppInfo::Categories(categories) => Some(categories),
            _ => None,
        });

        let record = match self.schema_for(context.header) {
            Schema::Address => {
                let address = context.map_app_info(|info| match info {
                    AnyAppInfo::Address(address) => Some(address),
                    _ => None,
                });
                AddressConverter.convert(file, &address)?.map(Record::from)
            }
            Schema::Memo => MemoConverter.convert(file, &categories)?.map(Record::from),
            Schema::Todo => TodoConverter.convert(file, &categories)?.map(Record::from),
            Schema::Notepad => NotepadConverter.convert(file, &categories)?.map(Record::from),
            Schema::Schedule => ScheduleConverter.convert(file, &categories)?.map(Record::from),
            Schema::Raw => {
                let raw = context.map_app_info(|info| match info {
                    AnyAppInfo::Raw(raw) => Some(raw),
                    _ => None,
                });
                RawConverter.convert(file, &raw)?.map(Record::from)
            }
        };
        Ok(record)
    }
}
