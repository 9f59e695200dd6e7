use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use log::{debug, info, trace};

use super::{Row, TableSource};
use crate::pdb::codec::date::{self, ShortDate, ShortTime};
use crate::pdb::repeat::text;
use crate::pdb::types::category::{Category, CategoryAppInfo, NUM_CATEGORIES};
use crate::pdb::types::error::{PdbError, Result};
use crate::pdb::types::models::{DatabaseHeader, PdbDatabase, RecordAttributes};
use crate::pdb::types::records::{Alarm, AlarmUnit, ScheduleRecord};

pub const CATEGORY_TABLE: &str = "Category";
pub const MAIN_TABLE: &str = "Main";

/// Name given to databases read from tables.
pub const DATABASE_NAME: &str = "DatebookDB";
/// Creator given to databases read from tables.
pub const DATABASE_CREATOR: &str = "date";

/// Reads calendar events from the desktop database tables.
///
/// # Tables
/// - `Category`: `ID`, `Name`; one category per row, in slot order
/// - `Main`: one event per row, see [`ScheduleTableReader::read`]
#[derive(Debug)]
pub struct ScheduleTableReader<S> {
    source: S,
    default_offset: FixedOffset,
}

impl<S: TableSource> ScheduleTableReader<S> {
    /// Creates a reader that falls back to UTC for rows without a usable zone.
    pub fn new(source: S) -> Self {
        Self {
            source,
            default_offset: Utc.fix(),
        }
    }

    /// Sets the offset used when a row's `Time Zone` is not a UTC offset.
    pub fn with_default_offset(mut self, offset: FixedOffset) -> Self {
        self.default_offset = offset;
        self
    }

    /// Reads all events.
    ///
    /// `Main` columns: `Private`, `Category` (category key), `Note`,
    /// `Summary`, `Location`, `Start Time` and `End Time` (seconds since
    /// 1970), `Untimed`, `Time Zone`, `Alarm`, `Alarm Advance`,
    /// `Alarm Unit` and `Repeated Event` (recurrence line, see
    /// [`repeat::text`](crate::pdb::repeat::text)).
    ///
    /// # Errors
    /// - [`PdbError::MissingTable`], [`PdbError::MissingColumn`],
    ///   [`PdbError::ColumnType`] for unexpected table contents
    /// - [`PdbError::InvalidFormat`] for more than 16 categories
    /// - [`PdbError::Record`] wrapping any failure in a `Main` row
    pub fn read(&self) -> Result<PdbDatabase<ScheduleRecord, CategoryAppInfo>> {
        let categories = self.read_categories()?;

        let rows = self.source.rows(MAIN_TABLE)?;
        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let record = self.read_event(row, &categories).map_err(|e| e.in_record(index))?;
            records.push(record);
        }

        info!("Read {} events and {} categories from tables", records.len(), categories.len());

        Ok(PdbDatabase {
            header: table_header(),
            app_info: Some(categories),
            records,
        })
    }

    fn read_categories(&self) -> Result<CategoryAppInfo> {
        let rows = self.source.rows(CATEGORY_TABLE)?;
        if rows.len() > NUM_CATEGORIES {
            return Err(PdbError::InvalidFormat(format!(
                "{} categories defined, at most {} are supported",
                rows.len(),
                NUM_CATEGORIES
            )));
        }

        let mut categories = CategoryAppInfo::new();
        for (ix, row) in rows.iter().enumerate() {
            let id = row.int("ID")?;
            let key = u8::try_from(id)
                .map_err(|_| PdbError::InvalidFormat(format!("category key {} out of range", id)))?;
            let name = row.text("Name")?;
            debug!("Category {}: key={}, name='{}'", ix, key, name);
            categories.set(ix, Some(Category::new(name, key, false)));
        }
        Ok(categories)
    }

    fn read_event(&self, row: &Row, categories: &CategoryAppInfo) -> Result<ScheduleRecord> {
        let key = row.int("Category")?;
        let category_index = u8::try_from(key).ok().and_then(|k| categories.find_by_key(k));
        if category_index.is_none() {
            debug!("Unknown category key {}, using slot 0", key);
        }

        let mut attributes = category_index.unwrap_or(0) as u8 & RecordAttributes::CATEGORY_MASK;
        if row.bool("Private")? {
            attributes |= RecordAttributes::SECRET;
        }

        let offset = self.row_offset(row)?;
        let start = local_time(row.seconds("Start Time")?, offset)?;
        let end = local_time(row.seconds("End Time")?, offset)?;

        let mut record = ScheduleRecord::new(RecordAttributes(attributes), ShortDate::from(start.date()));
        record.category = category_index.and_then(|ix| categories.name(ix)).map(str::to_owned);
        record.note = non_empty(row.text("Note")?);
        record.description = non_empty(row.text("Summary")?);
        record.location = non_empty(row.text("Location")?);

        if !row.bool("Untimed")? {
            record.start_time = Some(ShortTime::from(start.time()));
            record.end_time = Some(ShortTime::from(end.time()));
        }

        if row.bool("Alarm")? {
            let value = row.int("Alarm Advance")?;
            let value = i32::try_from(value)
                .map_err(|_| PdbError::InvalidFormat(format!("alarm advance {} out of range", value)))?;
            let unit = row.int("Alarm Unit")?;
            let unit = u8::try_from(unit)
                .map_err(|_| PdbError::UnknownEnumerant {
                    kind: "alarm unit",
                    value: u32::try_from(unit).unwrap_or(u32::MAX),
                })
                .and_then(AlarmUnit::try_from)?;
            record.alarm = Some(Alarm { value, unit });
        }

        let event = row.text("Repeated Event")?;
        if !event.trim().is_empty() {
            if let Some(parsed) = text::decode(event) {
                record.repeat = Some(parsed.repeat);
                record.exceptions = parsed.exceptions;
            }
        }

        trace!("Event: date={}, repeat={:?}", record.date, record.repeat);
        Ok(record)
    }

    /// The row's `Time Zone` as a fixed offset, or the default offset.
    fn row_offset(&self, row: &Row) -> Result<FixedOffset> {
        let zone = row.text("Time Zone")?;
        match parse_utc_offset(zone) {
            Some(offset) => Ok(offset),
            None => {
                if !zone.trim().is_empty() {
                    debug!("Time zone '{}' is not a UTC offset, using {}", zone, self.default_offset);
                }
                Ok(self.default_offset)
            }
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_owned())
}

/// Converts seconds since 1970 to local date and time at `offset`.
fn local_time(seconds: i64, offset: FixedOffset) -> Result<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|utc| utc.with_timezone(&offset).naive_local())
        .ok_or_else(|| PdbError::InvalidFormat(format!("timestamp {} out of range", seconds)))
}

/// Parses a UTC offset such as `+02:00`, `-0500`, `UTC`, `GMT+1` or `Z`.
pub fn parse_utc_offset(zone: &str) -> Option<FixedOffset> {
    let zone = zone.trim();
    let rest = ["UTC", "GMT"]
        .iter()
        .find_map(|prefix| zone.strip_prefix(prefix))
        .unwrap_or(zone);
    if (rest.is_empty() && !zone.is_empty()) || rest == "Z" {
        return Some(Utc.fix());
    }

    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at_checked(2)?,
        None => (digits, "0"),
    };
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Header for databases read from tables, which have none of their own.
fn table_header() -> DatabaseHeader {
    DatabaseHeader {
        name: DATABASE_NAME.to_owned(),
        attributes: 0,
        version: 0,
        created: date::epoch(),
        modified: date::epoch(),
        backed_up: None,
        modification_number: 0,
        app_info_offset: 0,
        db_type: "DATA".to_owned(),
        creator: DATABASE_CREATOR.to_owned(),
    }
}
