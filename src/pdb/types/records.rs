//! Record types, one per supported schema, and their tagged union.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use super::category::{AppInfo, CategoryAppInfo};
use super::error::{PdbError, Result};
use super::models::{PdbRecord, RecordAttributes};
use crate::pdb::codec::date::{ShortDate, ShortTime};
use crate::pdb::repeat::{Repeat, rrule};

/// A record that carries a date, used by date range filters.
pub trait DatedRecord {
    /// The date of the record, `None` if it has none.
    fn record_date(&self) -> Option<NaiveDate>;
}

// --- Address book ---

/// Fields of an address record, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    LastName,
    FirstName,
    Company,
    Phone1,
    Phone2,
    Phone3,
    Phone4,
    Phone5,
    Address,
    City,
    State,
    Zip,
    Country,
    Title,
    Custom1,
    Custom2,
    Custom3,
    Custom4,
    Note,
}

impl AddressField {
    pub const COUNT: usize = 19;

    pub const ALL: [AddressField; Self::COUNT] = [
        AddressField::LastName,
        AddressField::FirstName,
        AddressField::Company,
        AddressField::Phone1,
        AddressField::Phone2,
        AddressField::Phone3,
        AddressField::Phone4,
        AddressField::Phone5,
        AddressField::Address,
        AddressField::City,
        AddressField::State,
        AddressField::Zip,
        AddressField::Country,
        AddressField::Title,
        AddressField::Custom1,
        AddressField::Custom2,
        AddressField::Custom3,
        AddressField::Custom4,
        AddressField::Note,
    ];

    /// Storage position of the field.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Phone slot number (0..=4) for phone fields.
    pub fn phone_slot(self) -> Option<usize> {
        match self {
            AddressField::Phone1 => Some(0),
            AddressField::Phone2 => Some(1),
            AddressField::Phone3 => Some(2),
            AddressField::Phone4 => Some(3),
            AddressField::Phone5 => Some(4),
            _ => None,
        }
    }
}

/// Label of a phone slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneLabel {
    Work,
    Home,
    Fax,
    Other,
    Email,
    Main,
    Pager,
    Mobile,
}

impl PhoneLabel {
    /// Position of this label's name in the address app info label list.
    pub fn label_index(self) -> usize {
        match self {
            PhoneLabel::Work => 3,
            PhoneLabel::Home => 4,
            PhoneLabel::Fax => 5,
            PhoneLabel::Other => 6,
            PhoneLabel::Email => 7,
            PhoneLabel::Main => 19,
            PhoneLabel::Pager => 20,
            PhoneLabel::Mobile => 21,
        }
    }
}

impl TryFrom<u8> for PhoneLabel {
    type Error = PdbError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Work),
            1 => Ok(Self::Home),
            2 => Ok(Self::Fax),
            3 => Ok(Self::Other),
            4 => Ok(Self::Email),
            5 => Ok(Self::Main),
            6 => Ok(Self::Pager),
            7 => Ok(Self::Mobile),
            _ => Err(PdbError::UnknownEnumerant {
                kind: "phone label",
                value: u32::from(value),
            }),
        }
    }
}

/// A contact from the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub attributes: RecordAttributes,
    /// Field values indexed by [`AddressField::index`].
    pub fields: [Option<String>; AddressField::COUNT],
    /// Label of each of the five phone slots.
    pub phone_labels: [PhoneLabel; 5],
    /// Phone slot (0..=4) shown in the list view.
    pub display_phone: u8,
}

impl AddressRecord {
    pub fn field(&self, field: AddressField) -> Option<&str> {
        self.fields[field.index()].as_deref()
    }

    /// Label of a phone field, `None` for other fields.
    pub fn phone_label(&self, field: AddressField) -> Option<PhoneLabel> {
        field.phone_slot().map(|slot| self.phone_labels[slot])
    }

    /// `true` if `field` is the preferred phone number.
    pub fn is_preferred(&self, field: AddressField) -> bool {
        field.phone_slot() == Some(usize::from(self.display_phone))
    }

    /// Iterates over all fields that have a value.
    pub fn iter(&self) -> impl Iterator<Item = (AddressField, &str)> {
        AddressField::ALL
            .iter()
            .filter_map(|&f| self.field(f).map(|v| (f, v)))
    }
}

/// Application info of the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressAppInfo {
    pub categories: CategoryAppInfo,
    /// Bitmask of labels the user renamed.
    pub dirty_labels: u32,
    /// 19 field labels followed by the three extra phone labels.
    pub labels: Vec<String>,
    pub country: u16,
    pub sort_by_company: bool,
}

impl AddressAppInfo {
    /// Display name of a field, if the app info defines it.
    pub fn field_label(&self, field: AddressField) -> Option<&str> {
        self.labels.get(field.index()).map(String::as_str)
    }

    /// Display name of a phone label, if the app info defines it.
    pub fn phone_label(&self, label: PhoneLabel) -> Option<&str> {
        self.labels.get(label.label_index()).map(String::as_str)
    }
}

impl AppInfo for AddressAppInfo {
    fn categories(&self) -> Option<&CategoryAppInfo> {
        Some(&self.categories)
    }
}

// --- Memo pad ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoRecord {
    pub attributes: RecordAttributes,
    pub memo: String,
}

// --- To-do list ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub attributes: RecordAttributes,
    pub due: Option<ShortDate>,
    /// Priority, 0..=127.
    pub priority: u8,
    pub completed: bool,
    pub description: String,
    pub note: Option<String>,
}

impl DatedRecord for TodoRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.due.and_then(|d| d.to_naive_date())
    }
}

// --- Notepad ---

/// A handwritten note: timestamps, optional title and the image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotepadRecord {
    pub attributes: RecordAttributes,
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
    pub alarm: Option<NaiveDateTime>,
    pub title: Option<String>,
    /// Embedded image, kept as stored.
    pub image: Vec<u8>,
}

impl DatedRecord for NotepadRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.created.map(|c| c.date())
    }
}

// --- Calendar ---

/// Unit of an alarm advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmUnit {
    Minutes,
    Hours,
    Days,
}

impl TryFrom<u8> for AlarmUnit {
    type Error = PdbError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Minutes),
            1 => Ok(Self::Hours),
            2 => Ok(Self::Days),
            _ => Err(PdbError::UnknownEnumerant {
                kind: "alarm unit",
                value: u32::from(value),
            }),
        }
    }
}

impl fmt::Display for AlarmUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlarmUnit::Minutes => write!(f, "minutes"),
            AlarmUnit::Hours => write!(f, "hours"),
            AlarmUnit::Days => write!(f, "days"),
        }
    }
}

/// Alarm that fires `value` units before the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alarm {
    pub value: i32,
    pub unit: AlarmUnit,
}

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    pub attributes: RecordAttributes,
    /// `None` for untimed events.
    pub start_time: Option<ShortTime>,
    pub end_time: Option<ShortTime>,
    pub date: ShortDate,
    pub alarm: Option<Alarm>,
    pub repeat: Option<Repeat>,
    /// Dates on which a repeating event does not occur.
    pub exceptions: Vec<ShortDate>,
    pub description: Option<String>,
    pub note: Option<String>,
    pub location: Option<String>,
    /// Category name resolved from the category table.
    pub category: Option<String>,
}

impl ScheduleRecord {
    /// An untimed event without repetition on the given date.
    pub fn new(attributes: RecordAttributes, date: ShortDate) -> Self {
        Self {
            attributes,
            start_time: None,
            end_time: None,
            date,
            alarm: None,
            repeat: None,
            exceptions: Vec::new(),
            description: None,
            note: None,
            location: None,
            category: None,
        }
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    /// iCalendar property lines of the recurrence: `RRULE:...`, followed
    /// by an `EXDATE` line if there are exceptions. Empty for single events.
    pub fn rule_syntax(&self) -> Vec<String> {
        let Some(repeat) = &self.repeat else {
            return Vec::new();
        };
        let mut lines = vec![format!("RRULE:{}", rrule::encode(repeat))];
        lines.extend(rrule::encode_exdates(&self.exceptions));
        lines
    }
}

impl DatedRecord for ScheduleRecord {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date.to_naive_date()
    }
}

// --- Raw ---

/// Undecoded record bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub attributes: RecordAttributes,
    pub data: Vec<u8>,
}

/// Undecoded application info bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAppInfo {
    pub data: Vec<u8>,
}

impl AppInfo for RawAppInfo {
    fn categories(&self) -> Option<&CategoryAppInfo> {
        None
    }
}

macro_rules! impl_pdb_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PdbRecord for $ty {
                fn attributes(&self) -> RecordAttributes {
                    self.attributes
                }
            }
        )*
    };
}

impl_pdb_record!(
    AddressRecord,
    MemoRecord,
    TodoRecord,
    NotepadRecord,
    ScheduleRecord,
    RawRecord,
);

/// Any decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Address(AddressRecord),
    Memo(MemoRecord),
    Todo(TodoRecord),
    Notepad(NotepadRecord),
    Schedule(ScheduleRecord),
    Raw(RawRecord),
}

impl Record {
    /// A short name of the record kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Address(_) => "address",
            Record::Memo(_) => "memo",
            Record::Todo(_) => "todo",
            Record::Notepad(_) => "notepad",
            Record::Schedule(_) => "schedule",
            Record::Raw(_) => "raw",
        }
    }
}

impl PdbRecord for Record {
    fn attributes(&self) -> RecordAttributes {
        match self {
            Record::Address(r) => r.attributes,
            Record::Memo(r) => r.attributes,
            Record::Todo(r) => r.attributes,
            Record::Notepad(r) => r.attributes,
            Record::Schedule(r) => r.attributes,
            Record::Raw(r) => r.attributes,
        }
    }
}

impl DatedRecord for Record {
    fn record_date(&self) -> Option<NaiveDate> {
        match self {
            Record::Todo(r) => r.record_date(),
            Record::Notepad(r) => r.record_date(),
            Record::Schedule(r) => r.record_date(),
            Record::Address(_) | Record::Memo(_) | Record::Raw(_) => None,
        }
    }
}

macro_rules! impl_from_record {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Record {
                fn from(record: $ty) -> Self {
                    Record::$variant(record)
                }
            }
        )*
    };
}

impl_from_record!(
    Address(AddressRecord),
    Memo(MemoRecord),
    Todo(TodoRecord),
    Notepad(NotepadRecord),
    Schedule(ScheduleRecord),
    Raw(RawRecord),
);

/// Application info of any schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyAppInfo {
    Categories(CategoryAppInfo),
    Address(AddressAppInfo),
    Raw(RawAppInfo),
}

impl AppInfo for AnyAppInfo {
    fn categories(&self) -> Option<&CategoryAppInfo> {
        match self {
            AnyAppInfo::Categories(c) => Some(c),
            AnyAppInfo::Address(a) => Some(&a.categories),
            AnyAppInfo::Raw(_) => None,
        }
    }
}
