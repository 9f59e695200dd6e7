//! PalmOS date and time encodings.
//!
//! Three encodings appear in PDB files:
//! - Timestamps: unsigned 32-bit seconds since 1904-01-01 00:00 (local time).
//! - Packed dates: 16 bits, `yyyyyyym mmmddddd` with the year counted from 1904.
//! - Date-time words: seven 16-bit words (second, minute, hour, day, month, year, weekday).

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Year of the PalmOS epoch.
pub const EPOCH_YEAR: i32 = 1904;

/// Packed date value meaning "no date".
pub const NO_DATE: u16 = 0xFFFF;

/// Returns the PalmOS epoch, 1904-01-01 00:00:00.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(EPOCH_YEAR, 1, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

/// Converts a PalmOS timestamp to a date and time.
///
/// The value is unsigned; timestamps after 1972 have the top bit set and
/// must not be sign-extended.
pub fn from_palm_seconds(seconds: u32) -> NaiveDateTime {
    epoch() + Duration::seconds(i64::from(seconds))
}

/// Converts a date and time back to a PalmOS timestamp.
///
/// Returns `None` if the value is outside the representable range.
pub fn to_palm_seconds(datetime: NaiveDateTime) -> Option<u32> {
    let seconds = (datetime - epoch()).num_seconds();
    u32::try_from(seconds).ok()
}

/// A calendar date as stored in a packed 16-bit field.
///
/// Month and day are kept as stored. Files may contain bit patterns that
/// are not valid calendar dates, so this type does not validate them;
/// use [`ShortDate::to_naive_date`] for a checked conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl ShortDate {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Unpacks a 7/4/5 bit packed date.
    pub fn from_packed(packed: u16) -> Self {
        Self {
            year: ((packed >> 9) & 0x7F) + EPOCH_YEAR as u16,
            month: ((packed >> 5) & 0x0F) as u8,
            day: (packed & 0x1F) as u8,
        }
    }

    /// Unpacks a packed date, treating [`NO_DATE`] as absent.
    pub fn from_packed_opt(packed: u16) -> Option<Self> {
        (packed != NO_DATE).then(|| Self::from_packed(packed))
    }

    /// Packs this date into its 16-bit form.
    ///
    /// Years outside 1904..=2031 are truncated to 7 bits.
    pub fn to_packed(&self) -> u16 {
        let year = self.year.wrapping_sub(EPOCH_YEAR as u16) & 0x7F;
        (year << 9) | ((u16::from(self.month) & 0x0F) << 5) | (u16::from(self.day) & 0x1F)
    }

    /// Converts to a `NaiveDate`, `None` if month or day are out of range.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
    }
}

impl From<NaiveDate> for ShortDate {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year() as u16,
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }
}

impl fmt::Display for ShortDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// A time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShortTime {
    pub hour: u8,
    pub minute: u8,
}

impl ShortTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Builds a time from the signed hour/minute bytes of a schedule record.
    ///
    /// A negative byte (0xFF on disk) marks an untimed event.
    pub fn from_signed(hour: i8, minute: i8) -> Option<Self> {
        if hour < 0 || minute < 0 {
            return None;
        }
        Some(Self::new(hour as u8, minute as u8))
    }

    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
    }
}

impl From<NaiveTime> for ShortTime {
    fn from(time: NaiveTime) -> Self {
        use chrono::Timelike;
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for ShortTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Builds a date and time from PalmOS date-time words.
///
/// `words` is `[second, minute, hour, day, month, year, weekday]`. A zero
/// year means "not set"; values that do not form a valid date are also
/// treated as absent.
pub fn from_date_time_words(words: [u16; 7]) -> Option<NaiveDateTime> {
    let [second, minute, hour, day, month, year, _weekday] = words;
    if year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))?
        .and_hms_opt(u32::from(hour), u32::from(minute), u32::from(second))
}
