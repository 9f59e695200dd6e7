//! Recurrence of calendar events.
//!
//! [`Repeat`] is the canonical form of a repeating event. It is filled
//! from two independent wire encodings and written to a third:
//!
//! - [`binary`]: the 8-byte block inside calendar records of a PDB file
//! - [`text`]: the one-line grammar of the desktop database ("W1 TU TH #0")
//! - [`rrule`]: iCalendar rule syntax ("FREQ=WEEKLY;BYDAY=TU,TH")
//!
//! The codecs do not call each other; they agree only through this model.

pub mod binary;
pub mod rrule;
pub mod text;

use std::fmt;

use chrono::Weekday;

use crate::pdb::codec::date::ShortDate;
use crate::pdb::types::error::{PdbError, Result};

/// Weekdays in PalmOS order, Sunday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Returns the weekday for a Sunday-based index (0 = Sunday).
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WEEKDAYS.get(usize::from(index)).copied()
}

/// Returns the Sunday-based index of a weekday.
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Two-letter weekday code used by both text encodings.
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

/// Repetition mode tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatMode {
    Daily,
    Weekly,
    MonthlyByDay,
    Monthly,
    Yearly,
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RepeatMode::Daily => write!(f, "DAILY"),
            RepeatMode::Weekly => write!(f, "WEEKLY"),
            RepeatMode::MonthlyByDay => write!(f, "MONTHLY_BY_DAY"),
            RepeatMode::Monthly => write!(f, "MONTHLY"),
            RepeatMode::Yearly => write!(f, "YEARLY"),
        }
    }
}

/// Week of the month for monthly-by-weekday repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthWeek {
    First,
    Second,
    Third,
    Fourth,
    /// The last occurrence of the weekday in the month, whether that is
    /// the fourth or the fifth.
    Last,
}

impl MonthWeek {
    /// Zero-based week index; [`MonthWeek::Last`] is index 4.
    pub fn index(self) -> u8 {
        match self {
            MonthWeek::First => 0,
            MonthWeek::Second => 1,
            MonthWeek::Third => 2,
            MonthWeek::Fourth => 3,
            MonthWeek::Last => 4,
        }
    }

    /// Ordinal for rule syntax: 1..=4, or -1 for the last week.
    pub fn ordinal(self) -> i8 {
        match self {
            MonthWeek::Last => -1,
            other => other.index() as i8 + 1,
        }
    }
}

impl TryFrom<u8> for MonthWeek {
    type Error = PdbError;
    fn try_from(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Self::First),
            1 => Ok(Self::Second),
            2 => Ok(Self::Third),
            3 => Ok(Self::Fourth),
            4 => Ok(Self::Last),
            _ => Err(PdbError::UnknownEnumerant {
                kind: "monthly week",
                value: u32::from(index),
            }),
        }
    }
}

/// A set of weekdays, stored as a bitmask with Sunday in bit 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Builds a set from the low 7 bits of a PalmOS "repeat on" byte.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << weekday_index(day);
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << weekday_index(day)) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The included days, Sunday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEKDAYS.into_iter().filter(move |d| self.contains(*d))
    }

    /// The set as seven flags, Sunday first.
    pub fn to_array(self) -> [bool; 7] {
        let mut days = [false; 7];
        for (ix, flag) in days.iter_mut().enumerate() {
            *flag = self.0 & (1 << ix) != 0;
        }
        days
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::EMPTY;
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// The mode of a repetition together with the data only that mode uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatRule {
    Daily,
    Weekly(WeekdaySet),
    MonthlyByDay { week: MonthWeek, day: Weekday },
    Monthly,
    Yearly,
}

impl RepeatRule {
    pub fn mode(&self) -> RepeatMode {
        match self {
            RepeatRule::Daily => RepeatMode::Daily,
            RepeatRule::Weekly(_) => RepeatMode::Weekly,
            RepeatRule::MonthlyByDay { .. } => RepeatMode::MonthlyByDay,
            RepeatRule::Monthly => RepeatMode::Monthly,
            RepeatRule::Yearly => RepeatMode::Yearly,
        }
    }
}

/// A repeating event's recurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repeat {
    pub rule: RepeatRule,
    /// Interval between occurrences, at least 1.
    pub frequency: u32,
    /// Last possible occurrence, `None` for no end.
    pub until: Option<ShortDate>,
}

impl Repeat {
    /// Creates a repeat; a frequency of 0 is normalized to 1.
    pub fn new(rule: RepeatRule, frequency: u32, until: Option<ShortDate>) -> Self {
        Self {
            rule,
            frequency: frequency.max(1),
            until,
        }
    }

    pub fn mode(&self) -> RepeatMode {
        self.rule.mode()
    }

    /// Days of a weekly repetition, `None` for other modes.
    pub fn weekly_days(&self) -> Option<WeekdaySet> {
        match self.rule {
            RepeatRule::Weekly(days) => Some(days),
            _ => None,
        }
    }

    /// Week and day of a monthly-by-weekday repetition, `None` for other modes.
    pub fn monthly_day(&self) -> Option<(MonthWeek, Weekday)> {
        match self.rule {
            RepeatRule::MonthlyByDay { week, day } => Some((week, day)),
            _ => None,
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.mode(), self.frequency)?;
        if let Some(until) = self.until {
            write!(f, "-until:{}", until)?;
        }
        match self.rule {
            RepeatRule::Weekly(days) => {
                write!(f, "-on")?;
                for day in days.iter() {
                    write!(f, ":{}", weekday_code(day))?;
                }
            }
            RepeatRule::MonthlyByDay { week, day } => {
                write!(f, "-week:{}-day:{}", week.index(), weekday_code(day))?;
            }
            _ => {}
        }
        Ok(())
    }
}
