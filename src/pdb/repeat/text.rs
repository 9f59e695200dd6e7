//! One-line recurrence grammar of the desktop calendar database.
//!
//! A line is matched against six patterns in order; the first match wins:
//!
//! ```text
//! D<freq> <tail>                 daily
//! W<freq> <days> <tail>          weekly, days like "TU WE TH"
//! MD<freq> <day-of-month> <tail> monthly on a fixed day
//! MP<freq> <week>+ <day> <tail>  monthly on a weekday, week 5 = last
//! M<freq> <tail>                 monthly
//! YM<freq> <month> <tail>        yearly
//! ```
//!
//! `<tail>` is `#0` for no end, or a `;`/`,` separated list of dates
//! (`YYYYMMDDThhmmss[Z]`): the end date followed by exception dates.
//!
//! Input that does not fit is not an error. A line matching no pattern
//! decodes to `None`, and a malformed date decodes to an absent date.

use std::sync::OnceLock;

use chrono::{NaiveDate, Weekday};
use log::{debug, trace, warn};
use regex::{Captures, Regex};

use super::{MonthWeek, Repeat, RepeatRule, WeekdaySet, WEEKDAYS, weekday_code};
use crate::pdb::codec::date::ShortDate;

/// A decoded recurrence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRepeat {
    pub repeat: Repeat,
    /// Dates on which the event does not occur, in line order.
    pub exceptions: Vec<ShortDate>,
}

/// Compiled grammar, one pattern per repetition mode.
struct Grammar {
    daily: Regex,
    weekly: Regex,
    monthly_date: Regex,
    monthly_position: Regex,
    monthly: Regex,
    yearly: Regex,
    date: Regex,
}

static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

/// Returns the cached grammar.
fn grammar() -> &'static Grammar {
    GRAMMAR.get_or_init(|| Grammar {
        daily: Regex::new(r"^D(\d+)\s+(\S+)$").expect("Invalid daily repeat pattern"),
        weekly: Regex::new(r"^W(\d+)\s+(.+?)\s+(\S+)$").expect("Invalid weekly repeat pattern"),
        monthly_date: Regex::new(r"^MD(\d+)\s+(.+?)\s+(\S+)$").expect("Invalid monthly date repeat pattern"),
        monthly_position: Regex::new(r"^MP(\d+)\s+(\d+)\+\s+(.+?)\s+(\S+)$")
            .expect("Invalid monthly position repeat pattern"),
        monthly: Regex::new(r"^M(\d+)\s+(\S+)$").expect("Invalid monthly repeat pattern"),
        yearly: Regex::new(r"^YM(\d+)\s+(.+?)\s+(\S+)$").expect("Invalid yearly repeat pattern"),
        date: Regex::new(r"^(\d{4})(\d{2})(\d{2})T\d{6}[A-Za-z]?$").expect("Invalid repeat date pattern"),
    })
}

/// Decodes a recurrence line.
///
/// Returns `None` if the line matches no pattern, or if a monthly-by-weekday
/// line names an unknown week or weekday.
pub fn decode(line: &str) -> Option<TextRepeat> {
    let line = line.trim();
    let g = grammar();

    let (rule, caps, tail_group) = if let Some(caps) = g.daily.captures(line) {
        (RepeatRule::Daily, caps, 2)
    } else if let Some(caps) = g.weekly.captures(line) {
        let days = parse_weekdays(&caps[2]);
        (RepeatRule::Weekly(days), caps, 3)
    } else if let Some(caps) = g.monthly_date.captures(line) {
        (RepeatRule::Monthly, caps, 3)
    } else if let Some(caps) = g.monthly_position.captures(line) {
        let Some(week) = parse_month_week(&caps[2]) else {
            debug!("Dropping repeat line with unknown week: {:?}", line);
            return None;
        };
        let Some(day) = parse_weekday(&caps[3]) else {
            debug!("Dropping repeat line with unknown weekday: {:?}", line);
            return None;
        };
        (RepeatRule::MonthlyByDay { week, day }, caps, 4)
    } else if let Some(caps) = g.monthly.captures(line) {
        (RepeatRule::Monthly, caps, 2)
    } else if let Some(caps) = g.yearly.captures(line) {
        (RepeatRule::Yearly, caps, 3)
    } else {
        debug!("Unrecognized repeat line: {:?}", line);
        return None;
    };

    let frequency = parse_frequency(&caps)?;
    let (until, exceptions) = parse_tail(&caps[tail_group]);

    trace!("Text repeat {:?}: {:?}, frequency={}, until={:?}", line, rule, frequency, until);

    Some(TextRepeat {
        repeat: Repeat::new(rule, frequency, until),
        exceptions,
    })
}

fn parse_frequency(caps: &Captures) -> Option<u32> {
    match caps[1].parse::<u32>() {
        Ok(frequency) => Some(frequency),
        Err(err) => {
            debug!("Unparseable repeat frequency {:?}: {}", &caps[1], err);
            None
        }
    }
}

/// Splits the tail into the end date and the exception dates.
fn parse_tail(tail: &str) -> (Option<ShortDate>, Vec<ShortDate>) {
    let mut parts = tail.split([';', ',']).map(str::trim).filter(|p| !p.is_empty());

    let until = match parts.next() {
        Some(marker) if marker.starts_with('#') => {
            if marker != "#0" {
                warn!("Occurrence count {:?} is not supported, repeating without end", marker);
            }
            None
        }
        Some(token) => {
            let date = parse_date(token);
            if date.is_none() {
                warn!("Dropping unparseable repeat end date {:?}", token);
            }
            date
        }
        None => None,
    };

    let exceptions = parts
        .filter_map(|token| {
            let date = parse_date(token);
            if date.is_none() {
                warn!("Dropping unparseable repeat exception {:?}", token);
            }
            date
        })
        .collect();

    (until, exceptions)
}

/// Parses a `YYYYMMDDThhmmss` token, with an optional zone letter.
///
/// Only the date part is used. Returns `None` if the token is malformed
/// or is not a valid calendar date.
pub fn parse_date(token: &str) -> Option<ShortDate> {
    let caps = grammar().date.captures(token.trim())?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(ShortDate::from)
}

/// Parses a list of weekday codes, separated by anything that is not a letter.
///
/// Codes are case-insensitive; unknown codes are ignored.
pub fn parse_weekdays(list: &str) -> WeekdaySet {
    list.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .filter_map(weekday_from_code)
        .collect()
}

/// Parses a single weekday code.
///
/// Returns `None` unless `token` is exactly one known code, so "WE FR" is
/// rejected.
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    weekday_from_code(token.trim())
}

/// Looks up a two-letter weekday code, ignoring case.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    WEEKDAYS
        .into_iter()
        .find(|day| weekday_code(*day).eq_ignore_ascii_case(code))
}

/// Converts a one-based week of month; 5 means the last week.
fn parse_month_week(token: &str) -> Option<MonthWeek> {
    match token.parse::<u8>().ok()? {
        week @ 1..=4 => MonthWeek::try_from(week - 1).ok(),
        5 => Some(MonthWeek::Last),
        _ => None,
    }
}
