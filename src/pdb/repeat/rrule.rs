//! iCalendar recurrence rule output.

use super::{Repeat, RepeatMode, RepeatRule, weekday_code};
use crate::pdb::codec::date::ShortDate;

/// Encodes a recurrence as an iCalendar `RRULE` value.
///
/// Tokens are emitted in the order `FREQ`, `UNTIL`, `INTERVAL`, `BYDAY`.
/// `INTERVAL` is only written for frequencies above 1. A monthly-by-weekday
/// repetition in the last week of the month becomes `BYDAY=-1xx`.
///
/// ```
/// use pdb_reader::pdb::repeat::{MonthWeek, Repeat, RepeatRule, rrule};
/// use chrono::Weekday;
///
/// let repeat = Repeat::new(RepeatRule::MonthlyByDay { week: MonthWeek::Last, day: Weekday::Fri }, 1, None);
/// assert_eq!(rrule::encode(&repeat), "FREQ=MONTHLY;BYDAY=-1FR");
/// ```
pub fn encode(repeat: &Repeat) -> String {
    let mut tokens = vec![format!("FREQ={}", frequency_keyword(repeat.mode()))];

    if let Some(until) = repeat.until {
        tokens.push(format!("UNTIL={}", date_value(until)));
    }

    if repeat.frequency > 1 {
        tokens.push(format!("INTERVAL={}", repeat.frequency));
    }

    match repeat.rule {
        RepeatRule::Weekly(days) if !days.is_empty() => {
            let list: Vec<&str> = days.iter().map(weekday_code).collect();
            tokens.push(format!("BYDAY={}", list.join(",")));
        }
        RepeatRule::MonthlyByDay { week, day } => {
            tokens.push(format!("BYDAY={}{}", week.ordinal(), weekday_code(day)));
        }
        _ => {}
    }

    tokens.join(";")
}

/// Encodes exception dates as an `EXDATE` property line.
///
/// Returns `None` if there are no exceptions.
pub fn encode_exdates(exceptions: &[ShortDate]) -> Option<String> {
    if exceptions.is_empty() {
        return None;
    }
    let dates: Vec<String> = exceptions.iter().map(|d| date_value(*d)).collect();
    Some(format!("EXDATE;VALUE=DATE:{}", dates.join(",")))
}

fn frequency_keyword(mode: RepeatMode) -> &'static str {
    match mode {
        RepeatMode::Daily => "DAILY",
        RepeatMode::Weekly => "WEEKLY",
        RepeatMode::MonthlyByDay | RepeatMode::Monthly => "MONTHLY",
        RepeatMode::Yearly => "YEARLY",
    }
}

fn date_value(date: ShortDate) -> String {
    format!("{:04}{:02}{:02}", date.year, date.month, date.day)
}
