//! Binary recurrence block of PDB calendar records.
//!
//! # Layout (8 bytes)
//! ```text
//! [1 byte ] mode (1 daily, 2 weekly, 3 monthly by day, 4 monthly, 5 yearly)
//! [1 byte ] unused
//! [2 bytes] end date, packed (0xFFFF = no end)
//! [1 byte ] frequency
//! [1 byte ] repeat on: weekday bitmask (weekly) or week*7+day (monthly by day)
//! [1 byte ] start of week (ignored)
//! [1 byte ] unused
//! ```

use byteorder::{BigEndian, ByteOrder};
use log::trace;

use super::{MonthWeek, Repeat, RepeatMode, RepeatRule, WeekdaySet, weekday_from_index, weekday_index};
use crate::pdb::codec::date::{NO_DATE, ShortDate};
use crate::pdb::types::error::{PdbError, Result};

/// Size of the recurrence block in bytes.
pub const REPEAT_SIZE: usize = 8;

impl TryFrom<u8> for RepeatMode {
    type Error = PdbError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::Daily),
            2 => Ok(Self::Weekly),
            3 => Ok(Self::MonthlyByDay),
            4 => Ok(Self::Monthly),
            5 => Ok(Self::Yearly),
            _ => Err(PdbError::UnknownEnumerant {
                kind: "repeat mode",
                value: u32::from(value),
            }),
        }
    }
}

impl RepeatMode {
    /// The mode tag used in the binary block.
    pub fn tag(self) -> u8 {
        match self {
            RepeatMode::Daily => 1,
            RepeatMode::Weekly => 2,
            RepeatMode::MonthlyByDay => 3,
            RepeatMode::Monthly => 4,
            RepeatMode::Yearly => 5,
        }
    }
}

/// Decodes a binary recurrence block.
///
/// # Errors
/// [`PdbError::UnknownEnumerant`] for an unknown mode tag or a week index
/// above 4.
pub fn decode(bytes: &[u8; REPEAT_SIZE]) -> Result<Repeat> {
    let mode = RepeatMode::try_from(bytes[0])?;
    let until = ShortDate::from_packed_opt(BigEndian::read_u16(&bytes[2..4]));
    let frequency = u32::from(bytes[4]);
    let repeat_on = bytes[5];

    let rule = match mode {
        RepeatMode::Daily => RepeatRule::Daily,
        RepeatMode::Weekly => RepeatRule::Weekly(WeekdaySet::from_bits(repeat_on)),
        RepeatMode::MonthlyByDay => {
            let week = MonthWeek::try_from(repeat_on / 7)?;
            // repeat_on % 7 is always a valid index
            let day = weekday_from_index(repeat_on % 7).unwrap_or(chrono::Weekday::Sun);
            RepeatRule::MonthlyByDay { week, day }
        }
        RepeatMode::Monthly => RepeatRule::Monthly,
        RepeatMode::Yearly => RepeatRule::Yearly,
    };

    trace!("Binary repeat: mode={}, frequency={}, until={:?}, repeat_on={:#04x}", mode, frequency, until, repeat_on);

    Ok(Repeat::new(rule, frequency, until))
}

/// Encodes a recurrence into its binary block.
///
/// Frequencies above 255 are saturated.
pub fn encode(repeat: &Repeat) -> [u8; REPEAT_SIZE] {
    let mut bytes = [0u8; REPEAT_SIZE];
    bytes[0] = repeat.mode().tag();
    let until = repeat.until.map(|d| d.to_packed()).unwrap_or(NO_DATE);
    BigEndian::write_u16(&mut bytes[2..4], until);
    bytes[4] = u8::try_from(repeat.frequency).unwrap_or(u8::MAX);
    bytes[5] = match repeat.rule {
        RepeatRule::Weekly(days) => days.bits(),
        RepeatRule::MonthlyByDay { week, day } => week.index() * 7 + weekday_index(day),
        _ => 0,
    };
    bytes
}
