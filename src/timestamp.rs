//! Fixed-width log timestamps (`"Mon DD HH:MM:SS:mmm"`) and duration rendering.
//!
//! The log format carries no year. Every [`Timestamp`] is anchored to
//! [`REFERENCE_YEAR`] so that calendar checks and subtraction are defined;
//! comparisons within one run assume the log does not cross a year boundary.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;
use thiserror::Error;

/// Width of the timestamp field at the start of every log line.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Year assumed for every parsed timestamp. Never rendered.
pub const REFERENCE_YEAR: i32 = 1900;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected 19 characters, got {0}")]
    Length(usize),

    #[error("unknown month abbreviation: {0:?}")]
    Month(String),

    #[error("expected {expected:?} at position {position}, found {found:?}")]
    Separator {
        position: usize,
        expected: char,
        found: char,
    },

    #[error("invalid {field}: {value:?}")]
    Field { field: &'static str, value: String },

    #[error("{0} is not a valid date or time")]
    OutOfRange(String),
}

/// A point in time with month, day, hour, minute, second and millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    pub fn new(
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self, FormatError> {
        NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, minute, second, millisecond))
            // and_hms_milli_opt accepts 1000..=1999 ms as a leap second
            .filter(|_| second < 60 && millisecond < 1000)
            .map(Self)
            .ok_or_else(|| {
                FormatError::OutOfRange(format!(
                    "{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{millisecond:03}"
                ))
            })
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    pub fn millisecond(&self) -> u32 {
        self.0.nanosecond() / 1_000_000
    }
}

impl FromStr for Timestamp {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != TIMESTAMP_WIDTH {
            return Err(FormatError::Length(chars.len()));
        }

        let month_text: String = chars[0..3].iter().collect();
        let month = MONTHS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(&month_text))
            .ok_or(FormatError::Month(month_text))?;

        for (position, expected) in [(3, ' '), (6, ' '), (9, ':'), (12, ':'), (15, ':')] {
            if chars[position] != expected {
                return Err(FormatError::Separator {
                    position,
                    expected,
                    found: chars[position],
                });
            }
        }

        let day = digits(&chars[4..6], "day")?;
        let hour = digits(&chars[7..9], "hour")?;
        let minute = digits(&chars[10..12], "minute")?;
        let second = digits(&chars[13..15], "second")?;
        let millisecond = digits(&chars[16..19], "millisecond")?;

        Self::new(month as u32 + 1, day, hour, minute, second, millisecond)
    }
}

fn digits(chars: &[char], field: &'static str) -> Result<u32, FormatError> {
    let value: String = chars.iter().collect();
    if !chars.iter().all(char::is_ascii_digit) {
        return Err(FormatError::Field { field, value });
    }
    value
        .parse()
        .map_err(|_| FormatError::Field { field, value })
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02} {:02}:{:02}:{:02}:{:03}",
            MONTHS[self.month() as usize - 1],
            self.day(),
            self.hour(),
            self.minute(),
            self.second(),
            self.millisecond()
        )
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Sub for Timestamp {
    type Output = TimeDelta;

    fn sub(self, rhs: Self) -> TimeDelta {
        self.0 - rhs.0
    }
}

/// Renders a duration as `[N day[s], ]H:MM:SS[.ffffff]`, to millisecond
/// precision.
///
/// Negative durations are split into a negative day count and a positive
/// time of day, so minus two seconds prints as `-1 day, 23:59:58`.
pub fn format_duration(delta: TimeDelta) -> String {
    const SECONDS_PER_DAY: i64 = 86_400;

    let millis = delta.num_milliseconds();
    let seconds = millis.div_euclid(1_000);
    let micros = millis.rem_euclid(1_000) * 1_000;

    let days = seconds.div_euclid(SECONDS_PER_DAY);
    let rem = seconds.rem_euclid(SECONDS_PER_DAY);
    let (hours, minutes, secs) = (rem / 3600, rem % 3600 / 60, rem % 60);

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{secs:02}"));
    if micros != 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}
