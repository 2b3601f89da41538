//! DLMS calendar values: `Date`, `Time` and `DateTime`.
//!
//! Every calendar field may be "not specified" on the wire (year `0xFFFF`,
//! deviation `0x8000`, every other field `0xFF`). In memory the wildcard is an
//! explicit [`DateTimeSkips`] flag and the field itself holds 0. Special month
//! and day values (`0xFD`/`0xFE`, DST end/begin and second-last/last day of
//! month) are ordinary field values and round-trip unchanged.

use core::fmt;
use core::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use bitflags::bitflags;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use nom::{
    IResult, Parser,
    number::complete::{be_i16, be_u16, u8},
};
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::error::CodecError;

const NOT_SPECIFIED: u8 = 0xFF;
const YEAR_NOT_SPECIFIED: u16 = 0xFFFF;
const DEVIATION_NOT_SPECIFIED: i16 = i16::MIN;

bitflags! {
    /// Calendar fields of a date/time value that are wildcarded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct DateTimeSkips: u16 {
        const YEAR        = 0x0001;
        const MONTH       = 0x0002;
        const DAY         = 0x0004;
        const DAY_OF_WEEK = 0x0008;
        const HOUR        = 0x0010;
        const MINUTE      = 0x0020;
        const SECOND      = 0x0040;
        const HUNDREDTHS  = 0x0080;
        const DEVIATION   = 0x0100;
        const STATUS      = 0x0200;

        const DATE = Self::YEAR.bits() | Self::MONTH.bits() | Self::DAY.bits() | Self::DAY_OF_WEEK.bits();
        const TIME = Self::HOUR.bits() | Self::MINUTE.bits() | Self::SECOND.bits() | Self::HUNDREDTHS.bits();
    }
}

bitflags! {
    /// Clock status byte of a `DateTime`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct ClockStatus: u8 {
        const INVALID_VALUE          = 0x01;
        const DOUBTFUL_VALUE         = 0x02;
        const DIFFERENT_CLOCK_BASE   = 0x04;
        const INVALID_CLOCK_STATUS   = 0x08;
        const DAYLIGHT_SAVING_ACTIVE = 0x80;
    }
}

/// Error returned when the text form of a calendar value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date/time text {0:?}")]
pub struct ParseDateTimeError(pub String);

fn field_from_wire(value: u8, flag: DateTimeSkips, skips: &mut DateTimeSkips) -> u8 {
    if value == NOT_SPECIFIED {
        skips.insert(flag);
        0
    } else {
        value
    }
}

fn field_to_wire(value: u8, flag: DateTimeSkips, skips: DateTimeSkips) -> u8 {
    if skips.contains(flag) { NOT_SPECIFIED } else { value }
}

fn field_to_text(value: impl Into<i64>, width: usize, skipped: bool) -> String {
    let value: i64 = value.into();
    if skipped { "*".to_owned() } else { format!("{value:0width$}") }
}

fn field_from_text<T>(text: &str, flag: DateTimeSkips, skips: &mut DateTimeSkips) -> Option<T>
where
    T: FromStr + Default + PartialEq + From<u8>,
{
    if text == "*" {
        skips.insert(flag);
        return Some(T::default());
    }
    let value = text.parse::<T>().ok()?;
    if value == T::from(NOT_SPECIFIED) {
        skips.insert(flag);
        return Some(T::default());
    }
    Some(value)
}

/// A calendar date with optional wildcard fields.
#[derive(Clone, Copy)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 1 = Monday .. 7 = Sunday.
    pub day_of_week: u8,
    pub skips: DateTimeSkips,
}

impl Date {
    /// A concrete date. The day of week is derived when the date is valid
    /// and left unspecified otherwise (e.g. month `0xFE`).
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        let weekday = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .map(|d| d.weekday().number_from_monday() as u8);
        Self {
            year,
            month,
            day,
            day_of_week: weekday.unwrap_or(0),
            skips: if weekday.is_some() { DateTimeSkips::empty() } else { DateTimeSkips::DAY_OF_WEEK },
        }
    }

    /// A date with every field wildcarded.
    pub fn unspecified() -> Self {
        Self { year: 0, month: 0, day: 0, day_of_week: 0, skips: DateTimeSkips::DATE }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self, CodecError> {
        let (input, (year, month, day, day_of_week)) = (be_u16, u8, u8, u8).parse(input)?;

        let mut skips = DateTimeSkips::empty();
        let year = if year == YEAR_NOT_SPECIFIED {
            skips.insert(DateTimeSkips::YEAR);
            0
        } else {
            year
        };
        let month = field_from_wire(month, DateTimeSkips::MONTH, &mut skips);
        let day = field_from_wire(day, DateTimeSkips::DAY, &mut skips);
        let day_of_week = field_from_wire(day_of_week, DateTimeSkips::DAY_OF_WEEK, &mut skips);

        Ok((input, Self { year, month, day, day_of_week, skips }))
    }

    pub fn encode(&self) -> [u8; 5] {
        let year = if self.skips.contains(DateTimeSkips::YEAR) { YEAR_NOT_SPECIFIED } else { self.year };
        let [y0, y1] = year.to_be_bytes();
        [
            y0,
            y1,
            field_to_wire(self.month, DateTimeSkips::MONTH, self.skips),
            field_to_wire(self.day, DateTimeSkips::DAY, self.skips),
            field_to_wire(self.day_of_week, DateTimeSkips::DAY_OF_WEEK, self.skips),
        ]
    }

    fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year().clamp(0, i32::from(YEAR_NOT_SPECIFIED - 1)) as u16,
            month: date.month() as u8,
            day: date.day() as u8,
            day_of_week: date.weekday().number_from_monday() as u8,
            skips: DateTimeSkips::empty(),
        }
    }
}

impl Default for Date {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl PartialEq for Date {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for Date {}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.skips;
        write!(
            f,
            "{}-{}-{} {}",
            field_to_text(self.year, 4, s.contains(DateTimeSkips::YEAR)),
            field_to_text(self.month, 2, s.contains(DateTimeSkips::MONTH)),
            field_to_text(self.day, 2, s.contains(DateTimeSkips::DAY)),
            field_to_text(self.day_of_week, 1, s.contains(DateTimeSkips::DAY_OF_WEEK)),
        )
    }
}

impl fmt::Debug for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date(\"{}\")", self)
    }
}

impl FromStr for Date {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateTimeError(s.to_owned());
        let mut tokens = s.split_whitespace();
        let (Some(ymd), Some(dow), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Err(err());
        };
        let mut parts = ymd.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        let mut skips = DateTimeSkips::empty();
        let year = if year == "*" || year == "65535" {
            skips.insert(DateTimeSkips::YEAR);
            0
        } else {
            year.parse::<u16>().map_err(|_| err())?
        };
        Ok(Self {
            year,
            month: field_from_text(month, DateTimeSkips::MONTH, &mut skips).ok_or_else(err)?,
            day: field_from_text(day, DateTimeSkips::DAY, &mut skips).ok_or_else(err)?,
            day_of_week: field_from_text(dow, DateTimeSkips::DAY_OF_WEEK, &mut skips).ok_or_else(err)?,
            skips,
        })
    }
}

/// A time of day with optional wildcard fields.
#[derive(Clone, Copy)]
pub struct Time {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub hundredths: u8,
    pub skips: DateTimeSkips,
}

impl Time {
    pub fn new(hour: u8, minute: u8, second: u8, hundredths: u8) -> Self {
        Self { hour, minute, second, hundredths, skips: DateTimeSkips::empty() }
    }

    pub fn unspecified() -> Self {
        Self { hour: 0, minute: 0, second: 0, hundredths: 0, skips: DateTimeSkips::TIME }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self, CodecError> {
        let (input, (hour, minute, second, hundredths)) = (u8, u8, u8, u8).parse(input)?;

        let mut skips = DateTimeSkips::empty();
        let hour = field_from_wire(hour, DateTimeSkips::HOUR, &mut skips);
        let minute = field_from_wire(minute, DateTimeSkips::MINUTE, &mut skips);
        let second = field_from_wire(second, DateTimeSkips::SECOND, &mut skips);
        let hundredths = field_from_wire(hundredths, DateTimeSkips::HUNDREDTHS, &mut skips);

        Ok((input, Self { hour, minute, second, hundredths, skips }))
    }

    pub fn encode(&self) -> [u8; 4] {
        [
            field_to_wire(self.hour, DateTimeSkips::HOUR, self.skips),
            field_to_wire(self.minute, DateTimeSkips::MINUTE, self.skips),
            field_to_wire(self.second, DateTimeSkips::SECOND, self.skips),
            field_to_wire(self.hundredths, DateTimeSkips::HUNDREDTHS, self.skips),
        ]
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for Time {}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.skips;
        write!(
            f,
            "{}:{}:{}.{}",
            field_to_text(self.hour, 2, s.contains(DateTimeSkips::HOUR)),
            field_to_text(self.minute, 2, s.contains(DateTimeSkips::MINUTE)),
            field_to_text(self.second, 2, s.contains(DateTimeSkips::SECOND)),
            field_to_text(self.hundredths, 2, s.contains(DateTimeSkips::HUNDREDTHS)),
        )
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time(\"{}\")", self)
    }
}

impl FromStr for Time {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateTimeError(s.to_owned());
        let (hms, hundredths) = s.trim().split_once('.').ok_or_else(err)?;
        let mut parts = hms.split(':');
        let (Some(hour), Some(minute), Some(second), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(err());
        };

        let mut skips = DateTimeSkips::empty();
        Ok(Self {
            hour: field_from_text(hour, DateTimeSkips::HOUR, &mut skips).ok_or_else(err)?,
            minute: field_from_text(minute, DateTimeSkips::MINUTE, &mut skips).ok_or_else(err)?,
            second: field_from_text(second, DateTimeSkips::SECOND, &mut skips).ok_or_else(err)?,
            hundredths: field_from_text(hundredths, DateTimeSkips::HUNDREDTHS, &mut skips)
                .ok_or_else(err)?,
            skips,
        })
    }
}

/// Date, time, deviation from UTC (minutes) and clock status.
///
/// Wildcards of the date and time parts live in `date.skips` and
/// `time.skips`; `skips` carries `DEVIATION` and `STATUS`.
#[derive(Clone, Copy)]
pub struct DateTime {
    pub date: Date,
    pub time: Time,
    pub deviation: i16,
    pub status: ClockStatus,
    pub skips: DateTimeSkips,
}

impl DateTime {
    pub fn new(date: Date, time: Time, deviation: i16, status: ClockStatus) -> Self {
        Self { date, time, deviation, status, skips: DateTimeSkips::empty() }
    }

    /// Every field wildcarded, including deviation and status.
    pub fn unspecified() -> Self {
        Self {
            date: Date::unspecified(),
            time: Time::unspecified(),
            deviation: 0,
            status: ClockStatus::empty(),
            skips: DateTimeSkips::DEVIATION | DateTimeSkips::STATUS,
        }
    }

    /// Union of all wildcard flags of this value.
    pub fn all_skips(&self) -> DateTimeSkips {
        self.date.skips | self.time.skips | self.skips
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self, CodecError> {
        let (input, (date, time, deviation, status)) =
            (Date::parse, Time::parse, be_i16, u8).parse(input)?;

        let mut skips = DateTimeSkips::empty();
        let deviation = if deviation == DEVIATION_NOT_SPECIFIED {
            skips.insert(DateTimeSkips::DEVIATION);
            0
        } else {
            deviation
        };
        let status = if status == NOT_SPECIFIED {
            skips.insert(DateTimeSkips::STATUS);
            ClockStatus::empty()
        } else {
            ClockStatus::from_bits_retain(status)
        };

        Ok((input, Self { date, time, deviation, status, skips }))
    }

    pub fn encode(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[..5].copy_from_slice(&self.date.encode());
        out[5..9].copy_from_slice(&self.time.encode());
        let deviation = if self.skips.contains(DateTimeSkips::DEVIATION) {
            DEVIATION_NOT_SPECIFIED
        } else {
            self.deviation
        };
        out[9..11].copy_from_slice(&deviation.to_be_bytes());
        out[11] = if self.skips.contains(DateTimeSkips::STATUS) { NOT_SPECIFIED } else { self.status.bits() };
        out
    }

    /// The local calendar time, if year, month, day, hour, minute and second
    /// are all specified. Unspecified hundredths count as zero.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let required = DateTimeSkips::YEAR
            | DateTimeSkips::MONTH
            | DateTimeSkips::DAY
            | DateTimeSkips::HOUR
            | DateTimeSkips::MINUTE
            | DateTimeSkips::SECOND;
        if self.all_skips().intersects(required) {
            return None;
        }
        let hundredths = if self.time.skips.contains(DateTimeSkips::HUNDREDTHS) { 0 } else { self.time.hundredths };
        NaiveDate::from_ymd_opt(i32::from(self.date.year), u32::from(self.date.month), u32::from(self.date.day))?
            .and_hms_milli_opt(
                u32::from(self.time.hour),
                u32::from(self.time.minute),
                u32::from(self.time.second),
                u32::from(hundredths) * 10,
            )
    }

    /// Shifts the calendar fields by `seconds`, keeping deviation, status
    /// and the hundredths wildcard. `None` if the value is not a concrete
    /// point in time.
    pub fn checked_add_seconds(&self, seconds: i64) -> Option<Self> {
        let shifted = self.to_naive()?.checked_add_signed(TimeDelta::try_seconds(seconds)?)?;
        Some(self.with_naive(shifted))
    }

    /// Replaces the calendar fields with `naive`, keeping deviation, status
    /// and the hundredths wildcard.
    pub fn with_naive(&self, naive: NaiveDateTime) -> Self {
        let mut time = Time::new(
            naive.hour() as u8,
            naive.minute() as u8,
            naive.second() as u8,
            (naive.nanosecond() / 10_000_000).min(99) as u8,
        );
        time.skips = self.time.skips & DateTimeSkips::HUNDREDTHS;
        Self { date: Date::from_naive(naive.date()), time, ..*self }
    }

    /// The system clock as UTC, deviation 0, status OK.
    pub fn now_utc() -> Self {
        let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        let Some(now) = chrono::DateTime::from_timestamp(elapsed.as_secs() as i64, elapsed.subsec_nanos()) else {
            return Self::unspecified();
        };
        Self { skips: DateTimeSkips::empty(), ..Self::from(now.naive_utc()) }
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl From<NaiveDateTime> for DateTime {
    /// Deviation and status are left unspecified.
    fn from(naive: NaiveDateTime) -> Self {
        Self { time: Time::new(0, 0, 0, 0), ..Self::unspecified() }.with_naive(naive)
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.encode() == other.encode()
    }
}

impl Eq for DateTime {}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deviation = if self.skips.contains(DateTimeSkips::DEVIATION) {
            "*".to_owned()
        } else {
            self.deviation.to_string()
        };
        let status = if self.skips.contains(DateTimeSkips::STATUS) {
            "*".to_owned()
        } else {
            self.status.bits().to_string()
        };
        write!(f, "{} {} {} {}", self.date, self.time, deviation, status)
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime(\"{}\")", self)
    }
}

impl FromStr for DateTime {
    type Err = ParseDateTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDateTimeError(s.to_owned());
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let [ymd, dow, time, rest @ ..] = tokens.as_slice() else {
            return Err(err());
        };

        let mut skips = DateTimeSkips::empty();
        let (deviation, status) = match rest {
            [] => {
                skips = DateTimeSkips::DEVIATION | DateTimeSkips::STATUS;
                (0, ClockStatus::empty())
            }
            [deviation, status] => {
                let deviation = match *deviation {
                    "*" => {
                        skips.insert(DateTimeSkips::DEVIATION);
                        0
                    }
                    text => text.parse::<i16>().map_err(|_| err())?,
                };
                let status = field_from_text::<u8>(status, DateTimeSkips::STATUS, &mut skips).ok_or_else(err)?;
                (deviation, ClockStatus::from_bits_retain(status))
            }
            _ => return Err(err()),
        };

        Ok(Self {
            date: format!("{ymd} {dow}").parse()?,
            time: time.parse()?,
            deviation,
            status,
            skips,
        })
    }
}

#[cfg(feature = "serde")]
impl Serialize for DateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
