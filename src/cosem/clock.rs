//! Clock (COSEM Interface Class 8)
//!
//! The device's notion of local time, with time zone and daylight saving
//! configuration, plus methods to synchronize it.
//!
//! # Attributes
//! 1. `logical_name` (inherited)
//! 2. `time`, octet-string(12) holding a date-time
//! 3. `time_zone`, minutes from UTC
//! 4. `status`, [`ClockStatus`] bits
//! 5. `daylight_savings_begin`
//! 6. `daylight_savings_end`
//! 7. `daylight_savings_deviation`, minutes
//! 8. `daylight_savings_enabled`
//! 9. `clock_base`
//!
//! # Methods
//! 1. `adjust_to_quarter`
//! 2. `adjust_to_measuring_period`
//! 3. `adjust_to_minute`
//! 4. `adjust_to_preset_time`
//! 5. `preset_adjusting_time`
//! 6. `shift_time`
//!
//! The adjusting methods need a concrete time: a clock whose time has
//! wildcards answers `OtherReason`.
//!
//! # Example
//! ```
//! use cosem_objects::cosem::clock::Clock;
//! use cosem_objects::cosem::CosemObject;
//! use cosem_objects::{ClockStatus, Data, Date, DateTime, ObisCode, Time};
//!
//! let mut clock = Clock::new(ObisCode::new(0, 0, 1, 0, 0, 255));
//! clock.time = DateTime::new(Date::new(2024, 2, 28), Time::new(23, 59, 0, 0), 60, ClockStatus::empty());
//!
//! clock.invoke(6, Some(Data::Long(120))).unwrap();
//! assert_eq!(clock.time.date, Date::new(2024, 2, 29));
//! ```

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use derive_try_from_primitive::TryFromPrimitive;

use crate::access::{ActionResult, DataAccessResult};
use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, date_time_data, date_time_value, integer};
use crate::data::{Data, DataType};
use crate::date_time::{ClockStatus, DateTime};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// Time source of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ClockBase {
    #[default]
    NotDefined = 0,
    /// Internal crystal oscillator
    Crystal = 1,
    Mains50Hz = 2,
    Mains60Hz = 3,
    Gps = 4,
    /// Radio controlled (DCF77, MSF, WWVB)
    Radio = 5,
}

/// Clock interface class (Class ID 8, Version 0)
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    base: ObjectBase,
    /// Attribute 2
    pub time: DateTime,
    /// Attribute 3: offset from UTC in minutes, -720..=720.
    pub time_zone: i16,
    /// Attribute 4
    pub status: ClockStatus,
    /// Attribute 5
    pub daylight_savings_begin: DateTime,
    /// Attribute 6
    pub daylight_savings_end: DateTime,
    /// Attribute 7: DST shift in minutes.
    pub daylight_savings_deviation: i8,
    /// Attribute 8
    pub daylight_savings_enabled: bool,
    /// Attribute 9
    pub clock_base: ClockBase,
    /// Target of `adjust_to_preset_time`, set by `preset_adjusting_time`.
    pub preset_time: Option<DateTime>,
}

impl Default for Clock {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            time: DateTime::unspecified(),
            time_zone: 0,
            status: ClockStatus::empty(),
            daylight_savings_begin: DateTime::unspecified(),
            daylight_savings_end: DateTime::unspecified(),
            daylight_savings_deviation: 0,
            daylight_savings_enabled: false,
            clock_base: ClockBase::NotDefined,
            preset_time: None,
        }
    }
}

impl Clock {
    pub fn new(logical_name: ObisCode) -> Self {
        Self::with_logical_name(logical_name)
    }

    fn naive_time(&self) -> Result<NaiveDateTime, ActionResult> {
        self.time.to_naive().ok_or(ActionResult::OtherReason)
    }

    /// Rounds to the nearest quarter of an hour: minutes 0-7 go to :00,
    /// 8-22 to :15, 23-37 to :30, 38-52 to :45 and 53-59 to the next hour.
    pub fn adjust_to_quarter(&mut self) -> Result<(), ActionResult> {
        let now = self.naive_time()?;
        let quarter = (i64::from(now.minute()) + 7) / 15 * 15;
        let hour = now.with_minute(0).and_then(|t| t.with_second(0)).and_then(|t| t.with_nanosecond(0));
        let adjusted = hour
            .and_then(|t| t.checked_add_signed(TimeDelta::minutes(quarter)))
            .ok_or(ActionResult::OtherReason)?;
        self.time = self.time.with_naive(adjusted);
        Ok(())
    }

    /// Same as [`Clock::adjust_to_quarter`]; the measuring period is a
    /// quarter of an hour.
    pub fn adjust_to_measuring_period(&mut self) -> Result<(), ActionResult> {
        self.adjust_to_quarter()
    }

    /// Rounds to the minute: above 30 seconds goes to the next one.
    pub fn adjust_to_minute(&mut self) -> Result<(), ActionResult> {
        let now = self.naive_time()?;
        let carry = if now.second() > 30 { 1 } else { 0 };
        let adjusted = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .and_then(|t| t.checked_add_signed(TimeDelta::minutes(carry)))
            .ok_or(ActionResult::OtherReason)?;
        self.time = self.time.with_naive(adjusted);
        Ok(())
    }

    /// Sets the time to `preset`, or to the time stored by
    /// [`Clock::preset_adjusting_time`].
    pub fn adjust_to_preset_time(&mut self, preset: Option<DateTime>) -> Result<(), ActionResult> {
        self.time = preset.or(self.preset_time).ok_or(ActionResult::OtherReason)?;
        Ok(())
    }

    pub fn preset_adjusting_time(&mut self, preset: DateTime) {
        self.preset_time = Some(preset);
    }

    /// Shifts the time by -900..=900 seconds, across day and month
    /// boundaries.
    pub fn shift_time(&mut self, seconds: i16) -> Result<(), ActionResult> {
        if !(-900..=900).contains(&seconds) {
            return Err(ActionResult::OtherReason);
        }
        self.time = self.time.checked_add_seconds(i64::from(seconds)).ok_or(ActionResult::OtherReason)?;
        Ok(())
    }
}

/// Method parameter holding a date-time, either bare or as the first element
/// of a `Structure { preset_time, validity_start, validity_end }`.
fn preset_parameter(parameters: Option<Data>) -> Result<Option<DateTime>, ActionResult> {
    match parameters {
        None | Some(Data::Integer(0)) => Ok(None),
        Some(Data::Structure(items)) => match items.first() {
            Some(first) => Ok(Some(date_time_value(first)?)),
            None => Err(ActionResult::TypeUnmatched),
        },
        Some(value) => Ok(Some(date_time_value(&value)?)),
    }
}

impl InterfaceClass for Clock {
    const OBJECT_TYPE: ObjectType = ObjectType::Clock;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "Time",
            DataType::OctetString,
            |o, _| Ok(date_time_data(&o.time)),
            |o, v| {
                o.time = date_time_value(&v)?;
                Ok(())
            },
        )
        .ui_type(DataType::DateTime)
        .volatile(),
        AttributeDef::<Self>::new(
            "TimeZone",
            DataType::Long,
            |o, _| Ok(Data::Long(o.time_zone)),
            |o, v| {
                let time_zone: i16 = integer(&v)?;
                if !(-720..=720).contains(&time_zone) {
                    return Err(DataAccessResult::OtherReason);
                }
                o.time_zone = time_zone;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "Status",
            DataType::Unsigned,
            |o, _| Ok(Data::Unsigned(o.status.bits())),
            |o, v| {
                o.status = ClockStatus::from_bits_retain(integer(&v)?);
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "Begin",
            DataType::OctetString,
            |o, _| Ok(date_time_data(&o.daylight_savings_begin)),
            |o, v| {
                o.daylight_savings_begin = date_time_value(&v)?;
                Ok(())
            },
        )
        .ui_type(DataType::DateTime),
        AttributeDef::<Self>::new(
            "End",
            DataType::OctetString,
            |o, _| Ok(date_time_data(&o.daylight_savings_end)),
            |o, v| {
                o.daylight_savings_end = date_time_value(&v)?;
                Ok(())
            },
        )
        .ui_type(DataType::DateTime),
        AttributeDef::<Self>::new(
            "Deviation",
            DataType::Integer,
            |o, _| Ok(Data::Integer(o.daylight_savings_deviation)),
            |o, v| {
                o.daylight_savings_deviation = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "Enabled",
            DataType::Boolean,
            |o, _| Ok(Data::Boolean(o.daylight_savings_enabled)),
            |o, v| {
                o.daylight_savings_enabled = v.as_bool().ok_or(DataAccessResult::TypeUnmatched)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "ClockBase",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.clock_base as u8)),
            |o, v| {
                o.clock_base = ClockBase::try_from(integer::<u8>(&v)?).map_err(|_| DataAccessResult::OtherReason)?;
                Ok(())
            },
        ),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[
        MethodDef::<Self>::new("AdjustToQuarter", |o, _| o.adjust_to_quarter().map(|()| None)),
        MethodDef::<Self>::new("AdjustToMeasuringPeriod", |o, _| o.adjust_to_measuring_period().map(|()| None)),
        MethodDef::<Self>::new("AdjustToMinute", |o, _| o.adjust_to_minute().map(|()| None)),
        MethodDef::<Self>::new("AdjustToPresetTime", |o, p| {
            let preset = preset_parameter(p)?;
            o.adjust_to_preset_time(preset).map(|()| None)
        }),
        MethodDef::<Self>::new("PresetAdjustingTime", |o, p| {
            let preset = preset_parameter(p)?.ok_or(ActionResult::TypeUnmatched)?;
            o.preset_adjusting_time(preset);
            Ok(None)
        }),
        MethodDef::<Self>::new("ShiftTime", |o, p| {
            let seconds: i16 = integer(p.as_ref().ok_or(ActionResult::TypeUnmatched)?)?;
            o.shift_time(seconds).map(|()| None)
        }),
    ];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
