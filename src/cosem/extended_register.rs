//! COSEM Interface Class 4: Extended Register
//!
//! A [`Register`](super::register::Register) extended with a status and the
//! time the value was captured.
//!
//! ## Attributes
//! - Attribute 1: `logical_name` (inherited)
//! - Attribute 2: `value`, scaled as in a [`Register`](super::register::Register)
//! - Attribute 3: `scaler_unit`
//! - Attribute 4: `status`, any simple type chosen by the meter
//! - Attribute 5: `capture_time`, a 12-byte octet-string holding a date-time
//!
//! ## Methods
//! - Method 1: `reset`, zeroes the value and stamps the capture time

use crate::cosem::register::{ScaledValue, simple_value, zero_like};
use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, date_time_data, date_time_value};
use crate::data::{Data, DataType};
use crate::date_time::DateTime;
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;
use crate::unit::ScalerUnit;

/// Extended Register object, COSEM interface class 4.
///
/// Reference: Blue Book 4.3.3
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedRegister {
    base: ObjectBase,
    value: ScaledValue,
    scaler_unit: ScalerUnit,
    /// Attribute 4
    pub status: Data,
    /// Attribute 5
    pub capture_time: DateTime,
}

impl ExtendedRegister {
    pub fn new(logical_name: ObisCode, raw_value: Data, scaler_unit: ScalerUnit) -> Self {
        Self { value: ScaledValue::new(raw_value, &scaler_unit), scaler_unit, ..Self::with_logical_name(logical_name) }
    }

    pub fn value(&self) -> &Data {
        &self.value.scaled
    }

    pub fn raw_value(&self) -> &Data {
        &self.value.raw
    }

    pub fn set_raw_value(&mut self, raw: Data) {
        self.value = ScaledValue::new(raw, &self.scaler_unit);
    }

    pub fn scaler_unit(&self) -> ScalerUnit {
        self.scaler_unit
    }

    pub fn set_scaler_unit(&mut self, scaler_unit: ScalerUnit) {
        self.scaler_unit = scaler_unit;
        self.value.rescale(&scaler_unit);
    }

    pub fn scaled_value(&self) -> Option<f64> {
        self.value.scaled.as_f64()
    }
}

impl Default for ExtendedRegister {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            value: ScaledValue::default(),
            scaler_unit: ScalerUnit::default(),
            status: Data::Null,
            capture_time: DateTime::unspecified(),
        }
    }
}

impl InterfaceClass for ExtendedRegister {
    const OBJECT_TYPE: ObjectType = ObjectType::ExtendedRegister;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "Value",
            DataType::Null,
            |o, _| Ok(o.value.raw.clone()),
            |o, v| {
                o.set_raw_value(simple_value(v)?);
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "ScalerUnit",
            DataType::Structure,
            |o, _| Ok(o.scaler_unit.to_data()),
            |o, v| {
                o.set_scaler_unit(ScalerUnit::from_data(&v)?);
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "Status",
            DataType::Null,
            |o, _| Ok(o.status.clone()),
            |o, v| {
                o.status = simple_value(v)?;
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "CaptureTime",
            DataType::OctetString,
            |o, _| Ok(date_time_data(&o.capture_time)),
            |o, v| {
                o.capture_time = date_time_value(&v)?;
                Ok(())
            },
        )
        .ui_type(DataType::DateTime)
        .volatile(),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[MethodDef::<Self>::new("Reset", |o, _| {
        o.set_raw_value(zero_like(&o.value.raw));
        o.capture_time = DateTime::now_utc();
        Ok(None)
    })];
    const READ_FIRST: &'static [u8] = &[3];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
