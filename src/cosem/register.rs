//! COSEM Interface Class 3: Register
//!
//! A metered value with its scaler and physical unit.
//!
//! ## Attributes
//! - Attribute 1: `logical_name` (inherited)
//! - Attribute 2: `value`
//! - Attribute 3: `scaler_unit`, `Structure { Integer(scaler), Enum(unit) }`
//!
//! ## Methods
//! - Method 1: `reset`, sets the value to zero
//!
//! Writing attribute 2 applies the scaler: a numeric raw value is stored as
//! its logical value `raw × 10^scaler` whenever the scaler is not 1. The raw
//! value is kept as well and is what attribute 2 reads back, so the value
//! encodes with its wire type. Writing attribute 3 rescales the held value.
//!
//! A client reads the scaler before the value, so attribute 3 is listed
//! first by [`CosemObject::attribute_indexes_to_read`].
//!
//! # Example
//! ```
//! use cosem_objects::cosem::register::Register;
//! use cosem_objects::cosem::{CosemObject, InterfaceClass};
//! use cosem_objects::{Data, ObisCode, ScalerUnit, Unit};
//!
//! let mut register = Register::with_logical_name(ObisCode::new(1, 0, 1, 8, 0, 255));
//! register.set_value(3, ScalerUnit::new(-2, Unit::Watt).to_data()).unwrap();
//! register.set_value(2, Data::DoubleLongUnsigned(12345)).unwrap();
//!
//! assert_eq!(register.class_id(), 3);
//! assert_eq!(register.value(), &Data::Float64(123.45));
//! assert_eq!(register.get_value(2, None).unwrap(), Data::DoubleLongUnsigned(12345));
//! ```

use crate::access::DataAccessResult;
use crate::codec::change_type;
use crate::cosem::{AttributeDef, CosemObject, InterfaceClass, MethodDef, ObjectBase};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;
use crate::unit::ScalerUnit;

/// Register object, COSEM interface class 3.
///
/// Reference: Blue Book 4.3.2
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
    base: ObjectBase,
    value: ScaledValue,
    scaler_unit: ScalerUnit,
}

impl Register {
    /// A register holding `raw_value`, scaled by `scaler_unit`.
    pub fn new(logical_name: ObisCode, raw_value: Data, scaler_unit: ScalerUnit) -> Self {
        Self { value: ScaledValue::new(raw_value, &scaler_unit), scaler_unit, ..Self::with_logical_name(logical_name) }
    }

    /// Attribute 2 with the scaler applied.
    pub fn value(&self) -> &Data {
        &self.value.scaled
    }

    /// Attribute 2 as transferred.
    pub fn raw_value(&self) -> &Data {
        &self.value.raw
    }

    pub fn set_raw_value(&mut self, raw: Data) {
        self.value = ScaledValue::new(raw, &self.scaler_unit);
    }

    /// Attribute 3
    pub fn scaler_unit(&self) -> ScalerUnit {
        self.scaler_unit
    }

    pub fn set_scaler_unit(&mut self, scaler_unit: ScalerUnit) {
        self.scaler_unit = scaler_unit;
        self.value.rescale(&scaler_unit);
    }

    /// The logical value as a number, `None` if the value is not numeric.
    pub fn scaled_value(&self) -> Option<f64> {
        self.value.scaled.as_f64()
    }
}

impl Default for Register {
    fn default() -> Self {
        Self { base: ObjectBase::of::<Self>(), value: ScaledValue::default(), scaler_unit: ScalerUnit::default() }
    }
}

/// Value attribute of the register classes: the raw value and the value
/// with the scaler applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ScaledValue {
    pub(crate) raw: Data,
    pub(crate) scaled: Data,
}

impl ScaledValue {
    pub(crate) fn new(raw: Data, scaler_unit: &ScalerUnit) -> Self {
        let mut value = Self { raw, scaled: Data::Null };
        value.rescale(scaler_unit);
        value
    }

    /// Integers are scaled when the scaler is not 1; other values are kept.
    pub(crate) fn rescale(&mut self, scaler_unit: &ScalerUnit) {
        self.scaled = match self.raw.as_f64() {
            Some(raw) if scaler_unit.scaler != 0 && !matches!(self.raw, Data::Enum(_)) => {
                Data::Float64(scaler_unit.apply(raw))
            }
            _ => self.raw.clone(),
        };
    }
}

/// Zero of the same type as `value`, used by the reset methods.
pub(crate) fn zero_like(value: &Data) -> Data {
    match value {
        Data::Null => Data::Null,
        value => change_type(&Data::Unsigned(0), value.data_type()).unwrap_or(Data::DoubleLongUnsigned(0)),
    }
}

/// Register values are simple (non-composite) data.
pub(crate) fn simple_value(value: Data) -> Result<Data, DataAccessResult> {
    if value.data_type().is_composite() { Err(DataAccessResult::TypeUnmatched) } else { Ok(value) }
}

impl InterfaceClass for Register {
    const OBJECT_TYPE: ObjectType = ObjectType::Register;
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
    ];
    const METHODS: &'static [MethodDef<Self>] = &[MethodDef::<Self>::new("Reset", |o, _| {
        o.set_raw_value(zero_like(&o.value.raw));
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
