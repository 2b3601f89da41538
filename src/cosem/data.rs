//! COSEM Interface Class 1: Data
//!
//! The simplest interface class: a single value of any DLMS type, used for
//! identifiers, parameters and configuration values.
//!
//! ## Attributes
//! - Attribute 1: `logical_name` (inherited)
//! - Attribute 2: `value` (any DLMS type)
//!
//! # Example
//! ```
//! use cosem_objects::cosem::data::DataObject;
//! use cosem_objects::cosem::CosemObject;
//! use cosem_objects::{Data, DataType, ObisCode};
//!
//! let serial = DataObject::new(ObisCode::new(0, 0, 96, 1, 0, 255), Data::VisibleString("METER-1".into()));
//!
//! assert_eq!(serial.class_id(), 1);
//! assert_eq!(serial.data_type(2).unwrap(), DataType::VisibleString);
//! ```

use crate::cosem::{AttributeDef, InterfaceClass, ObjectBase};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// Data object, COSEM interface class 1.
///
/// Reference: Blue Book 4.3.1
#[derive(Debug, Clone, PartialEq)]
pub struct DataObject {
    base: ObjectBase,
    /// Attribute 2. Its type is whatever the meter reports.
    pub value: Data,
}

impl DataObject {
    pub fn new(logical_name: ObisCode, value: Data) -> Self {
        Self { value, ..Self::with_logical_name(logical_name) }
    }
}

impl Default for DataObject {
    fn default() -> Self {
        Self { base: ObjectBase::of::<Self>(), value: Data::Null }
    }
}

impl InterfaceClass for DataObject {
    const OBJECT_TYPE: ObjectType = ObjectType::Data;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[AttributeDef::<Self>::new(
        "Value",
        DataType::Null,
        |o, _| Ok(o.value.clone()),
        |o, v| {
            o.value = v;
            Ok(())
        },
    )
    .volatile()];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
