//! # cosem_objects
//!
//! An in-memory COSEM object model for DLMS metering.
//!
//! The crate holds the objects a DLMS engine serves or reads: registers,
//! clocks, load profiles and communication setups, each addressed by its
//! OBIS logical name and exposing numbered attributes and methods. It does
//! not speak the protocol itself; a session layer drives it through
//! [`cosem::CosemObject`].
//!
//! - [`data`] and [`codec`]: the DLMS value grammar and its A-XDR encoding
//! - [`cosem`]: the object base, access rights and the interface classes
//! - [`collection`]: an ordered registry of objects with lookup and capture
//! - [`xml`]: saving and loading a collection as XML
//!
//! ```
//! use cosem_objects::collection::ObjectCollection;
//! use cosem_objects::cosem::CosemObject;
//! use cosem_objects::cosem::register::Register;
//! use cosem_objects::{Data, ObisCode, ScalerUnit, Unit};
//!
//! let ln = ObisCode::new(1, 0, 1, 8, 0, 255);
//! let mut objects = ObjectCollection::new();
//! objects.add(Register::new(ln, Data::Null, ScalerUnit::new(-2, Unit::WattHour)));
//!
//! let register = objects.find_by_ln_mut(None, &ln).unwrap();
//! register.update_value(2, Data::DoubleLongUnsigned(12345)).unwrap();
//!
//! assert_eq!(objects.find::<Register>(&ln).unwrap().scaled_value(), Some(123.45));
//! ```
//!
//! ## Features
//!
//! - `serde`: derives `Serialize` for value types.

pub mod access;
pub mod codec;
pub mod collection;
pub mod cosem;
pub mod data;
pub mod date_time;
pub mod error;
pub mod obis_code;
pub mod object_type;
pub mod unit;
pub mod xml;

pub use access::{ActionResult, DataAccessResult, SelectiveAccess};
pub use collection::ObjectCollection;
pub use cosem::{AttributeAccess, CosemObject, InterfaceClass, MethodAccess};
pub use data::{Data, DataType};
pub use date_time::{ClockStatus, Date, DateTime, DateTimeSkips, Time};
pub use error::{CodecError, Error, Result, XmlError};
pub use obis_code::ObisCode;
pub use object_type::ObjectType;
pub use unit::{ScalerUnit, Unit};
pub use xml::XmlSettings;

#[cfg(test)]
mod lib_tests;
