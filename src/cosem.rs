//! COSEM Object Model
//!
//! Every interface class is a plain struct holding an [`ObjectBase`] plus its
//! class-specific fields, and implements [`InterfaceClass`]: a pair of static
//! tables mapping attribute and method indexes to typed accessors. A blanket
//! implementation turns those tables into the object-safe [`CosemObject`]
//! contract a DLMS engine drives:
//!
//! - attribute and method counts, per-attribute data types
//! - `get_value` / `set_value` / `update_value` / `invoke` with range and
//!   access checks
//! - `attribute_indexes_to_read`, the read plan of a client
//! - XML `save` / `load` hooks
//!
//! Attribute 1 (logical name) is handled once, here, for every class.
//!
//! # Example
//!
//! ```
//! use cosem_objects::cosem::{CosemObject, InterfaceClass, register::Register};
//! use cosem_objects::{Data, ObisCode};
//!
//! let mut register = Register::with_logical_name(ObisCode::new(1, 0, 1, 8, 0, 255));
//! register.update_value(2, Data::DoubleLongUnsigned(12345)).unwrap();
//!
//! assert_eq!(register.class_id(), 3);
//! assert_eq!(register.attribute_count(), 3);
//! assert_eq!(register.get_value(2, None).unwrap(), Data::DoubleLongUnsigned(12345));
//! ```

use core::any::Any;
use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, trace};

use crate::access::{ActionResult, DataAccessResult, SelectiveAccess};
use crate::codec::change_type;
use crate::data::{Data, DataType};
use crate::date_time::DateTime;
use crate::error::{Error, Result, XmlError};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;
use crate::xml::{XmlNode, XmlWriter, read_value};

pub mod clock;
pub mod data;
pub mod disconnect_control;
pub mod extended_register;
pub mod g3_plc_mac_layer_counters;
pub mod iec_hdlc_setup;
pub mod profile_generic;
pub mod register;
pub mod security_setup;
pub mod tcp_udp_setup;

pub use profile_generic::{CaptureObject, ProfileGeneric, SortMethod};

/// Access rights for COSEM attributes.
///
/// The authenticated flags grant the same access as the plain ones; the
/// session layer is responsible for checking that the association is
/// authenticated before it calls into the object.
///
/// ```
/// use cosem_objects::cosem::AttributeAccess;
///
/// let rw = AttributeAccess::READ_WRITE;
/// assert!(rw.is_readable() && rw.is_writable());
///
/// let auth_read = AttributeAccess::AUTHENTICATED_READ;
/// assert!(auth_read.is_readable());
/// assert!(!auth_read.is_writable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeAccess(u8);

impl AttributeAccess {
    pub const NO_ACCESS: AttributeAccess = AttributeAccess(0x00);
    pub const READ_ONLY: AttributeAccess = AttributeAccess(0x01);
    pub const WRITE_ONLY: AttributeAccess = AttributeAccess(0x02);
    pub const READ_WRITE: AttributeAccess = AttributeAccess(0x03);
    pub const AUTHENTICATED_READ: AttributeAccess = AttributeAccess(0x04);
    pub const AUTHENTICATED_WRITE: AttributeAccess = AttributeAccess(0x08);
    pub const AUTHENTICATED_READ_WRITE: AttributeAccess = AttributeAccess(0x0C);

    pub const fn from_bits(bits: u8) -> Self {
        AttributeAccess(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn contains(&self, other: AttributeAccess) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn intersects(&self, other: AttributeAccess) -> bool {
        (self.0 & other.0) != 0
    }

    pub const fn is_readable(&self) -> bool {
        self.intersects(AttributeAccess(Self::READ_ONLY.0 | Self::AUTHENTICATED_READ.0))
    }

    pub const fn is_writable(&self) -> bool {
        self.intersects(AttributeAccess(Self::WRITE_ONLY.0 | Self::AUTHENTICATED_WRITE.0))
    }
}

impl core::ops::BitOr for AttributeAccess {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        AttributeAccess(self.0 | rhs.0)
    }
}

/// Access rights for COSEM methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MethodAccess(u8);

impl MethodAccess {
    pub const NO_ACCESS: MethodAccess = MethodAccess(0x00);
    pub const ACCESS: MethodAccess = MethodAccess(0x01);
    pub const AUTHENTICATED_ACCESS: MethodAccess = MethodAccess(0x02);

    pub const fn from_bits(bits: u8) -> Self {
        MethodAccess(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_accessible(&self) -> bool {
        self.0 & (Self::ACCESS.0 | Self::AUTHENTICATED_ACCESS.0) != 0
    }

    pub const fn requires_authentication(&self) -> bool {
        self.0 == Self::AUTHENTICATED_ACCESS.0
    }
}

impl core::ops::BitOr for MethodAccess {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        MethodAccess(self.0 | rhs.0)
    }
}

/// Weak handle to the collection that owns an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        CollectionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Foreign-key reference to another object, resolved against a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ObjectReference {
    pub object_type: ObjectType,
    pub logical_name: ObisCode,
}

impl ObjectReference {
    pub const fn new(object_type: ObjectType, logical_name: ObisCode) -> Self {
        Self { object_type, logical_name }
    }
}

impl fmt::Display for ObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.object_type, self.logical_name)
    }
}

/// State shared by every COSEM object.
///
/// The "already read" flags and the access vectors are sized to the class's
/// attribute and method counts when the base is created with
/// [`ObjectBase::of`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBase {
    /// Attribute 1. `None` until set or read from a meter.
    pub logical_name: Option<ObisCode>,
    /// Short name address, 0 when unused.
    pub short_name: u16,
    pub description: Option<String>,
    parent: Option<CollectionId>,
    read_attributes: Vec<bool>,
    attribute_access: Vec<AttributeAccess>,
    method_access: Vec<MethodAccess>,
}

impl ObjectBase {
    pub fn of<T: InterfaceClass>() -> Self {
        Self {
            logical_name: None,
            short_name: 0,
            description: None,
            parent: None,
            read_attributes: vec![false; T::ATTRIBUTES.len() + 1],
            attribute_access: vec![AttributeAccess::READ_WRITE; T::ATTRIBUTES.len() + 1],
            method_access: vec![MethodAccess::ACCESS; T::METHODS.len()],
        }
    }

    pub fn parent(&self) -> Option<CollectionId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<CollectionId>) {
        self.parent = parent;
    }

    /// Whether attribute `index` has been read from a meter at least once.
    pub fn is_read(&self, index: u8) -> bool {
        slot(index).and_then(|i| self.read_attributes.get(i)).copied().unwrap_or(false)
    }

    fn mark_read(&mut self, index: u8) {
        if let Some(flag) = slot(index).and_then(|i| self.read_attributes.get_mut(i)) {
            *flag = true;
        }
    }

    pub fn attribute_access(&self, index: u8) -> AttributeAccess {
        slot(index).and_then(|i| self.attribute_access.get(i)).copied().unwrap_or(AttributeAccess::NO_ACCESS)
    }

    pub fn set_attribute_access(&mut self, index: u8, access: AttributeAccess) -> Result<()> {
        let entry = slot(index)
            .and_then(|i| self.attribute_access.get_mut(i))
            .ok_or(Error::InvalidAttributeIndex(index))?;
        *entry = access;
        Ok(())
    }

    pub fn method_access(&self, index: u8) -> MethodAccess {
        slot(index).and_then(|i| self.method_access.get(i)).copied().unwrap_or(MethodAccess::NO_ACCESS)
    }

    pub fn set_method_access(&mut self, index: u8, access: MethodAccess) -> Result<()> {
        let entry = slot(index)
            .and_then(|i| self.method_access.get_mut(i))
            .ok_or(Error::InvalidMethodIndex(index))?;
        *entry = access;
        Ok(())
    }

    pub fn can_read(&self, index: u8) -> bool {
        self.attribute_access(index).is_readable()
    }

    pub fn can_write(&self, index: u8) -> bool {
        self.attribute_access(index).is_writable()
    }
}

fn slot(index: u8) -> Option<usize> {
    usize::from(index).checked_sub(1)
}

/// Whether an attribute needs to be read only once or on every read cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Configuration data; read once, then served from memory.
    Static,
    /// Measurement data; read whenever readable.
    Volatile,
}

pub type Getter<T> = fn(&T, Option<&SelectiveAccess>) -> core::result::Result<Data, DataAccessResult>;
pub type Setter<T> = fn(&mut T, Data) -> core::result::Result<(), DataAccessResult>;
pub type Handler<T> = fn(&mut T, Option<Data>) -> core::result::Result<Option<Data>, ActionResult>;

/// One row of a class's attribute table.
pub struct AttributeDef<T> {
    /// Element name used by XML persistence.
    pub name: &'static str,
    /// Declared type; `Null` means the type of the value held at run time.
    pub data_type: DataType,
    /// Reinterpretation of an octet-string (date, time, date-time).
    pub ui_type: Option<DataType>,
    pub kind: AttributeKind,
    pub get: Getter<T>,
    pub set: Setter<T>,
}

impl<T> AttributeDef<T> {
    pub const fn new(name: &'static str, data_type: DataType, get: Getter<T>, set: Setter<T>) -> Self {
        Self { name, data_type, ui_type: None, kind: AttributeKind::Static, get, set }
    }

    pub const fn volatile(self) -> Self {
        Self { kind: AttributeKind::Volatile, ..self }
    }

    pub const fn ui_type(self, ui_type: DataType) -> Self {
        Self { ui_type: Some(ui_type), ..self }
    }
}

/// One row of a class's method table.
pub struct MethodDef<T> {
    pub name: &'static str,
    pub invoke: Handler<T>,
}

impl<T> MethodDef<T> {
    pub const fn new(name: &'static str, invoke: Handler<T>) -> Self {
        Self { name, invoke }
    }
}

/// Static description of a COSEM interface class.
///
/// `ATTRIBUTES` lists attributes 2..=n in index order, `METHODS` lists
/// methods 1..=m. `READ_FIRST` names attributes a client must read before
/// the others (for example a register's scaler before its value).
pub trait InterfaceClass: Default + fmt::Debug + 'static {
    const OBJECT_TYPE: ObjectType;
    const VERSION: u8 = 0;
    const ATTRIBUTES: &'static [AttributeDef<Self>];
    const METHODS: &'static [MethodDef<Self>] = &[];
    const READ_FIRST: &'static [u8] = &[];

    fn object_base(&self) -> &ObjectBase;
    fn object_base_mut(&mut self) -> &mut ObjectBase;

    /// A default instance with the given logical name.
    fn with_logical_name(logical_name: ObisCode) -> Self {
        let mut object = Self::default();
        object.object_base_mut().logical_name = Some(logical_name);
        object
    }
}

/// The uniform access surface of every COSEM object.
///
/// Indexes are 1-based. An index outside the class's declared range is a
/// local defect and fails with [`Error::InvalidAttributeIndex`] (or
/// [`Error::InvalidMethodIndex`] for the metadata queries). A refusal the
/// remote peer must see is an [`Error::DataAccess`] or [`Error::Action`]
/// carrying the protocol result code.
pub trait CosemObject: fmt::Debug {
    fn object_type(&self) -> ObjectType;

    fn class_id(&self) -> u16 {
        self.object_type().class_id()
    }

    fn version(&self) -> u8;

    fn base(&self) -> &ObjectBase;

    fn base_mut(&mut self) -> &mut ObjectBase;

    fn logical_name(&self) -> Option<ObisCode> {
        self.base().logical_name
    }

    fn short_name(&self) -> u16 {
        self.base().short_name
    }

    /// Number of attributes, logical name included.
    fn attribute_count(&self) -> u8;

    fn method_count(&self) -> u8;

    fn attribute_name(&self, index: u8) -> Result<&'static str>;

    fn method_name(&self, index: u8) -> Result<&'static str>;

    /// DLMS type of attribute `index`. Attributes declared as `Null` report
    /// the type of the value they currently hold.
    fn data_type(&self, index: u8) -> Result<DataType>;

    fn ui_type(&self, index: u8) -> Result<Option<DataType>>;

    fn kind(&self, index: u8) -> Result<AttributeKind>;

    /// Server-side GET. Fails with `DataAccess(ReadWriteDenied)` when the
    /// attribute is not readable.
    fn get_value(&self, index: u8, selector: Option<&SelectiveAccess>) -> Result<Data>;

    /// Server-side SET. Fails with `DataAccess(ReadWriteDenied)` when the
    /// attribute is not writable.
    fn set_value(&mut self, index: u8, value: Data) -> Result<()>;

    /// Stores a value a client has read from a meter. Access rights do not
    /// apply; the attribute is marked as read.
    fn update_value(&mut self, index: u8, value: Data) -> Result<()>;

    /// ACTION. An out-of-range index or a denied method fails with
    /// `Action(ReadWriteDenied)`.
    fn invoke(&mut self, index: u8, parameters: Option<Data>) -> Result<Option<Data>>;

    /// Attributes a client still has to read, in read order.
    fn attribute_indexes_to_read(&self, all: bool) -> Vec<u8>;

    /// Writes every attribute as a typed element.
    fn save(&self, writer: &mut XmlWriter<'_>) -> core::result::Result<(), XmlError>;

    /// Loads attributes from the children of an `Object` element. Missing
    /// elements keep their current value.
    fn load(&mut self, node: &XmlNode) -> core::result::Result<(), XmlError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn CosemObject + 'a {
    pub fn downcast_ref<T: InterfaceClass>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: InterfaceClass>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// The object's identity as a foreign-key reference.
    pub fn reference(&self) -> Option<ObjectReference> {
        self.logical_name().map(|ln| ObjectReference::new(self.object_type(), ln))
    }
}

fn attribute_def<T: InterfaceClass>(index: u8) -> Result<&'static AttributeDef<T>> {
    usize::from(index)
        .checked_sub(2)
        .and_then(|i| T::ATTRIBUTES.get(i))
        .ok_or(Error::InvalidAttributeIndex(index))
}

fn method_def<T: InterfaceClass>(index: u8) -> Option<&'static MethodDef<T>> {
    usize::from(index).checked_sub(1).and_then(|i| T::METHODS.get(i))
}

fn logical_name_data(base: &ObjectBase) -> Data {
    Data::OctetString(base.logical_name.map(|ln| ln.encode()).unwrap_or_default().to_vec())
}

fn read_attribute<T: InterfaceClass>(object: &T, index: u8, selector: Option<&SelectiveAccess>) -> Result<Data> {
    if index == 1 {
        return Ok(logical_name_data(object.object_base()));
    }
    let def = attribute_def::<T>(index)?;
    Ok((def.get)(object, selector)?)
}

fn store_attribute<T: InterfaceClass>(object: &mut T, index: u8, value: Data) -> Result<()> {
    if index != 1 {
        let def = attribute_def::<T>(index)?;
        return Ok((def.set)(object, value)?);
    }
    let ln = value.as_bytes().and_then(ObisCode::from_bytes).ok_or(DataAccessResult::TypeUnmatched)?;
    let base = object.object_base_mut();
    // a registered object keeps its logical name
    if base.parent.is_some() && base.logical_name.is_some_and(|current| current != ln) {
        return Err(DataAccessResult::ReadWriteDenied.into());
    }
    base.logical_name = Some(ln);
    Ok(())
}

impl<T: InterfaceClass> CosemObject for T {
    fn object_type(&self) -> ObjectType {
        T::OBJECT_TYPE
    }

    fn version(&self) -> u8 {
        T::VERSION
    }

    fn base(&self) -> &ObjectBase {
        self.object_base()
    }

    fn base_mut(&mut self) -> &mut ObjectBase {
        self.object_base_mut()
    }

    fn attribute_count(&self) -> u8 {
        1 + T::ATTRIBUTES.len() as u8
    }

    fn method_count(&self) -> u8 {
        T::METHODS.len() as u8
    }

    fn attribute_name(&self, index: u8) -> Result<&'static str> {
        match index {
            1 => Ok("LN"),
            _ => attribute_def::<T>(index).map(|def| def.name),
        }
    }

    fn method_name(&self, index: u8) -> Result<&'static str> {
        method_def::<T>(index).map(|def| def.name).ok_or(Error::InvalidMethodIndex(index))
    }

    fn data_type(&self, index: u8) -> Result<DataType> {
        if index == 1 {
            return Ok(DataType::OctetString);
        }
        let def = attribute_def::<T>(index)?;
        if def.data_type != DataType::Null {
            return Ok(def.data_type);
        }
        Ok((def.get)(self, None).map(|value| value.data_type()).unwrap_or(DataType::Null))
    }

    fn ui_type(&self, index: u8) -> Result<Option<DataType>> {
        match index {
            1 => Ok(None),
            _ => attribute_def::<T>(index).map(|def| def.ui_type),
        }
    }

    fn kind(&self, index: u8) -> Result<AttributeKind> {
        match index {
            1 => Ok(AttributeKind::Static),
            _ => attribute_def::<T>(index).map(|def| def.kind),
        }
    }

    fn get_value(&self, index: u8, selector: Option<&SelectiveAccess>) -> Result<Data> {
        if index == 0 || index > self.attribute_count() {
            return Err(Error::InvalidAttributeIndex(index));
        }
        if !self.object_base().can_read(index) {
            debug!("{} {:?}: read of attribute {index} denied", T::OBJECT_TYPE, self.logical_name());
            return Err(DataAccessResult::ReadWriteDenied.into());
        }
        read_attribute(self, index, selector)
    }

    fn set_value(&mut self, index: u8, value: Data) -> Result<()> {
        if index == 0 || index > self.attribute_count() {
            return Err(Error::InvalidAttributeIndex(index));
        }
        if !self.object_base().can_write(index) {
            debug!("{} {:?}: write of attribute {index} denied", T::OBJECT_TYPE, self.logical_name());
            return Err(DataAccessResult::ReadWriteDenied.into());
        }
        store_attribute(self, index, value)
    }

    fn update_value(&mut self, index: u8, value: Data) -> Result<()> {
        store_attribute(self, index, value)?;
        self.object_base_mut().mark_read(index);
        Ok(())
    }

    fn invoke(&mut self, index: u8, parameters: Option<Data>) -> Result<Option<Data>> {
        let Some(def) = method_def::<T>(index) else {
            debug!("{}: method {index} is not defined", T::OBJECT_TYPE);
            return Err(ActionResult::ReadWriteDenied.into());
        };
        if !self.object_base().method_access(index).is_accessible() {
            debug!("{} {:?}: method {index} denied", T::OBJECT_TYPE, self.logical_name());
            return Err(ActionResult::ReadWriteDenied.into());
        }
        Ok((def.invoke)(self, parameters)?)
    }

    fn attribute_indexes_to_read(&self, all: bool) -> Vec<u8> {
        let base = self.object_base();
        let wanted = |index: u8| match attribute_def::<T>(index).map(|def| def.kind) {
            Ok(AttributeKind::Static) => all || !base.is_read(index),
            Ok(AttributeKind::Volatile) => all || base.can_read(index),
            Err(_) => false,
        };

        let mut indexes = Vec::with_capacity(usize::from(self.attribute_count()));
        if all || base.logical_name.is_none() {
            indexes.push(1);
        }
        indexes.extend(T::READ_FIRST.iter().copied().filter(|i| wanted(*i)));
        indexes.extend((2..=self.attribute_count()).filter(|i| !T::READ_FIRST.contains(i) && wanted(*i)));
        indexes
    }

    fn save(&self, writer: &mut XmlWriter<'_>) -> core::result::Result<(), XmlError> {
        trace!("saving {} {:?}", T::OBJECT_TYPE, self.logical_name());
        let defaults = writer.settings().skip_defaults.then(T::default);
        for def in T::ATTRIBUTES {
            let Ok(value) = (def.get)(self, None) else {
                continue;
            };
            if let Some(defaults) = &defaults {
                if (def.get)(defaults, None).is_ok_and(|default| default == value) {
                    continue;
                }
            }
            writer.write_value(def.name, &value, def.ui_type)?;
        }
        Ok(())
    }

    fn load(&mut self, node: &XmlNode) -> core::result::Result<(), XmlError> {
        trace!("loading {} {:?}", T::OBJECT_TYPE, self.logical_name());
        for def in T::ATTRIBUTES {
            let Some(element) = node.child(def.name) else {
                continue;
            };
            let mut value = read_value(element)?;
            if def.data_type != DataType::Null && value.data_type() != def.data_type && !value.is_null() {
                value = change_type(&value, def.data_type)?;
            }
            (def.set)(self, value).map_err(|result| XmlError::Rejected {
                object_type: T::OBJECT_TYPE,
                element: def.name.to_owned(),
                result,
            })?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Creates a default instance of the given interface class.
pub fn create_object(object_type: ObjectType) -> Box<dyn CosemObject> {
    match object_type {
        ObjectType::Data => Box::new(data::DataObject::default()),
        ObjectType::Register => Box::new(register::Register::default()),
        ObjectType::ExtendedRegister => Box::new(extended_register::ExtendedRegister::default()),
        ObjectType::ProfileGeneric => Box::new(profile_generic::ProfileGeneric::default()),
        ObjectType::Clock => Box::new(clock::Clock::default()),
        ObjectType::IecHdlcSetup => Box::new(iec_hdlc_setup::IecHdlcSetup::default()),
        ObjectType::TcpUdpSetup => Box::new(tcp_udp_setup::TcpUdpSetup::default()),
        ObjectType::SecuritySetup => Box::new(security_setup::SecuritySetup::default()),
        ObjectType::DisconnectControl => Box::new(disconnect_control::DisconnectControl::default()),
        ObjectType::G3PlcMacLayerCounters => {
            Box::new(g3_plc_mac_layer_counters::G3PlcMacLayerCounters::default())
        }
    }
}

/// Shorthand for setters: converts an integer-like value or answers
/// `TypeUnmatched`.
pub(crate) fn integer<T: TryFrom<i128>>(value: &Data) -> core::result::Result<T, DataAccessResult> {
    value.to_integer()
}

/// Shorthand for setters of octet-string attributes holding an OBIS code.
pub(crate) fn obis_code(value: &Data) -> core::result::Result<ObisCode, DataAccessResult> {
    value.as_bytes().and_then(ObisCode::from_bytes).ok_or(DataAccessResult::TypeUnmatched)
}

/// Reads a date-time attribute sent either as a 12-byte octet-string or as a
/// native date-time.
pub(crate) fn date_time_value(value: &Data) -> Result<DateTime, DataAccessResult> {
    match value {
        Data::DateTime(dt) => Ok(*dt),
        Data::OctetString(bytes) if bytes.len() == 12 => {
            DateTime::parse(bytes).map(|(_, dt)| dt).map_err(|_| DataAccessResult::TypeUnmatched)
        }
        Data::OctetString(bytes) if bytes.is_empty() => Ok(DateTime::unspecified()),
        _ => Err(DataAccessResult::TypeUnmatched),
    }
}

pub(crate) fn date_time_data(dt: &DateTime) -> Data {
    Data::OctetString(dt.encode().to_vec())
}
