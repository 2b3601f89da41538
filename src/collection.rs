//! Ordered, owning collection of COSEM objects.
//!
//! The collection is the registry a DLMS engine looks objects up in. It keeps
//! insertion order, stamps each object with its [`CollectionId`] and resolves
//! the references objects hold to each other (profile capture objects, setup
//! references) lazily, by logical name.
//!
//! # Example
//! ```
//! use cosem_objects::collection::ObjectCollection;
//! use cosem_objects::cosem::register::Register;
//! use cosem_objects::{Data, ObisCode, ObjectType, ScalerUnit, Unit};
//!
//! let ln = ObisCode::new(1, 0, 1, 8, 0, 255);
//! let mut objects = ObjectCollection::new();
//! objects.add(Register::new(ln, Data::DoubleLongUnsigned(1), ScalerUnit::new(0, Unit::WattHour)));
//!
//! assert!(objects.find_by_ln(Some(ObjectType::Register), &ln).is_some());
//! assert_eq!(objects.find::<Register>(&ln).unwrap().value(), &Data::DoubleLongUnsigned(1));
//! ```

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use log::{debug, trace, warn};

use crate::access::ActionResult;
use crate::cosem::{CollectionId, CosemObject, InterfaceClass, ObjectReference, ProfileGeneric};
use crate::data::Data;
use crate::error::{Error, Result, XmlError};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;
use crate::xml::{OBJECT, ROOT, XmlSettings, XmlWriter, parse_document, read_object};

/// Method index of `capture` in the profile generic class.
const CAPTURE: u8 = 2;

pub struct ObjectCollection {
    id: CollectionId,
    objects: Vec<Box<dyn CosemObject>>,
}

impl Default for ObjectCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ObjectCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectCollection").field("id", &self.id).field("len", &self.objects.len()).finish()
    }
}

impl ObjectCollection {
    pub fn new() -> Self {
        Self { id: CollectionId::next(), objects: Vec::new() }
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Appends an object and makes this collection its parent unless it
    /// already has one.
    pub fn add<T: CosemObject + 'static>(&mut self, object: T) {
        self.add_boxed(Box::new(object));
    }

    /// Appends a type-erased object, as produced by
    /// [`create_object`](crate::cosem::create_object).
    ///
    /// Duplicate logical names are accepted; lookups return the first match.
    pub fn add_boxed(&mut self, mut object: Box<dyn CosemObject>) {
        if let Some(ln) = object.logical_name() {
            if self.find_by_ln(Some(object.object_type()), &ln).is_some() {
                warn!("duplicate {} {ln} added to collection", object.object_type());
            }
        }
        let base = object.base_mut();
        if base.parent().is_none() {
            base.set_parent(Some(self.id));
        }
        self.objects.push(object);
    }

    /// First object with the logical name, restricted to one class when
    /// `object_type` is given.
    pub fn find_by_ln(&self, object_type: Option<ObjectType>, ln: &ObisCode) -> Option<&dyn CosemObject> {
        self.position(object_type, ln).map(|i| self.objects[i].as_ref())
    }

    pub fn find_by_ln_mut(&mut self, object_type: Option<ObjectType>, ln: &ObisCode) -> Option<&mut dyn CosemObject> {
        let i = self.position(object_type, ln)?;
        Some(self.objects[i].as_mut())
    }

    pub fn find_by_sn(&self, short_name: u16) -> Option<&dyn CosemObject> {
        self.objects.iter().find(|o| o.short_name() == short_name).map(|o| o.as_ref())
    }

    /// Typed lookup by logical name.
    pub fn find<T: InterfaceClass>(&self, ln: &ObisCode) -> Option<&T> {
        self.find_by_ln(Some(T::OBJECT_TYPE), ln).and_then(|o| o.downcast_ref())
    }

    pub fn find_mut<T: InterfaceClass>(&mut self, ln: &ObisCode) -> Option<&mut T> {
        self.find_by_ln_mut(Some(T::OBJECT_TYPE), ln).and_then(|o| o.downcast_mut())
    }

    /// Resolves a foreign-key reference.
    pub fn resolve(&self, reference: &ObjectReference) -> Result<&dyn CosemObject> {
        self.find_by_ln(Some(reference.object_type), &reference.logical_name).ok_or_else(|| {
            debug!("unresolved reference to {reference}");
            Error::NotFound(reference.to_string())
        })
    }

    pub fn get_objects(&self) -> impl Iterator<Item = &dyn CosemObject> {
        self.iter()
    }

    /// Objects of one class, in insertion order.
    pub fn get_objects_of(&self, object_type: ObjectType) -> impl Iterator<Item = &dyn CosemObject> {
        self.iter().filter(move |o| o.object_type() == object_type)
    }

    /// Objects of any of the given classes, in insertion order.
    pub fn get_objects_of_types<'a>(
        &'a self,
        object_types: &'a [ObjectType],
    ) -> impl Iterator<Item = &'a dyn CosemObject> + 'a {
        self.iter().filter(move |o| object_types.contains(&o.object_type()))
    }

    /// Takes the first matching object out of the collection.
    pub fn remove(&mut self, object_type: ObjectType, ln: &ObisCode) -> Option<Box<dyn CosemObject>> {
        let i = self.position(Some(object_type), ln)?;
        let mut object = self.objects.remove(i);
        object.base_mut().set_parent(None);
        Some(object)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn CosemObject> {
        self.objects.iter().map(|o| o.as_ref())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn position(&self, object_type: Option<ObjectType>, ln: &ObisCode) -> Option<usize> {
        self.objects.iter().position(|o| {
            object_type.is_none_or(|t| o.object_type() == t) && o.logical_name().as_ref() == Some(ln)
        })
    }

    /// Reads the current value of every capture object of a profile and
    /// appends the row to its buffer.
    ///
    /// Each cell is read through `get_value`, so the capture sees the same
    /// access rights a client would. A profile listing itself as a capture
    /// object is rejected.
    pub fn capture(&mut self, profile_ln: &ObisCode) -> Result<()> {
        let profile = self
            .find::<ProfileGeneric>(profile_ln)
            .ok_or_else(|| Error::NotFound(ObjectReference::new(ObjectType::ProfileGeneric, *profile_ln).to_string()))?;

        let mut row = Vec::with_capacity(profile.capture_objects.len());
        for column in &profile.capture_objects {
            if column.class_id == ObjectType::ProfileGeneric.class_id() && column.logical_name == *profile_ln {
                return Err(Error::ReferenceCycle(profile_ln.to_string()));
            }
            let object_type = ObjectType::try_from(column.class_id).ok();
            let object = self.find_by_ln(object_type, &column.logical_name).ok_or_else(|| {
                debug!("{profile_ln}: capture object {} (class {}) not found", column.logical_name, column.class_id);
                Error::NotFound(column.logical_name.to_string())
            })?;
            let index = u8::try_from(column.attribute_index).map_err(|_| Error::InvalidAttributeIndex(0))?;
            row.push(column.select(object.get_value(index, None)?));
        }

        trace!("{profile_ln}: captured {row:?}");
        self.find_mut::<ProfileGeneric>(profile_ln)
            .ok_or_else(|| Error::NotFound(profile_ln.to_string()))?
            .push_row(row)?;
        Ok(())
    }

    /// Invokes a method on an object of the collection.
    ///
    /// `capture` of a profile without a supplied row reads its columns from
    /// the collection, see [`ObjectCollection::capture`].
    pub fn invoke(
        &mut self,
        object_type: ObjectType,
        ln: &ObisCode,
        index: u8,
        parameters: Option<Data>,
    ) -> Result<Option<Data>> {
        let object = self
            .find_by_ln_mut(Some(object_type), ln)
            .ok_or_else(|| Error::NotFound(ObjectReference::new(object_type, *ln).to_string()))?;

        let collects_row = object_type == ObjectType::ProfileGeneric
            && index == CAPTURE
            && !matches!(parameters, Some(Data::Structure(_)));
        if !collects_row {
            return object.invoke(index, parameters);
        }
        if !object.base().method_access(index).is_accessible() {
            return Err(ActionResult::ReadWriteDenied.into());
        }
        self.capture(ln)?;
        Ok(None)
    }

    /// Writes the collection as an XML document.
    pub fn save(&self, out: &mut dyn Write, settings: XmlSettings) -> core::result::Result<(), XmlError> {
        let mut writer = XmlWriter::new(out, settings);
        writer.begin_document()?;
        for object in self.iter() {
            writer.write_object(object)?;
        }
        writer.end_document()
    }

    /// Reads a collection from an XML document.
    pub fn load<R: Read>(mut input: R) -> core::result::Result<Self, XmlError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;

        let root = parse_document(&text)?;
        if root.name != ROOT {
            return Err(XmlError::MissingElement(ROOT.to_owned()));
        }
        let mut collection = Self::new();
        for node in root.children_named(OBJECT) {
            collection.add_boxed(read_object(node)?);
        }
        debug!("loaded {} objects", collection.len());
        Ok(collection)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>, settings: XmlSettings) -> core::result::Result<(), XmlError> {
        let mut out = BufWriter::new(File::create(path)?);
        self.save(&mut out, settings)?;
        out.flush()?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> core::result::Result<Self, XmlError> {
        Self::load(File::open(path)?)
    }
}

impl<'a> IntoIterator for &'a ObjectCollection {
    type Item = &'a dyn CosemObject;
    type IntoIter = Box<dyn Iterator<Item = &'a dyn CosemObject> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DataAccessResult;
    use crate::cosem::clock::Clock;
    use crate::cosem::data::DataObject;
    use crate::cosem::register::Register;
    use crate::cosem::{AttributeAccess, CaptureObject, MethodAccess};
    use crate::unit::{ScalerUnit, Unit};

    const ENERGY: ObisCode = ObisCode::new(1, 0, 1, 8, 0, 255);
    const LOAD_PROFILE: ObisCode = ObisCode::new(1, 0, 99, 1, 0, 255);

    fn energy(value: u32) -> Register {
        Register::new(ENERGY, Data::DoubleLongUnsigned(value), ScalerUnit::new(0, Unit::WattHour))
    }

    fn profile(columns: Vec<CaptureObject>) -> ProfileGeneric {
        ProfileGeneric::new(LOAD_PROFILE, columns, 900, 10)
    }

    #[test]
    fn test_add_sets_parent() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(1));
        assert_eq!(objects.len(), 1);
        assert_eq!(objects.find_by_ln(None, &ENERGY).unwrap().base().parent(), Some(objects.id()));

        let removed = objects.remove(ObjectType::Register, &ENERGY).unwrap();
        assert_eq!(removed.base().parent(), None);
        assert!(objects.is_empty());
    }

    #[test]
    fn test_lookup_is_first_match_in_insertion_order() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(1));
        objects.add(DataObject::new(ENERGY, Data::Unsigned(7)));
        objects.add(energy(2));

        assert_eq!(objects.find::<Register>(&ENERGY).unwrap().value(), &Data::DoubleLongUnsigned(1));
        assert_eq!(objects.find_by_ln(None, &ENERGY).unwrap().object_type(), ObjectType::Register);
        assert_eq!(objects.find_by_ln(Some(ObjectType::Data), &ENERGY).unwrap().object_type(), ObjectType::Data);
        assert_eq!(objects.get_objects_of(ObjectType::Register).count(), 2);

        let order: Vec<_> = objects.iter().map(|o| o.object_type()).collect();
        assert_eq!(order, [ObjectType::Register, ObjectType::Data, ObjectType::Register]);
    }

    #[test]
    fn test_add_keeps_existing_parent() {
        let other = ObjectCollection::new();
        let mut register = energy(1);
        register.base_mut().set_parent(Some(other.id()));

        let mut objects = ObjectCollection::new();
        objects.add(register);
        assert_eq!(objects.find_by_ln(None, &ENERGY).unwrap().base().parent(), Some(other.id()));
    }

    #[test]
    fn test_get_objects_of_types_keeps_order() {
        let clock_ln = ObisCode::new(0, 0, 1, 0, 0, 255);
        let mut objects = ObjectCollection::new();
        objects.add(energy(1));
        objects.add(Clock::new(clock_ln));
        objects.add(DataObject::new(ObisCode::new(0, 0, 96, 1, 0, 255), Data::Unsigned(7)));
        objects.add(energy(2));

        let found: Vec<_> = objects
            .get_objects_of_types(&[ObjectType::Data, ObjectType::Register])
            .map(|o| o.object_type())
            .collect();
        assert_eq!(found, [ObjectType::Register, ObjectType::Data, ObjectType::Register]);
        assert_eq!(objects.get_objects_of_types(&[]).count(), 0);
        assert_eq!(objects.get_objects_of_types(&[ObjectType::Clock]).next().unwrap().logical_name(), Some(clock_ln));
    }

    #[test]
    fn test_find_by_sn() {
        let mut register = energy(1);
        register.base_mut().short_name = 0x2000;
        let mut objects = ObjectCollection::new();
        objects.add(register);

        assert!(objects.find_by_sn(0x2000).is_some());
        assert!(objects.find_by_sn(0x2008).is_none());
    }

    #[test]
    fn test_resolve() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(1));

        let found = objects.resolve(&ObjectReference::new(ObjectType::Register, ENERGY)).unwrap();
        assert_eq!(found.logical_name(), Some(ENERGY));
        assert!(matches!(
            objects.resolve(&ObjectReference::new(ObjectType::Clock, ENERGY)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_registered_logical_name_is_fixed() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(1));
        let register = objects.find_by_ln_mut(None, &ENERGY).unwrap();

        let result = register.set_value(1, Data::OctetString(vec![1, 0, 2, 8, 0, 255]));
        assert!(matches!(result, Err(Error::DataAccess(DataAccessResult::ReadWriteDenied))));
        register.set_value(1, Data::OctetString(ENERGY.encode().to_vec())).unwrap();
    }

    #[test]
    fn test_capture_reads_columns() {
        let clock_ln = ObisCode::new(0, 0, 1, 0, 0, 255);
        let mut objects = ObjectCollection::new();
        objects.add(Clock::new(clock_ln));
        objects.add(energy(500));
        objects.add(profile(vec![
            CaptureObject::new(ObjectType::Clock, clock_ln, 2),
            CaptureObject::new(ObjectType::Register, ENERGY, 2),
        ]));

        objects.capture(&LOAD_PROFILE).unwrap();
        objects.find_mut::<Register>(&ENERGY).unwrap().set_raw_value(Data::DoubleLongUnsigned(650));
        objects.invoke(ObjectType::ProfileGeneric, &LOAD_PROFILE, 2, Some(Data::Integer(0))).unwrap();

        let profile = objects.find::<ProfileGeneric>(&LOAD_PROFILE).unwrap();
        assert_eq!(profile.entries_in_use, 2);
        assert_eq!(profile.buffer[0][1], Data::DoubleLongUnsigned(500));
        assert_eq!(profile.buffer[1][1], Data::DoubleLongUnsigned(650));
        assert!(matches!(profile.buffer[0][0], Data::OctetString(ref bytes) if bytes.len() == 12));
    }

    #[test]
    fn test_capture_of_itself_is_a_cycle() {
        let mut objects = ObjectCollection::new();
        objects.add(profile(vec![CaptureObject::new(ObjectType::ProfileGeneric, LOAD_PROFILE, 7)]));

        assert!(matches!(objects.capture(&LOAD_PROFILE), Err(Error::ReferenceCycle(_))));
    }

    #[test]
    fn test_capture_of_missing_object() {
        let mut objects = ObjectCollection::new();
        objects.add(profile(vec![CaptureObject::new(ObjectType::Register, ENERGY, 2)]));

        assert!(matches!(objects.capture(&LOAD_PROFILE), Err(Error::NotFound(_))));
        assert!(objects.find::<ProfileGeneric>(&LOAD_PROFILE).unwrap().buffer.is_empty());
    }

    #[test]
    fn test_capture_honours_read_access() {
        let mut register = energy(1);
        register.base_mut().set_attribute_access(2, AttributeAccess::NO_ACCESS).unwrap();
        let mut objects = ObjectCollection::new();
        objects.add(register);
        objects.add(profile(vec![CaptureObject::new(ObjectType::Register, ENERGY, 2)]));

        let err = objects.capture(&LOAD_PROFILE).unwrap_err();
        assert_eq!(err.access_result(), Some(DataAccessResult::ReadWriteDenied));
    }

    #[test]
    fn test_invoke_routes_to_object() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(42));

        objects.invoke(ObjectType::Register, &ENERGY, 1, None).unwrap();
        assert_eq!(objects.find::<Register>(&ENERGY).unwrap().value(), &Data::DoubleLongUnsigned(0));
        assert!(matches!(
            objects.invoke(ObjectType::Clock, &ENERGY, 1, None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_invoke_capture_checks_method_access() {
        let mut objects = ObjectCollection::new();
        let mut locked = profile(vec![]);
        locked.base_mut().set_method_access(2, MethodAccess::NO_ACCESS).unwrap();
        objects.add(locked);

        assert!(matches!(
            objects.invoke(ObjectType::ProfileGeneric, &LOAD_PROFILE, 2, None),
            Err(Error::Action(ActionResult::ReadWriteDenied))
        ));
    }

    #[test]
    fn test_load_requires_objects_root() {
        let result = ObjectCollection::load("<Things/>".as_bytes());
        assert!(matches!(result, Err(XmlError::MissingElement(_))));
    }

    #[test]
    fn test_save_and_load_in_memory() {
        let mut objects = ObjectCollection::new();
        objects.add(energy(12345));
        objects.add(DataObject::new(ObisCode::new(0, 0, 96, 1, 0, 255), Data::VisibleString("METER-1".into())));

        let mut out = Vec::new();
        objects.save(&mut out, XmlSettings::default()).unwrap();
        let loaded = ObjectCollection::load(out.as_slice()).unwrap();

        assert_eq!(loaded.len(), 2);
        let register = loaded.find::<Register>(&ENERGY).unwrap();
        assert_eq!(register.value(), &Data::DoubleLongUnsigned(12345));
        assert_eq!(register.base().parent(), Some(loaded.id()));
        let serial = loaded.find::<DataObject>(&ObisCode::new(0, 0, 96, 1, 0, 255)).unwrap();
        assert_eq!(serial.value, Data::VisibleString("METER-1".into()));
    }
}
