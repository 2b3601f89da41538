//! ProfileGeneric (Class 7) COSEM Interface Class
//!
//! Load profiles, event logs and any other time series: a buffer of rows,
//! one column per capture object.
//!
//! ## Attributes
//!
//! | ID | Name             | Type                  | Kind     |
//! |----|------------------|-----------------------|----------|
//! | 1  | logical_name     | OctetString(6)        | static   |
//! | 2  | buffer           | Array of Structure    | volatile |
//! | 3  | capture_objects  | Array of Structure(4) | static   |
//! | 4  | capture_period   | DoubleLongUnsigned    | static   |
//! | 5  | sort_method      | Enum                  | static   |
//! | 6  | sort_object      | Structure(4)          | static   |
//! | 7  | entries_in_use   | DoubleLongUnsigned    | volatile |
//! | 8  | profile_entries  | DoubleLongUnsigned    | static   |
//!
//! ## Methods
//!
//! | ID | Name    | Description                               |
//! |----|---------|-------------------------------------------|
//! | 1  | reset   | Clears the buffer                         |
//! | 2  | capture | Appends a row (see [`ProfileGeneric::push_row`]) |
//!
//! Capture objects reference other objects by class id and logical name.
//! They are resolved lazily against the owning collection, which is what
//! [`ObjectCollection::capture`](crate::collection::ObjectCollection::capture)
//! does when it fills a row.
//!
//! ## Selective access
//!
//! Reading the buffer honors two selectors:
//! - `1`, range: rows whose restricting column lies in `from..=to`
//! - `2`, entry: a 1-based window of rows and columns, `0` meaning "to the end"
//!
//! ## Example
//!
//! ```rust
//! use cosem_objects::cosem::{CaptureObject, CosemObject, ProfileGeneric};
//! use cosem_objects::{Data, ObisCode, ObjectType};
//!
//! let mut profile = ProfileGeneric::new(
//!     ObisCode::new(1, 0, 99, 1, 0, 255),
//!     vec![
//!         CaptureObject::new(ObjectType::Clock, ObisCode::new(0, 0, 1, 0, 0, 255), 2),
//!         CaptureObject::new(ObjectType::Register, ObisCode::new(1, 0, 1, 8, 0, 255), 2),
//!     ],
//!     900,
//!     96,
//! );
//!
//! profile.push_row(vec![Data::OctetString(vec![0; 12]), Data::DoubleLongUnsigned(10)]).unwrap();
//! assert_eq!(profile.entries_in_use, 1);
//! ```
//!
//! ## References
//!
//! - Blue Book IEC 62056-6-2, Section 4.3.6

use core::cmp::Ordering;
use std::collections::VecDeque;

use derive_try_from_primitive::TryFromPrimitive;
use log::debug;

use crate::access::{ActionResult, DataAccessResult, SelectiveAccess};
use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, ObjectReference, integer, obis_code};
use crate::data::{Data, DataType};
use crate::date_time::DateTime;
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// One buffer column: which attribute of which object is captured.
///
/// Encoded as `Structure { LongUnsigned(class_id), OctetString(ln),
/// Integer(attribute_index), LongUnsigned(data_index) }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CaptureObject {
    pub class_id: u16,
    pub logical_name: ObisCode,
    /// Attribute index, 1-based.
    pub attribute_index: i8,
    /// Element of a composite attribute, 1-based; 0 captures the whole value.
    pub data_index: u16,
}

impl CaptureObject {
    pub const fn new(object_type: ObjectType, logical_name: ObisCode, attribute_index: i8) -> Self {
        Self { class_id: object_type.class_id(), logical_name, attribute_index, data_index: 0 }
    }

    /// The captured object as a reference, if its class is known.
    pub fn reference(&self) -> Option<ObjectReference> {
        ObjectType::try_from(self.class_id).ok().map(|object_type| ObjectReference::new(object_type, self.logical_name))
    }

    /// Picks the captured element out of an attribute value.
    pub fn select(&self, value: Data) -> Data {
        if self.data_index == 0 {
            return value;
        }
        value
            .into_items()
            .and_then(|mut items| {
                let index = usize::from(self.data_index) - 1;
                (index < items.len()).then(|| items.swap_remove(index))
            })
            .unwrap_or(Data::Null)
    }

    pub fn to_data(&self) -> Data {
        Data::Structure(vec![
            Data::LongUnsigned(self.class_id),
            Data::OctetString(self.logical_name.encode().to_vec()),
            Data::Integer(self.attribute_index),
            Data::LongUnsigned(self.data_index),
        ])
    }

    pub fn from_data(value: &Data) -> Result<Self, DataAccessResult> {
        match value.as_items() {
            Some([class_id, logical_name, attribute_index, data_index]) => Ok(Self {
                class_id: integer(class_id)?,
                logical_name: obis_code(logical_name)?,
                attribute_index: integer(attribute_index)?,
                data_index: integer(data_index)?,
            }),
            _ => Err(DataAccessResult::TypeUnmatched),
        }
    }

    fn matches(&self, other: &CaptureObject) -> bool {
        self.class_id == other.class_id
            && self.logical_name == other.logical_name
            && self.attribute_index == other.attribute_index
    }
}

/// Order of the buffer entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum SortMethod {
    /// Oldest entries are dropped first.
    #[default]
    Fifo = 1,
    /// Newest first; when full the oldest entry is dropped.
    Lifo = 2,
    /// Descending by the sort object; the smallest entry is dropped.
    Largest = 3,
    /// Ascending by the sort object; the largest entry is dropped.
    Smallest = 4,
    NearestToZero = 5,
    FarthestFromZero = 6,
}

/// ProfileGeneric object, COSEM interface class 7, version 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGeneric {
    base: ObjectBase,
    /// Attribute 2, one row per entry.
    pub buffer: VecDeque<Vec<Data>>,
    /// Attribute 3
    pub capture_objects: Vec<CaptureObject>,
    /// Attribute 4: seconds between captures, 0 for event driven.
    pub capture_period: u32,
    /// Attribute 5
    pub sort_method: SortMethod,
    /// Attribute 6
    pub sort_object: Option<CaptureObject>,
    /// Attribute 7
    pub entries_in_use: u32,
    /// Attribute 8: buffer capacity.
    pub profile_entries: u32,
}

impl Default for ProfileGeneric {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            buffer: VecDeque::new(),
            capture_objects: Vec::new(),
            capture_period: 0,
            sort_method: SortMethod::Fifo,
            sort_object: None,
            entries_in_use: 0,
            profile_entries: 1,
        }
    }
}

impl ProfileGeneric {
    pub fn new(
        logical_name: ObisCode,
        capture_objects: Vec<CaptureObject>,
        capture_period: u32,
        profile_entries: u32,
    ) -> Self {
        Self { capture_objects, capture_period, profile_entries, ..Self::with_logical_name(logical_name) }
    }

    /// Appends a captured row according to the sort method, dropping the
    /// entry of lowest priority once `profile_entries` is exceeded.
    ///
    /// The row must have one cell per capture object.
    pub fn push_row(&mut self, row: Vec<Data>) -> Result<(), DataAccessResult> {
        if row.len() != self.capture_objects.len() {
            debug!(
                "{:?}: row of {} cells for {} capture objects",
                self.base.logical_name,
                row.len(),
                self.capture_objects.len()
            );
            return Err(DataAccessResult::TypeUnmatched);
        }

        let column = self.sort_column();
        match (self.sort_method, column) {
            (SortMethod::Lifo, _) => self.buffer.push_front(row),
            (method, Some(column)) => {
                let key = |row: &Vec<Data>| row.get(column).and_then(Data::as_f64).unwrap_or(0.0);
                let new_key = key(&row);
                let before = |existing: f64| match method {
                    SortMethod::Largest => existing >= new_key,
                    SortMethod::Smallest => existing <= new_key,
                    SortMethod::NearestToZero => existing.abs() <= new_key.abs(),
                    _ => existing.abs() >= new_key.abs(),
                };
                let position = self.buffer.partition_point(|existing| before(key(existing)));
                self.buffer.insert(position, row);
            }
            _ => self.buffer.push_back(row),
        }
        self.truncate_buffer();
        Ok(())
    }

    /// Clears the buffer, keeping the configuration.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.entries_in_use = 0;
    }

    /// Buffer rows selected by a GET selective access.
    pub fn select(&self, selector: Option<&SelectiveAccess>) -> Result<Data, DataAccessResult> {
        let selection = match selector {
            None => Selection { rows: (0..self.buffer.len()).collect(), columns: None },
            Some(SelectiveAccess { selector: 1, parameters }) => self.range_selection(parameters)?,
            Some(SelectiveAccess { selector: 2, parameters }) => self.entry_selection(parameters)?,
            Some(other) => {
                debug!("{:?}: unsupported buffer selector {}", self.base.logical_name, other.selector);
                return Err(DataAccessResult::OtherReason);
            }
        };

        let rows = selection.rows.iter().filter_map(|i| self.buffer.get(*i)).map(|row| {
            let cells = match &selection.columns {
                Some(columns) => columns.iter().filter_map(|c| row.get(*c).cloned()).collect(),
                None => row.clone(),
            };
            Data::Structure(cells)
        });
        Ok(Data::Array(rows.collect()))
    }

    /// Column the buffer is sorted by; `None` for FIFO and LIFO.
    fn sort_column(&self) -> Option<usize> {
        if matches!(self.sort_method, SortMethod::Fifo | SortMethod::Lifo) {
            return None;
        }
        let sort_object = self.sort_object?;
        self.column_of(&sort_object)
    }

    /// Drops the entries of lowest priority beyond `profile_entries`.
    fn truncate_buffer(&mut self) {
        let capacity = self.profile_entries as usize;
        if self.buffer.len() > capacity {
            // FIFO and unsorted buffers keep the oldest entry at the front
            if self.sort_method == SortMethod::Lifo || self.sort_column().is_some() {
                self.buffer.truncate(capacity);
            } else {
                let excess = self.buffer.len() - capacity;
                self.buffer.drain(..excess);
            }
        }
        self.entries_in_use = self.buffer.len() as u32;
    }

    fn column_of(&self, capture_object: &CaptureObject) -> Option<usize> {
        self.capture_objects.iter().position(|co| co.matches(capture_object))
    }

    /// Selector 1: `Structure { restricting_object, from_value, to_value,
    /// selected_values }`.
    fn range_selection(&self, parameters: &Data) -> Result<Selection, DataAccessResult> {
        let Some([restricting, from, to, selected]) = parameters.as_items() else {
            return Err(DataAccessResult::TypeUnmatched);
        };
        let column = self.column_of(&CaptureObject::from_data(restricting)?).ok_or(DataAccessResult::OtherReason)?;

        let rows = self
            .buffer
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.get(column).is_some_and(|cell| {
                    compare(cell, from).is_some_and(Ordering::is_ge) && compare(cell, to).is_some_and(Ordering::is_le)
                })
            })
            .map(|(i, _)| i)
            .collect();

        let items = selected.as_items().ok_or(DataAccessResult::TypeUnmatched)?;
        let columns = if items.is_empty() {
            None
        } else {
            let columns = items
                .iter()
                .map(|item| self.column_of(&CaptureObject::from_data(item)?).ok_or(DataAccessResult::OtherReason))
                .collect::<Result<Vec<_>, _>>()?;
            Some(columns)
        };
        Ok(Selection { rows, columns })
    }

    /// Selector 2: `Structure { from_entry, to_entry, from_selected_value,
    /// to_selected_value }`, 1-based, 0 meaning the last one.
    fn entry_selection(&self, parameters: &Data) -> Result<Selection, DataAccessResult> {
        let Some([from_entry, to_entry, from_value, to_value]) = parameters.as_items() else {
            return Err(DataAccessResult::TypeUnmatched);
        };
        let window = |from: &Data, to: &Data, len: usize| -> Result<Vec<usize>, DataAccessResult> {
            let from = integer::<usize>(from)?.max(1);
            let to = match integer::<usize>(to)? {
                0 => len,
                to => to.min(len),
            };
            Ok((from - 1..to).collect())
        };
        Ok(Selection {
            rows: window(from_entry, to_entry, self.buffer.len())?,
            columns: Some(window(from_value, to_value, self.capture_objects.len())?),
        })
    }

    fn set_buffer(&mut self, value: Data) -> Result<(), DataAccessResult> {
        let rows = value.into_items().ok_or(DataAccessResult::TypeUnmatched)?;
        self.buffer = rows
            .into_iter()
            .map(|row| row.into_items().ok_or(DataAccessResult::TypeUnmatched))
            .collect::<Result<_, _>>()?;
        self.entries_in_use = self.buffer.len() as u32;
        Ok(())
    }

    fn set_capture_objects(&mut self, value: &Data) -> Result<(), DataAccessResult> {
        let items = value.as_items().ok_or(DataAccessResult::TypeUnmatched)?;
        self.capture_objects = items.iter().map(CaptureObject::from_data).collect::<Result<_, _>>()?;
        Ok(())
    }

    fn set_profile_entries(&mut self, value: &Data) -> Result<(), DataAccessResult> {
        self.profile_entries = integer(value)?;
        self.truncate_buffer();
        Ok(())
    }
}

struct Selection {
    rows: Vec<usize>,
    /// `None` keeps every column.
    columns: Option<Vec<usize>>,
}

/// Orders two cells of the same column: date-times chronologically,
/// numbers by value.
fn compare(a: &Data, b: &Data) -> Option<Ordering> {
    fn as_date_time(value: &Data) -> Option<DateTime> {
        match value {
            Data::DateTime(dt) => Some(*dt),
            Data::OctetString(bytes) if bytes.len() == 12 => DateTime::parse(bytes).ok().map(|(_, dt)| dt),
            _ => None,
        }
    }

    match (as_date_time(a), as_date_time(b)) {
        (Some(a), Some(b)) => a.to_naive()?.partial_cmp(&b.to_naive()?),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn empty_sort_object() -> Data {
    Data::Structure(vec![
        Data::LongUnsigned(0),
        Data::OctetString(vec![0; 6]),
        Data::Integer(0),
        Data::LongUnsigned(0),
    ])
}

impl InterfaceClass for ProfileGeneric {
    const OBJECT_TYPE: ObjectType = ObjectType::ProfileGeneric;
    const VERSION: u8 = 1;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new("Buffer", DataType::Array, |o, sel| o.select(sel), |o, v| o.set_buffer(v)).volatile(),
        AttributeDef::<Self>::new(
            "CaptureObjects",
            DataType::Array,
            |o, _| Ok(Data::Array(o.capture_objects.iter().map(CaptureObject::to_data).collect())),
            |o, v| o.set_capture_objects(&v),
        ),
        AttributeDef::<Self>::new(
            "CapturePeriod",
            DataType::DoubleLongUnsigned,
            |o, _| Ok(Data::DoubleLongUnsigned(o.capture_period)),
            |o, v| {
                o.capture_period = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "SortMethod",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.sort_method as u8)),
            |o, v| {
                o.sort_method = SortMethod::try_from(integer::<u8>(&v)?).map_err(|_| DataAccessResult::TypeUnmatched)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "SortObject",
            DataType::Structure,
            |o, _| Ok(o.sort_object.as_ref().map(CaptureObject::to_data).unwrap_or_else(empty_sort_object)),
            |o, v| {
                o.sort_object = match v {
                    Data::Null => None,
                    v => Some(CaptureObject::from_data(&v)?).filter(|co| co.class_id != 0),
                };
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "EntriesInUse",
            DataType::DoubleLongUnsigned,
            |o, _| Ok(Data::DoubleLongUnsigned(o.entries_in_use)),
            |o, v| {
                o.entries_in_use = integer(&v)?;
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "ProfileEntries",
            DataType::DoubleLongUnsigned,
            |o, _| Ok(Data::DoubleLongUnsigned(o.profile_entries)),
            |o, v| o.set_profile_entries(&v),
        ),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[
        MethodDef::<Self>::new("Reset", |o, _| {
            o.reset();
            Ok(None)
        }),
        // The column values live in other objects; a row is either supplied
        // by the caller or filled in by the owning collection.
        MethodDef::<Self>::new("Capture", |o, parameters| match parameters {
            Some(Data::Structure(row)) => {
                o.push_row(row)?;
                Ok(None)
            }
            _ => Err(ActionResult::TemporaryFailure),
        }),
    ];
    const READ_FIRST: &'static [u8] = &[3];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
