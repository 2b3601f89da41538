//! XML persistence of object collections.
//!
//! A document is a root `Objects` element holding one `Object` element per
//! COSEM object:
//!
//! ```xml
//! <Objects>
//!   <Object Type="Register">
//!     <LN>1.0.1.8.0.255</LN>
//!     <Value Type="UInt32">12345</Value>
//!     <ScalerUnit Type="Structure">
//!       <Item Type="Int8">-2</Item>
//!       <Item Type="Enum">27</Item>
//!     </ScalerUnit>
//!   </Object>
//! </Objects>
//! ```
//!
//! Every value element carries its DLMS type in a `Type` attribute, so a
//! document can be loaded back without a schema. Octet-strings holding a
//! date or time carry a `UIType` attribute and are written in text form.

use std::io::Write;

use log::debug;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::cosem::{CosemObject, create_object};
use crate::data::{Data, DataType};
use crate::date_time::{Date, DateTime, Time};
use crate::error::XmlError;
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

pub const ROOT: &str = "Objects";
pub const OBJECT: &str = "Object";
const ITEM: &str = "Item";

/// Options for saving a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlSettings {
    /// Write attribute values; otherwise only the identity of each object.
    pub include_values: bool,
    /// Leave out attributes whose value equals the class default.
    pub skip_defaults: bool,
}

impl Default for XmlSettings {
    fn default() -> Self {
        Self { include_values: true, skip_defaults: true }
    }
}

/// Streaming writer for the collection document.
pub struct XmlWriter<'w> {
    writer: Writer<&'w mut dyn Write>,
    settings: XmlSettings,
}

impl<'w> XmlWriter<'w> {
    pub fn new(out: &'w mut dyn Write, settings: XmlSettings) -> Self {
        Self { writer: Writer::new_with_indent(out, b' ', 2), settings }
    }

    pub fn settings(&self) -> &XmlSettings {
        &self.settings
    }

    pub fn begin_document(&mut self) -> Result<(), XmlError> {
        self.writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.writer.write_event(Event::Start(BytesStart::new(ROOT)))?;
        Ok(())
    }

    pub fn end_document(&mut self) -> Result<(), XmlError> {
        self.writer.write_event(Event::End(BytesEnd::new(ROOT)))?;
        Ok(())
    }

    pub fn write_object(&mut self, object: &dyn CosemObject) -> Result<(), XmlError> {
        let object_type = object.object_type();
        self.writer
            .write_event(Event::Start(BytesStart::new(OBJECT).with_attributes([("Type", object_type.as_str())])))?;
        let base = object.base();
        if base.short_name != 0 {
            self.write_text("SN", &base.short_name.to_string(), &[])?;
        }
        if let Some(ln) = base.logical_name {
            self.write_text("LN", &ln.to_string(), &[])?;
        }
        if let Some(description) = &base.description {
            self.write_text("Description", description, &[])?;
        }
        if self.settings.include_values {
            object.save(self)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(OBJECT)))?;
        Ok(())
    }

    /// Writes `value` as element `name`, recursing into arrays and
    /// structures with `Item` children.
    pub fn write_value(&mut self, name: &str, value: &Data, ui_type: Option<DataType>) -> Result<(), XmlError> {
        let data_type = value.data_type();
        match value {
            Data::Array(items) | Data::Structure(items) => {
                self.writer.write_event(Event::Start(
                    BytesStart::new(name).with_attributes([("Type", data_type.as_str())]),
                ))?;
                for item in items {
                    self.write_value(ITEM, item, None)?;
                }
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Data::Null | Data::DontCare => {
                self.writer.write_event(Event::Empty(
                    BytesStart::new(name).with_attributes([("Type", data_type.as_str())]),
                ))?;
            }
            Data::OctetString(bytes) => match ui_type.and_then(|ui| date_text(ui, bytes).map(|text| (ui, text))) {
                Some((ui, text)) => {
                    self.write_text(name, &text, &[("Type", data_type.as_str()), ("UIType", ui.as_str())])?;
                }
                None => self.write_text(name, &hex(bytes), &[("Type", data_type.as_str())])?,
            },
            _ => self.write_text(name, &value_text(value), &[("Type", data_type.as_str())])?,
        }
        Ok(())
    }

    fn write_text(&mut self, name: &str, text: &str, attributes: &[(&str, &str)]) -> Result<(), XmlError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name).with_attributes(attributes.iter().copied())))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

fn unhex(text: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks(2)
        .map(|pair| core::str::from_utf8(pair).ok().and_then(|s| u8::from_str_radix(s, 16).ok()))
        .collect()
}

fn date_text(ui_type: DataType, bytes: &[u8]) -> Option<String> {
    match ui_type {
        DataType::DateTime if bytes.len() == 12 => DateTime::parse(bytes).ok().map(|(_, dt)| dt.to_string()),
        DataType::Date if bytes.len() == 5 => Date::parse(bytes).ok().map(|(_, date)| date.to_string()),
        DataType::Time if bytes.len() == 4 => Time::parse(bytes).ok().map(|(_, time)| time.to_string()),
        _ => None,
    }
}

fn value_text(value: &Data) -> String {
    match value {
        Data::Boolean(b) => b.to_string(),
        Data::BitString(bits) => bits.iter().map(|bit| if *bit { '1' } else { '0' }).collect(),
        Data::DoubleLong(n) => n.to_string(),
        Data::DoubleLongUnsigned(n) => n.to_string(),
        Data::VisibleString(s) | Data::Utf8String(s) => s.clone(),
        Data::Bcd(n) | Data::Unsigned(n) | Data::Enum(n) => n.to_string(),
        Data::Integer(n) => n.to_string(),
        Data::Long(n) => n.to_string(),
        Data::LongUnsigned(n) => n.to_string(),
        Data::Long64(n) => n.to_string(),
        Data::Long64Unsigned(n) => n.to_string(),
        Data::Float32(f) => f.to_string(),
        Data::Float64(f) => f.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::Date(date) => date.to_string(),
        Data::Time(time) => time.to_string(),
        Data::OctetString(bytes) => hex(bytes),
        _ => String::new(),
    }
}

/// An element of a parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut node = XmlNode { name: String::from_utf8_lossy(start.name().as_ref()).into_owned(), ..Default::default() };
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            node.attributes.push((key, attr.unescape_value()?.into_owned()));
        }
        Ok(node)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parses a document into its root element.
pub fn parse_document(text: &str) -> Result<XmlNode, XmlError> {
    // text is kept verbatim: string values may start or end with spaces
    let mut reader = Reader::from_str(text);

    // the bottom of the stack collects top-level elements
    let mut stack = vec![XmlNode::default()];
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::from_start(&e)?),
            Event::Empty(e) => {
                let node = XmlNode::from_start(&e)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let (Some(node), Some(parent)) = (stack.pop(), stack.last_mut()) {
                        parent.children.push(node);
                    }
                }
            }
            Event::Text(t) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() > 1 {
        let open = stack.pop().map(|node| node.name).unwrap_or_default();
        return Err(XmlError::MissingElement(format!("/{open}")));
    }
    stack
        .pop()
        .and_then(|document| document.children.into_iter().next())
        .ok_or_else(|| XmlError::MissingElement(ROOT.to_owned()))
}

fn invalid(data_type: DataType, text: &str) -> XmlError {
    XmlError::InvalidValue { data_type, text: text.to_owned() }
}

fn number<T: core::str::FromStr>(data_type: DataType, text: &str) -> Result<T, XmlError> {
    text.trim().parse().map_err(|_| invalid(data_type, text))
}

/// Reads a typed value element written by [`XmlWriter::write_value`].
pub fn read_value(node: &XmlNode) -> Result<Data, XmlError> {
    let type_name = node.attribute("Type").ok_or_else(|| XmlError::MissingElement(format!("{}@Type", node.name)))?;
    let data_type: DataType = type_name.parse().map_err(XmlError::UnknownDataType)?;
    let text = node.text.as_str();

    Ok(match data_type {
        DataType::Null => Data::Null,
        DataType::DontCare => Data::DontCare,
        DataType::Array => Data::Array(node.children_named(ITEM).map(read_value).collect::<Result<_, _>>()?),
        DataType::Structure => {
            Data::Structure(node.children_named(ITEM).map(read_value).collect::<Result<_, _>>()?)
        }
        DataType::Boolean => match text.trim() {
            "true" | "1" => Data::Boolean(true),
            "false" | "0" => Data::Boolean(false),
            _ => return Err(invalid(data_type, text)),
        },
        DataType::BitString => Data::BitString(
            text.trim()
                .chars()
                .map(|c| match c {
                    '1' => Ok(true),
                    '0' => Ok(false),
                    _ => Err(invalid(data_type, text)),
                })
                .collect::<Result<_, _>>()?,
        ),
        DataType::OctetString => {
            let ui_type = node.attribute("UIType").map(|ui| ui.parse::<DataType>()).transpose();
            let bytes = match ui_type.map_err(XmlError::UnknownDataType)? {
                Some(DataType::DateTime) => {
                    text.parse::<DateTime>().map_err(|_| invalid(DataType::DateTime, text))?.encode().to_vec()
                }
                Some(DataType::Date) => text.parse::<Date>().map_err(|_| invalid(DataType::Date, text))?.encode().to_vec(),
                Some(DataType::Time) => text.parse::<Time>().map_err(|_| invalid(DataType::Time, text))?.encode().to_vec(),
                _ => unhex(text).ok_or_else(|| invalid(data_type, text))?,
            };
            Data::OctetString(bytes)
        }
        DataType::VisibleString => Data::VisibleString(text.to_owned()),
        DataType::Utf8String => Data::Utf8String(text.to_owned()),
        DataType::Bcd => Data::Bcd(number(data_type, text)?),
        DataType::Integer => Data::Integer(number(data_type, text)?),
        DataType::Long => Data::Long(number(data_type, text)?),
        DataType::DoubleLong => Data::DoubleLong(number(data_type, text)?),
        DataType::Long64 => Data::Long64(number(data_type, text)?),
        DataType::Unsigned => Data::Unsigned(number(data_type, text)?),
        DataType::LongUnsigned => Data::LongUnsigned(number(data_type, text)?),
        DataType::DoubleLongUnsigned => Data::DoubleLongUnsigned(number(data_type, text)?),
        DataType::Long64Unsigned => Data::Long64Unsigned(number(data_type, text)?),
        DataType::Enum => Data::Enum(number(data_type, text)?),
        DataType::Float32 => Data::Float32(number(data_type, text)?),
        DataType::Float64 => Data::Float64(number(data_type, text)?),
        DataType::DateTime => Data::DateTime(text.parse().map_err(|_| invalid(data_type, text))?),
        DataType::Date => Data::Date(text.parse().map_err(|_| invalid(data_type, text))?),
        DataType::Time => Data::Time(text.parse().map_err(|_| invalid(data_type, text))?),
    })
}

/// Rebuilds one object from its `Object` element.
pub fn read_object(node: &XmlNode) -> Result<Box<dyn CosemObject>, XmlError> {
    let type_name = node.attribute("Type").ok_or_else(|| XmlError::MissingElement(format!("{OBJECT}@Type")))?;
    let object_type: ObjectType =
        type_name.parse().map_err(XmlError::UnknownObjectType)?;
    let mut object = create_object(object_type);

    let base = object.base_mut();
    if let Some(sn) = node.child("SN") {
        base.short_name = number(DataType::LongUnsigned, &sn.text)?;
    }
    if let Some(ln) = node.child("LN") {
        let ln = ln.text.parse::<ObisCode>().map_err(|_| invalid(DataType::OctetString, &ln.text))?;
        base.logical_name = Some(ln);
    }
    base.description = node.child("Description").map(|d| d.text.clone());

    for child in &node.children {
        let known = matches!(child.name.as_str(), "SN" | "LN" | "Description")
            || (2..=object.attribute_count()).any(|i| object.attribute_name(i).is_ok_and(|n| n == child.name));
        if !known {
            debug!("{object_type}: ignoring unknown element <{}>", child.name);
        }
    }

    object.load(node)?;
    Ok(object)
}
