use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

use nom::{
    IResult, Parser,
    bytes::complete::take,
    multi::count,
    number::complete::{be_f32, be_f64, be_i16, be_i32, be_i64, be_u16, be_u32, be_u64, i8, u8},
};
#[cfg(feature = "serde")]
use serde::Serialize;

use crate::access::DataAccessResult;
use crate::date_time::{Date, DateTime, Time};
use crate::error::CodecError;

/// A-XDR type tags.
///
/// Reference: Green Book, `Data` CHOICE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[non_exhaustive]
#[rustfmt::skip]
pub enum DataType {
  Null               =   0,
  Array              =   1,
  Structure          =   2,
  Boolean            =   3,
  BitString          =   4,
  DoubleLong         =   5,
  DoubleLongUnsigned =   6,
  OctetString        =   9,
  VisibleString      =  10,
  Utf8String         =  12,
  Bcd                =  13,
  Integer            =  15,
  Long               =  16,
  Unsigned           =  17,
  LongUnsigned       =  18,
  Long64             =  20,
  Long64Unsigned     =  21,
  Enum               =  22,
  Float32            =  23,
  Float64            =  24,
  DateTime           =  25,
  Date               =  26,
  Time               =  27,
  DontCare           = 255,
}

impl TryFrom<u8> for DataType {
    type Error = u8;

    fn try_from(dt: u8) -> Result<Self, Self::Error> {
        Ok(match dt {
            0x00 => Self::Null,
            0x01 => Self::Array,
            0x02 => Self::Structure,
            0x03 => Self::Boolean,
            0x04 => Self::BitString,
            0x05 => Self::DoubleLong,
            0x06 => Self::DoubleLongUnsigned,
            0x09 => Self::OctetString,
            0x0a => Self::VisibleString,
            0x0c => Self::Utf8String,
            0x0d => Self::Bcd,
            0x0f => Self::Integer,
            0x10 => Self::Long,
            0x11 => Self::Unsigned,
            0x12 => Self::LongUnsigned,
            0x14 => Self::Long64,
            0x15 => Self::Long64Unsigned,
            0x16 => Self::Enum,
            0x17 => Self::Float32,
            0x18 => Self::Float64,
            0x19 => Self::DateTime,
            0x1a => Self::Date,
            0x1b => Self::Time,
            0xff => Self::DontCare,
            dt => return Err(dt),
        })
    }
}

impl DataType {
    /// Name used for the `Type` and `UIType` attributes of persisted values.
    #[rustfmt::skip]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null               => "None",
            Self::Array              => "Array",
            Self::Structure          => "Structure",
            Self::Boolean            => "Boolean",
            Self::BitString          => "BitString",
            Self::DoubleLong         => "Int32",
            Self::DoubleLongUnsigned => "UInt32",
            Self::OctetString        => "OctetString",
            Self::VisibleString      => "String",
            Self::Utf8String         => "StringUTF8",
            Self::Bcd                => "BCD",
            Self::Integer            => "Int8",
            Self::Long               => "Int16",
            Self::Unsigned           => "UInt8",
            Self::LongUnsigned       => "UInt16",
            Self::Long64             => "Int64",
            Self::Long64Unsigned     => "UInt64",
            Self::Enum               => "Enum",
            Self::Float32            => "Float32",
            Self::Float64            => "Float64",
            Self::DateTime           => "DateTime",
            Self::Date               => "Date",
            Self::Time               => "Time",
            Self::DontCare           => "DontCare",
        }
    }

    /// Whether values of this type carry a count followed by tagged items.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Array | Self::Structure)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [DataType; 24] = [
            DataType::Null,
            DataType::Array,
            DataType::Structure,
            DataType::Boolean,
            DataType::BitString,
            DataType::DoubleLong,
            DataType::DoubleLongUnsigned,
            DataType::OctetString,
            DataType::VisibleString,
            DataType::Utf8String,
            DataType::Bcd,
            DataType::Integer,
            DataType::Long,
            DataType::Unsigned,
            DataType::LongUnsigned,
            DataType::Long64,
            DataType::Long64Unsigned,
            DataType::Enum,
            DataType::Float32,
            DataType::Float64,
            DataType::DateTime,
            DataType::Date,
            DataType::Time,
            DataType::DontCare,
        ];
        ALL.into_iter().find(|dt| dt.as_str() == s).ok_or_else(|| s.to_owned())
    }
}

/// A tagged DLMS value.
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub enum Data {
    #[default]
    Null,
    Array(Vec<Data>),
    Structure(Vec<Data>),
    Boolean(bool),
    BitString(Vec<bool>),
    DoubleLong(i32),
    DoubleLongUnsigned(u32),
    OctetString(Vec<u8>),
    VisibleString(String),
    Utf8String(String),
    Bcd(u8),
    Integer(i8),
    Long(i16),
    Unsigned(u8),
    LongUnsigned(u16),
    Long64(i64),
    Long64Unsigned(u64),
    Enum(u8),
    Float32(f32),
    Float64(f64),
    DateTime(DateTime),
    Date(Date),
    Time(Time),
    DontCare,
}

/// Deepest nesting of arrays and structures the decoder accepts.
pub const MAX_NESTING: usize = 64;

/// Reads an A-XDR length or element count.
///
/// Below `0x80` the byte is the length; otherwise its low bits give the
/// number of big-endian length bytes that follow (1 to 4).
pub(crate) fn parse_length(input: &[u8]) -> IResult<&[u8], usize, CodecError> {
    let (input, first) = u8(input)?;
    if first < 0x80 {
        return Ok((input, usize::from(first)));
    }
    let width = usize::from(first & 0x7F);
    if width == 0 || width > 4 {
        return Err(nom::Err::Failure(CodecError::Malformed(format!("length prefix 0x{first:02X}"))));
    }
    let (input, bytes) = take(width).parse(input)?;
    Ok((input, bytes.iter().fold(0usize, |acc, b| (acc << 8) | usize::from(*b))))
}

pub(crate) fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = (len as u32).to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    out.push(0x80 | (bytes.len() - skip) as u8);
    out.extend_from_slice(&bytes[skip..]);
}

impl Data {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Null => DataType::Null,
            Self::Array(_) => DataType::Array,
            Self::Structure(_) => DataType::Structure,
            Self::Boolean(_) => DataType::Boolean,
            Self::BitString(_) => DataType::BitString,
            Self::DoubleLong(_) => DataType::DoubleLong,
            Self::DoubleLongUnsigned(_) => DataType::DoubleLongUnsigned,
            Self::OctetString(_) => DataType::OctetString,
            Self::VisibleString(_) => DataType::VisibleString,
            Self::Utf8String(_) => DataType::Utf8String,
            Self::Bcd(_) => DataType::Bcd,
            Self::Integer(_) => DataType::Integer,
            Self::Long(_) => DataType::Long,
            Self::Unsigned(_) => DataType::Unsigned,
            Self::LongUnsigned(_) => DataType::LongUnsigned,
            Self::Long64(_) => DataType::Long64,
            Self::Long64Unsigned(_) => DataType::Long64Unsigned,
            Self::Enum(_) => DataType::Enum,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::DateTime(_) => DataType::DateTime,
            Self::Date(_) => DataType::Date,
            Self::Time(_) => DataType::Time,
            Self::DontCare => DataType::DontCare,
        }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self, CodecError> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> IResult<&[u8], Self, CodecError> {
        let (input, tag) = u8(input)?;
        let data_type =
            DataType::try_from(tag).map_err(|tag| nom::Err::Failure(CodecError::UnknownType(tag)))?;
        Self::parse_payload(data_type, input, depth)
    }

    /// Parses the content of a value whose tag has already been consumed.
    /// `depth` counts the arrays and structures enclosing it.
    fn parse_payload(data_type: DataType, input: &[u8], depth: usize) -> IResult<&[u8], Self, CodecError> {
        Ok(match data_type {
            DataType::Null => (input, Data::Null),
            DataType::DontCare => (input, Data::DontCare),
            DataType::Array | DataType::Structure => {
                if depth >= MAX_NESTING {
                    return Err(nom::Err::Failure(CodecError::Malformed(format!(
                        "more than {MAX_NESTING} nested arrays or structures"
                    ))));
                }
                let (input, n) = parse_length(input)?;
                let (input, items) = count(|i| Self::parse_nested(i, depth + 1), n).parse(input)?;
                if data_type == DataType::Array {
                    (input, Data::Array(items))
                } else {
                    (input, Data::Structure(items))
                }
            }
            DataType::Boolean => {
                let (input, b) = u8(input)?;
                (input, Data::Boolean(b != 0))
            }
            DataType::BitString => {
                let (input, bits) = parse_length(input)?;
                let (input, bytes) = take(bits.div_ceil(8)).parse(input)?;
                let bits = (0..bits).map(|i| bytes[i / 8] & (0x80 >> (i % 8)) != 0).collect();
                (input, Data::BitString(bits))
            }
            DataType::OctetString => {
                let (input, n) = parse_length(input)?;
                let (input, bytes) = take(n).parse(input)?;
                (input, Data::OctetString(bytes.to_vec()))
            }
            DataType::VisibleString | DataType::Utf8String => {
                let (input, n) = parse_length(input)?;
                let (input, bytes) = take(n).parse(input)?;
                let s = String::from_utf8(bytes.to_vec()).map_err(|_| {
                    nom::Err::Failure(CodecError::Malformed(format!("{data_type:?} is not valid text")))
                })?;
                if data_type == DataType::VisibleString {
                    (input, Data::VisibleString(s))
                } else {
                    (input, Data::Utf8String(s))
                }
            }
            DataType::Bcd => {
                let (input, n) = u8(input)?;
                (input, Data::Bcd(n))
            }
            DataType::Integer => {
                let (input, n) = i8(input)?;
                (input, Data::Integer(n))
            }
            DataType::Long => {
                let (input, n) = be_i16(input)?;
                (input, Data::Long(n))
            }
            DataType::DoubleLong => {
                let (input, n) = be_i32(input)?;
                (input, Data::DoubleLong(n))
            }
            DataType::Long64 => {
                let (input, n) = be_i64(input)?;
                (input, Data::Long64(n))
            }
            DataType::Unsigned => {
                let (input, n) = u8(input)?;
                (input, Data::Unsigned(n))
            }
            DataType::LongUnsigned => {
                let (input, n) = be_u16(input)?;
                (input, Data::LongUnsigned(n))
            }
            DataType::DoubleLongUnsigned => {
                let (input, n) = be_u32(input)?;
                (input, Data::DoubleLongUnsigned(n))
            }
            DataType::Long64Unsigned => {
                let (input, n) = be_u64(input)?;
                (input, Data::Long64Unsigned(n))
            }
            DataType::Enum => {
                let (input, n) = u8(input)?;
                (input, Data::Enum(n))
            }
            DataType::Float32 => {
                let (input, n) = be_f32(input)?;
                (input, Data::Float32(n))
            }
            DataType::Float64 => {
                let (input, n) = be_f64(input)?;
                (input, Data::Float64(n))
            }
            DataType::DateTime => {
                let (input, dt) = DateTime::parse(input)?;
                (input, Data::DateTime(dt))
            }
            DataType::Date => {
                let (input, date) = Date::parse(input)?;
                (input, Data::Date(date))
            }
            DataType::Time => {
                let (input, time) = Time::parse(input)?;
                (input, Data::Time(time))
            }
        })
    }

    /// Encodes the value with its tag.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.push(self.data_type() as u8);
        match self {
            Self::Null | Self::DontCare => {}
            Self::Array(items) | Self::Structure(items) => {
                encode_length(items.len(), out);
                for item in items {
                    item.encode_into(out);
                }
            }
            Self::Boolean(b) => out.push(u8::from(*b)),
            Self::BitString(bits) => {
                encode_length(bits.len(), out);
                let mut bytes = vec![0u8; bits.len().div_ceil(8)];
                for (i, _) in bits.iter().enumerate().filter(|(_, bit)| **bit) {
                    bytes[i / 8] |= 0x80 >> (i % 8);
                }
                out.extend_from_slice(&bytes);
            }
            Self::OctetString(bytes) => {
                encode_length(bytes.len(), out);
                out.extend_from_slice(bytes);
            }
            Self::VisibleString(s) | Self::Utf8String(s) => {
                encode_length(s.len(), out);
                out.extend_from_slice(s.as_bytes());
            }
            Self::Bcd(n) | Self::Unsigned(n) | Self::Enum(n) => out.push(*n),
            Self::Integer(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::Long(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::DoubleLong(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::Long64(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::LongUnsigned(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::DoubleLongUnsigned(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::Long64Unsigned(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::Float32(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::Float64(n) => out.extend_from_slice(&n.to_be_bytes()),
            Self::DateTime(dt) => out.extend_from_slice(&dt.encode()),
            Self::Date(date) => out.extend_from_slice(&date.encode()),
            Self::Time(time) => out.extend_from_slice(&time.encode()),
        }
    }

    pub(crate) fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Self::Integer(n) => n.into(),
            Self::Long(n) => n.into(),
            Self::DoubleLong(n) => n.into(),
            Self::Long64(n) => n.into(),
            Self::Unsigned(n) | Self::Enum(n) | Self::Bcd(n) => n.into(),
            Self::LongUnsigned(n) => n.into(),
            Self::DoubleLongUnsigned(n) => n.into(),
            Self::Long64Unsigned(n) => n.into(),
            _ => return None,
        })
    }

    /// The value of any integer-like variant (including `Enum` and `Bcd`).
    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|n| u64::try_from(n).ok())
    }

    /// Any numeric value as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Float32(n) => Some(f64::from(n)),
            Self::Float64(n) => Some(n),
            _ => self.as_i128().map(|n| n as f64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::OctetString(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::VisibleString(s) | Self::Utf8String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of an `Array` or `Structure`.
    pub fn as_items(&self) -> Option<&[Data]> {
        match self {
            Self::Array(items) | Self::Structure(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_items(self) -> Option<Vec<Data>> {
        match self {
            Self::Array(items) | Self::Structure(items) => Some(items),
            _ => None,
        }
    }

    /// Converts an integer-like value into `T`, answering `TypeUnmatched`
    /// when the variant is not an integer or the value does not fit.
    pub fn to_integer<T: TryFrom<i128>>(&self) -> Result<T, DataAccessResult> {
        self.as_i128().and_then(|n| T::try_from(n).ok()).ok_or(DataAccessResult::TypeUnmatched)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<u8> for Data {
    fn from(n: u8) -> Self {
        Self::Unsigned(n)
    }
}

impl From<u16> for Data {
    fn from(n: u16) -> Self {
        Self::LongUnsigned(n)
    }
}

impl From<u32> for Data {
    fn from(n: u32) -> Self {
        Self::DoubleLongUnsigned(n)
    }
}

impl From<i32> for Data {
    fn from(n: i32) -> Self {
        Self::DoubleLong(n)
    }
}

impl From<Vec<u8>> for Data {
    fn from(bytes: Vec<u8>) -> Self {
        Self::OctetString(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_try_from_valid() {
        assert_eq!(DataType::try_from(0x00).unwrap(), DataType::Null);
        assert_eq!(DataType::try_from(0x01).unwrap(), DataType::Array);
        assert_eq!(DataType::try_from(0x0d).unwrap(), DataType::Bcd);
        assert_eq!(DataType::try_from(0x15).unwrap(), DataType::Long64Unsigned);
        assert_eq!(DataType::try_from(0x1b).unwrap(), DataType::Time);
        assert_eq!(DataType::try_from(0xff).unwrap(), DataType::DontCare);
    }

    #[test]
    fn test_data_type_try_from_invalid() {
        assert_eq!(DataType::try_from(0x07), Err(0x07));
        assert_eq!(DataType::try_from(0x0b), Err(0x0b));
        // compact-array is not part of the supported grammar
        assert_eq!(DataType::try_from(0x13), Err(0x13));
        assert_eq!(DataType::try_from(0x1c), Err(0x1c));
    }

    #[test]
    fn test_data_type_names() {
        assert_eq!(DataType::LongUnsigned.as_str(), "UInt16");
        assert_eq!("UInt16".parse::<DataType>().unwrap(), DataType::LongUnsigned);
        assert_eq!("StringUTF8".parse::<DataType>().unwrap(), DataType::Utf8String);
        assert!("UInt128".parse::<DataType>().is_err());
    }

    #[test]
    fn test_parse_length_short_and_long_form() {
        assert_eq!(parse_length(&[0x05, 0xAA]).unwrap(), (&[0xAA][..], 5));
        assert_eq!(parse_length(&[0x81, 0x80]).unwrap(), (&[][..], 0x80));
        assert_eq!(parse_length(&[0x82, 0x01, 0x2C]).unwrap(), (&[][..], 300));
        assert!(parse_length(&[0x85, 0, 0, 0, 0, 1]).is_err());
        assert!(parse_length(&[0x82, 0x01]).is_err());
    }

    #[test]
    fn test_encode_length() {
        let mut out = Vec::new();
        encode_length(0x7F, &mut out);
        encode_length(0x80, &mut out);
        encode_length(300, &mut out);
        assert_eq!(out, [0x7F, 0x81, 0x80, 0x82, 0x01, 0x2C]);
    }

    #[test]
    fn test_data_parse_integer() {
        let input = [0x0f, 0xD6, 0xFF];
        let (remaining, data) = Data::parse(&input).unwrap();

        assert_eq!(remaining, &[0xFF]);
        assert_eq!(data, Data::Integer(-42));
    }

    #[test]
    fn test_data_parse_unsigned_types() {
        assert_eq!(Data::parse(&[0x11, 0x2A]).unwrap().1, Data::Unsigned(42));
        assert_eq!(Data::parse(&[0x12, 0x01, 0x00]).unwrap().1, Data::LongUnsigned(256));
        assert_eq!(Data::parse(&[0x06, 0x00, 0x00, 0x30, 0x39]).unwrap().1, Data::DoubleLongUnsigned(12345));
    }

    #[test]
    fn test_data_parse_structure() {
        // scaler -2, unit W
        let input = [0x02, 0x02, 0x0F, 0xFE, 0x16, 0x1B];
        let (_, data) = Data::parse(&input).unwrap();

        assert_eq!(data, Data::Structure(vec![Data::Integer(-2), Data::Enum(27)]));
        assert_eq!(data.encode(), input);
    }

    #[test]
    fn test_data_parse_bit_string() {
        let input = [0x04, 0x0A, 0b1010_0000, 0b0100_0000];
        let (_, data) = Data::parse(&input).unwrap();

        let Data::BitString(bits) = &data else { panic!("expected bit-string") };
        assert_eq!(bits.len(), 10);
        assert!(bits[0] && bits[2] && bits[9]);
        assert!(!bits[1] && !bits[8]);
        assert_eq!(data.encode(), input);
    }

    #[test]
    fn test_data_parse_strings() {
        let input = [0x0A, 0x03, b'a', b'b', b'c'];
        assert_eq!(Data::parse(&input).unwrap().1, Data::VisibleString("abc".into()));

        let input = [0x0C, 0x02, 0xC3, 0xA4];
        assert_eq!(Data::parse(&input).unwrap().1, Data::Utf8String("ä".into()));
    }

    #[test]
    fn test_data_parse_long_octet_string() {
        let mut input = vec![0x09, 0x81, 0x90];
        input.extend(0..0x90);
        let (_, data) = Data::parse(&input).unwrap();

        assert_eq!(data.as_bytes().map(<[u8]>::len), Some(0x90));
        assert_eq!(data.encode(), input);
    }

    #[test]
    fn test_data_parse_unknown_type() {
        let result = Data::parse(&[0x13, 0x00]);
        assert_eq!(result.unwrap_err(), nom::Err::Failure(CodecError::UnknownType(0x13)));
    }

    #[test]
    fn test_data_parse_underrun() {
        let result = Data::parse(&[0x06, 0x00, 0x00]);
        assert_eq!(result.unwrap_err(), nom::Err::Error(CodecError::BufferUnderrun));

        let result = Data::parse(&[0x01, 0x02, 0x11, 0x01]);
        assert!(result.is_err());
    }

    #[test]
    fn test_data_parse_nesting_limit() {
        let mut nested = [0x01, 0x01].repeat(MAX_NESTING);
        nested.push(0x00);
        let (rest, mut value) = Data::parse(&nested).unwrap();
        assert!(rest.is_empty());
        for _ in 0..MAX_NESTING {
            value = value.into_items().unwrap().remove(0);
        }
        assert_eq!(value, Data::Null);

        let mut too_deep = [0x02, 0x01].repeat(MAX_NESTING + 1);
        too_deep.push(0x00);
        assert!(matches!(Data::parse(&too_deep), Err(nom::Err::Failure(CodecError::Malformed(_)))));
    }

    #[test]
    fn test_encode_float() {
        assert_eq!(Data::Float32(1.5).encode(), [0x17, 0x3F, 0xC0, 0x00, 0x00]);
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Data::Long(-5).as_i64(), Some(-5));
        assert_eq!(Data::Long(-5).as_u64(), None);
        assert_eq!(Data::Long64Unsigned(u64::MAX).as_u64(), Some(u64::MAX));
        assert_eq!(Data::Long64Unsigned(u64::MAX).as_i64(), None);
        assert_eq!(Data::Enum(3).as_f64(), Some(3.0));
        assert_eq!(Data::OctetString(vec![]).as_i64(), None);

        assert_eq!(Data::DoubleLongUnsigned(300).to_integer::<u16>(), Ok(300));
        assert_eq!(Data::DoubleLongUnsigned(300).to_integer::<u8>(), Err(DataAccessResult::TypeUnmatched));
        assert_eq!(Data::Boolean(true).to_integer::<u8>(), Err(DataAccessResult::TypeUnmatched));
    }
}
