//! Byte-buffer codec boundary used by the session layer.
//!
//! [`encode`] and [`decode`] are symmetric: for every value `v` of type `t`
//! built from the grammar in [`crate::data`], `decode(&encode(t, &v)?, 0)`
//! yields `(v, t, len)`.

use log::debug;

use crate::data::{Data, DataType};
use crate::date_time::{Date, DateTime, Time};
use crate::error::CodecError;

/// Encodes `value` as a value of type `data_type`.
///
/// The runtime shape of `value` must match `data_type`. Arrays must be
/// homogeneous; every nested array is checked as well, including arrays
/// inside structure members.
pub fn encode(data_type: DataType, value: &Data) -> Result<Vec<u8>, CodecError> {
    check_type(data_type, value)?;
    Ok(value.encode())
}

fn check_type(expected: DataType, value: &Data) -> Result<(), CodecError> {
    let actual = value.data_type();
    if actual != expected {
        return Err(CodecError::TypeMismatch { expected, actual });
    }
    match value {
        Data::Array(items) => {
            if let Some(first) = items.first() {
                let element = first.data_type();
                items.iter().try_for_each(|item| check_type(element, item))?;
            }
        }
        // members are heterogeneous; only arrays nested in them have a shape to check
        Data::Structure(items) => items.iter().try_for_each(check_nested_arrays)?,
        _ => {}
    }
    Ok(())
}

fn check_nested_arrays(value: &Data) -> Result<(), CodecError> {
    match value {
        Data::Array(_) | Data::Structure(_) => check_type(value.data_type(), value),
        _ => Ok(()),
    }
}

/// Decodes one tagged value starting at `offset`.
///
/// Returns the value, its type and the position right after it.
pub fn decode(bytes: &[u8], offset: usize) -> Result<(Data, DataType, usize), CodecError> {
    let input = bytes.get(offset..).ok_or(CodecError::BufferUnderrun)?;
    match Data::parse(input) {
        Ok((rest, value)) => {
            let data_type = value.data_type();
            Ok((value, data_type, bytes.len() - rest.len()))
        }
        Err(err) => {
            let err = match err {
                nom::Err::Incomplete(_) => CodecError::BufferUnderrun,
                nom::Err::Error(e) | nom::Err::Failure(e) => e,
            };
            debug!("decoding value at offset {offset} failed: {err}");
            Err(err)
        }
    }
}

/// Decodes one tagged value and converts it to `expected` when the wire
/// type differs (for example an octet-string carrying a date-time).
pub fn decode_as(bytes: &[u8], expected: DataType) -> Result<Data, CodecError> {
    let (value, actual, _) = decode(bytes, 0)?;
    if actual == expected { Ok(value) } else { change_type(&value, expected) }
}

/// Converts a value to the type an attribute declares.
///
/// Supported conversions:
/// - octet-string to and from `Date`, `Time` and `DateTime`
/// - integer to integer with range check, integer to float, integral float to integer
/// - text to octet-string and UTF-8 octet-string to text
pub fn change_type(value: &Data, target: DataType) -> Result<Data, CodecError> {
    let actual = value.data_type();
    if actual == target {
        return Ok(value.clone());
    }
    let mismatch = || CodecError::TypeMismatch { expected: target, actual };

    match (value, target) {
        (Data::OctetString(bytes), DataType::DateTime) if bytes.len() == 12 => {
            Ok(Data::DateTime(DateTime::parse(bytes).map_err(|_| mismatch())?.1))
        }
        (Data::OctetString(bytes), DataType::Date) if bytes.len() == 5 => {
            Ok(Data::Date(Date::parse(bytes).map_err(|_| mismatch())?.1))
        }
        (Data::OctetString(bytes), DataType::Time) if bytes.len() == 4 => {
            Ok(Data::Time(Time::parse(bytes).map_err(|_| mismatch())?.1))
        }
        (Data::DateTime(dt), DataType::OctetString) => Ok(Data::OctetString(dt.encode().to_vec())),
        (Data::Date(date), DataType::OctetString) => Ok(Data::OctetString(date.encode().to_vec())),
        (Data::Time(time), DataType::OctetString) => Ok(Data::OctetString(time.encode().to_vec())),
        (Data::VisibleString(s) | Data::Utf8String(s), DataType::OctetString) => {
            Ok(Data::OctetString(s.as_bytes().to_vec()))
        }
        (Data::OctetString(bytes), DataType::VisibleString) if bytes.is_ascii() => {
            Ok(Data::VisibleString(String::from_utf8_lossy(bytes).into_owned()))
        }
        (Data::OctetString(bytes), DataType::Utf8String) => String::from_utf8(bytes.clone())
            .map(Data::Utf8String)
            .map_err(|_| mismatch()),
        (Data::VisibleString(s), DataType::Utf8String) => Ok(Data::Utf8String(s.clone())),
        (Data::Utf8String(s), DataType::VisibleString) if s.is_ascii() => Ok(Data::VisibleString(s.clone())),
        (Data::Float32(_) | Data::Float64(_), _) => {
            let f = value.as_f64().ok_or_else(mismatch)?;
            match target {
                DataType::Float32 => Ok(Data::Float32(f as f32)),
                DataType::Float64 => Ok(Data::Float64(f)),
                _ if f.fract() == 0.0 && f.abs() < 1e19 => integer_as(target, f as i128).ok_or_else(mismatch),
                _ => Err(mismatch()),
            }
        }
        _ => {
            let n = value.as_i128().ok_or_else(mismatch)?;
            integer_as(target, n).ok_or_else(mismatch)
        }
    }
}

fn integer_as(target: DataType, n: i128) -> Option<Data> {
    Some(match target {
        DataType::Integer => Data::Integer(i8::try_from(n).ok()?),
        DataType::Long => Data::Long(i16::try_from(n).ok()?),
        DataType::DoubleLong => Data::DoubleLong(i32::try_from(n).ok()?),
        DataType::Long64 => Data::Long64(i64::try_from(n).ok()?),
        DataType::Unsigned => Data::Unsigned(u8::try_from(n).ok()?),
        DataType::LongUnsigned => Data::LongUnsigned(u16::try_from(n).ok()?),
        DataType::DoubleLongUnsigned => Data::DoubleLongUnsigned(u32::try_from(n).ok()?),
        DataType::Long64Unsigned => Data::Long64Unsigned(u64::try_from(n).ok()?),
        DataType::Enum => Data::Enum(u8::try_from(n).ok()?),
        DataType::Bcd => Data::Bcd(u8::try_from(n).ok()?),
        DataType::Boolean => Data::Boolean(n != 0),
        DataType::Float32 => Data::Float32(n as f32),
        DataType::Float64 => Data::Float64(n as f64),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_time::ClockStatus;

    #[test]
    fn test_encode_checks_type() {
        let result = encode(DataType::LongUnsigned, &Data::Unsigned(1));
        assert_eq!(
            result,
            Err(CodecError::TypeMismatch { expected: DataType::LongUnsigned, actual: DataType::Unsigned })
        );
        assert_eq!(encode(DataType::Unsigned, &Data::Unsigned(1)), Ok(vec![0x11, 0x01]));
    }

    #[test]
    fn test_encode_rejects_heterogeneous_array() {
        let value = Data::Array(vec![Data::Unsigned(1), Data::Long(2)]);
        assert_eq!(
            encode(DataType::Array, &value),
            Err(CodecError::TypeMismatch { expected: DataType::Unsigned, actual: DataType::Long })
        );
    }

    #[test]
    fn test_encode_checks_arrays_inside_structures() {
        let value = Data::Structure(vec![
            Data::OctetString(vec![1]),
            Data::Array(vec![Data::LongUnsigned(1), Data::Unsigned(2)]),
        ]);
        assert_eq!(
            encode(DataType::Structure, &value),
            Err(CodecError::TypeMismatch { expected: DataType::LongUnsigned, actual: DataType::Unsigned })
        );

        let value = Data::Structure(vec![Data::Boolean(true), Data::Array(vec![Data::Unsigned(1), Data::Unsigned(2)])]);
        assert!(encode(DataType::Structure, &value).is_ok());
    }

    #[test]
    fn test_encode_nested_array_of_structures() {
        let row = |n: u16, name: &[u8]| Data::Structure(vec![Data::LongUnsigned(n), Data::OctetString(name.to_vec())]);
        let value = Data::Array(vec![row(1, b"a"), row(2, b"bc")]);
        let bytes = encode(DataType::Array, &value).unwrap();

        assert_eq!(
            bytes,
            [
                0x01, 0x02, //
                0x02, 0x02, 0x12, 0x00, 0x01, 0x09, 0x01, b'a', //
                0x02, 0x02, 0x12, 0x00, 0x02, 0x09, 0x02, b'b', b'c',
            ]
        );
        assert_eq!(decode(&bytes, 0).unwrap(), (value, DataType::Array, bytes.len()));
    }

    #[test]
    fn test_decode_at_offset() {
        let bytes = [0xAA, 0xBB, 0x12, 0x01, 0x00, 0x03, 0x01];
        let (value, data_type, next) = decode(&bytes, 2).unwrap();

        assert_eq!(value, Data::LongUnsigned(256));
        assert_eq!(data_type, DataType::LongUnsigned);
        assert_eq!(next, 5);
        assert_eq!(decode(&bytes, next).unwrap(), (Data::Boolean(true), DataType::Boolean, 7));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode(&[0x12, 0x01], 0), Err(CodecError::BufferUnderrun));
        assert_eq!(decode(&[0x12, 0x01], 5), Err(CodecError::BufferUnderrun));
        assert_eq!(decode(&[0x07], 0), Err(CodecError::UnknownType(0x07)));
        assert_eq!(decode(&[], 0), Err(CodecError::BufferUnderrun));
    }

    #[test]
    fn test_decode_rejects_hostile_nesting() {
        let mut bytes = [0x01, 0x01].repeat(20_000);
        bytes.push(0x00);
        assert!(matches!(decode(&bytes, 0), Err(CodecError::Malformed(_))));

        let mut bytes = [0x01, 0x01].repeat(crate::data::MAX_NESTING);
        bytes.push(0x00);
        let (_, data_type, end) = decode(&bytes, 0).unwrap();
        assert_eq!((data_type, end), (DataType::Array, bytes.len()));
    }

    #[test]
    fn test_decode_as_date_time_octet_string() {
        let dt = DateTime::new(Date::new(2024, 3, 15), Time::new(12, 0, 0, 0), 0, ClockStatus::empty());
        let bytes = Data::OctetString(dt.encode().to_vec()).encode();

        assert_eq!(decode_as(&bytes, DataType::DateTime).unwrap(), Data::DateTime(dt));
        assert_eq!(
            decode_as(&bytes, DataType::Date),
            Err(CodecError::TypeMismatch { expected: DataType::Date, actual: DataType::OctetString })
        );
    }

    #[test]
    fn test_change_type_numeric() {
        assert_eq!(change_type(&Data::Unsigned(200), DataType::Long), Ok(Data::Long(200)));
        assert_eq!(change_type(&Data::Long(-1), DataType::LongUnsigned).unwrap_err(), CodecError::TypeMismatch {
            expected: DataType::LongUnsigned,
            actual: DataType::Long
        });
        assert_eq!(change_type(&Data::Float64(42.0), DataType::Unsigned), Ok(Data::Unsigned(42)));
        assert!(change_type(&Data::Float64(42.5), DataType::Unsigned).is_err());
        assert_eq!(change_type(&Data::Enum(3), DataType::Float32), Ok(Data::Float32(3.0)));
    }

    #[test]
    fn test_change_type_text() {
        assert_eq!(
            change_type(&Data::VisibleString("ab".into()), DataType::OctetString),
            Ok(Data::OctetString(b"ab".to_vec()))
        );
        assert_eq!(
            change_type(&Data::OctetString(b"meter".to_vec()), DataType::VisibleString),
            Ok(Data::VisibleString("meter".into()))
        );
        assert!(change_type(&Data::OctetString(vec![0xFF]), DataType::Utf8String).is_err());
        assert!(change_type(&Data::Boolean(true), DataType::Date).is_err());
    }
}
