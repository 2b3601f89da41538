use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use nom::{IResult, Parser, number::complete::u8};
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::error::CodecError;

/// An OBIS code, the 6-byte logical name of a COSEM object.
///
/// `Display` renders the dotted form used by persisted device profiles
/// (`1.0.1.8.0.255`); the alternate form (`{:#}`) renders the IEC notation
/// (`1-0:1.8.0*255`). `FromStr` accepts both.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObisCode {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub f: u8,
}

impl ObisCode {
    pub const fn new(a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], Self, CodecError> {
        let (input, (a, b, c, d, e, f)) = (u8, u8, u8, u8, u8, u8).parse(input)?;
        Ok((input, Self::new(a, b, c, d, e, f)))
    }

    /// Builds an OBIS code from the content of a 6-byte octet-string.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [a, b, c, d, e, f] => Some(Self::new(a, b, c, d, e, f)),
            _ => None,
        }
    }

    pub const fn encode(&self) -> [u8; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Display for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}-{}:{}.{}.{}*{}", self.a, self.b, self.c, self.d, self.e, self.f)
        } else {
            write!(f, "{}.{}.{}.{}.{}.{}", self.a, self.b, self.c, self.d, self.e, self.f)
        }
    }
}

impl Debug for ObisCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ObisCode({:#})", self)
    }
}

/// Error returned when a string is not a valid OBIS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid OBIS code {0:?}")]
pub struct ParseObisCodeError(pub String);

impl FromStr for ObisCode {
    type Err = ParseObisCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields = s
            .trim()
            .split(['.', '-', ':', '*'])
            .map(str::parse::<u8>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseObisCodeError(s.to_owned()))?;

        Self::from_bytes(&fields).ok_or_else(|| ParseObisCodeError(s.to_owned()))
    }
}

#[cfg(feature = "serde")]
impl Serialize for ObisCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_remaining() {
        let input = [10, 20, 30, 40, 50, 60, 0xFF, 0xAA];
        let (remaining, code) = ObisCode::parse(&input).unwrap();

        assert_eq!(remaining, &[0xFF, 0xAA]);
        assert_eq!(code, ObisCode::new(10, 20, 30, 40, 50, 60));
    }

    #[test]
    fn test_parse_insufficient_input() {
        let input = [1, 2, 3, 4, 5];
        assert!(ObisCode::parse(&input).is_err());
    }

    #[test]
    fn test_display_dotted_and_alternate() {
        let code = ObisCode::new(1, 0, 1, 8, 0, 255);

        assert_eq!(code.to_string(), "1.0.1.8.0.255");
        assert_eq!(format!("{:#}", code), "1-0:1.8.0*255");
        assert_eq!(format!("{:?}", code), "ObisCode(1-0:1.8.0*255)");
    }

    #[test]
    fn test_from_str_both_notations() {
        let expected = ObisCode::new(1, 0, 32, 7, 0, 255);

        assert_eq!("1.0.32.7.0.255".parse::<ObisCode>().unwrap(), expected);
        assert_eq!("1-0:32.7.0*255".parse::<ObisCode>().unwrap(), expected);
        assert_eq!(" 1.0.32.7.0.255 ".parse::<ObisCode>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("1.0.1.8.0".parse::<ObisCode>().is_err());
        assert!("1.0.1.8.0.256".parse::<ObisCode>().is_err());
        assert!("1.0.1.8.0.255.1".parse::<ObisCode>().is_err());
        assert!("".parse::<ObisCode>().is_err());
    }

    #[test]
    fn test_from_bytes_and_encode() {
        let code = ObisCode::from_bytes(&[0, 0, 1, 0, 0, 255]).unwrap();

        assert_eq!(code.encode(), [0, 0, 1, 0, 0, 255]);
        assert_eq!(ObisCode::from_bytes(&[0, 0, 1]), None);
    }

    #[test]
    fn test_ordering() {
        let code1 = ObisCode::new(1, 0, 1, 8, 0, 255);
        let code2 = ObisCode::new(1, 0, 1, 8, 1, 255);
        let code3 = ObisCode::new(1, 0, 2, 8, 0, 255);

        assert!(code1 < code2);
        assert!(code2 < code3);
    }
}
