use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

use crate::access::{ActionResult, DataAccessResult};
use crate::data::DataType;
use crate::object_type::ObjectType;

/// Failure of the A-XDR value codec.
///
/// These are hard failures: the byte stream is malformed or the caller broke
/// the codec contract. The session layer decides whether to drop the message
/// or the whole association.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch { expected: DataType, actual: DataType },
    #[error("buffer underrun")]
    BufferUnderrun,
    #[error("unknown data type tag 0x{0:02X}")]
    UnknownType(u8),
    #[error("malformed value: {0}")]
    Malformed(String),
}

impl ParseError<&[u8]> for CodecError {
    fn from_error_kind(_input: &[u8], kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof | ErrorKind::Complete => Self::BufferUnderrun,
            kind => Self::Malformed(format!("{kind:?}")),
        }
    }

    fn append(_input: &[u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

/// Failure while loading or saving the XML representation of objects.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("missing element <{0}>")]
    MissingElement(String),
    #[error("unknown object type {0:?}")]
    UnknownObjectType(String),
    #[error("unknown data type {0:?}")]
    UnknownDataType(String),
    #[error("invalid {data_type:?} value {text:?}")]
    InvalidValue { data_type: DataType, text: String },
    #[error("{object_type:?} rejected <{element}>: {result:?}")]
    Rejected { object_type: ObjectType, element: String, result: DataAccessResult },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(err.into())
    }
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    /// The attribute index is outside the class's declared range. This is a
    /// local defect, not something to report to a remote peer.
    #[error("attribute index {0} is out of range")]
    InvalidAttributeIndex(u8),
    /// The method index is outside the class's declared range.
    #[error("method index {0} is out of range")]
    InvalidMethodIndex(u8),
    /// GET or SET refused at protocol level.
    #[error("data access refused: {0:?}")]
    DataAccess(DataAccessResult),
    /// ACTION refused at protocol level.
    #[error("action refused: {0:?}")]
    Action(ActionResult),
    #[error("object {0} not found")]
    NotFound(String),
    #[error("object {0} references itself")]
    ReferenceCycle(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Xml(#[from] XmlError),
}

impl Error {
    /// The result code to send back to the remote peer, if this error is a
    /// protocol-level refusal.
    pub fn access_result(&self) -> Option<DataAccessResult> {
        match self {
            Self::DataAccess(result) => Some(*result),
            Self::Action(ActionResult::ReadWriteDenied) => Some(DataAccessResult::ReadWriteDenied),
            Self::Action(ActionResult::TypeUnmatched) => Some(DataAccessResult::TypeUnmatched),
            Self::Action(_) => Some(DataAccessResult::OtherReason),
            _ => None,
        }
    }
}

impl From<DataAccessResult> for Error {
    fn from(result: DataAccessResult) -> Self {
        Self::DataAccess(result)
    }
}

impl From<ActionResult> for Error {
    fn from(result: ActionResult) -> Self {
        Self::Action(result)
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_maps_eof_to_underrun() {
        let err = CodecError::from_error_kind(&b""[..], ErrorKind::Eof);
        assert_eq!(err, CodecError::BufferUnderrun);
    }

    #[test]
    fn test_access_result_of_protocol_errors() {
        assert_eq!(
            Error::DataAccess(DataAccessResult::ReadWriteDenied).access_result(),
            Some(DataAccessResult::ReadWriteDenied)
        );
        assert_eq!(
            Error::Action(ActionResult::ReadWriteDenied).access_result(),
            Some(DataAccessResult::ReadWriteDenied)
        );
        assert_eq!(Error::InvalidAttributeIndex(9).access_result(), None);
        assert_eq!(Error::Codec(CodecError::BufferUnderrun).access_result(), None);
    }
}
