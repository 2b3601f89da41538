//! Protocol-level result codes and the selective access bundle.
//!
//! A COSEM object never aborts a session because a request was refused. A
//! refusal is a value: [`DataAccessResult`] for GET/SET, [`ActionResult`] for
//! ACTION. Both carry the numeric codes defined in the Green Book so the
//! session layer can put them on the wire unchanged.

use derive_try_from_primitive::TryFromPrimitive;

use crate::data::Data;

/// Data access result codes (GET and SET).
///
/// Reference: Green Book, `Data-Access-Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum DataAccessResult {
    Success = 0,
    HardwareFault = 1,
    TemporaryFailure = 2,
    ReadWriteDenied = 3,
    ObjectUndefined = 4,
    ObjectClassInconsistent = 9,
    ObjectUnavailable = 11,
    TypeUnmatched = 12,
    ScopeOfAccessViolated = 13,
    DataBlockUnavailable = 14,
    LongGetAborted = 15,
    NoLongGetInProgress = 16,
    LongSetAborted = 17,
    NoLongSetInProgress = 18,
    DataBlockNumberInvalid = 19,
    OtherReason = 250,
}

/// Action result codes (ACTION).
///
/// Reference: Green Book, `Action-Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ActionResult {
    Success = 0,
    HardwareFault = 1,
    TemporaryFailure = 2,
    ReadWriteDenied = 3,
    ObjectUndefined = 4,
    ObjectClassInconsistent = 9,
    ObjectUnavailable = 11,
    TypeUnmatched = 12,
    ScopeOfAccessViolated = 13,
    DataBlockUnavailable = 14,
    LongActionAborted = 15,
    NoLongActionInProgress = 16,
    OtherReason = 250,
}

impl From<DataAccessResult> for ActionResult {
    fn from(result: DataAccessResult) -> Self {
        match result {
            DataAccessResult::Success => Self::Success,
            DataAccessResult::HardwareFault => Self::HardwareFault,
            DataAccessResult::TemporaryFailure => Self::TemporaryFailure,
            DataAccessResult::ReadWriteDenied => Self::ReadWriteDenied,
            DataAccessResult::ObjectUndefined => Self::ObjectUndefined,
            DataAccessResult::ObjectClassInconsistent => Self::ObjectClassInconsistent,
            DataAccessResult::ObjectUnavailable => Self::ObjectUnavailable,
            DataAccessResult::TypeUnmatched => Self::TypeUnmatched,
            DataAccessResult::ScopeOfAccessViolated => Self::ScopeOfAccessViolated,
            DataAccessResult::DataBlockUnavailable => Self::DataBlockUnavailable,
            _ => Self::OtherReason,
        }
    }
}

/// Selective access parameters attached to a GET request.
///
/// The selector value and its parameters are defined by the interface class
/// (for example range and entry descriptors of a profile buffer). Objects
/// that do not support selective access ignore it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectiveAccess {
    /// Access selector (1-based, class specific).
    pub selector: u8,
    /// Selector parameters, usually a structure.
    pub parameters: Data,
}

impl SelectiveAccess {
    pub fn new(selector: u8, parameters: Data) -> Self {
        Self { selector, parameters }
    }
}
