//! COSEM Interface Class 70: Disconnect control
//!
//! Drives the supply disconnector of a meter.
//!
//! ## Attributes
//! 1. `logical_name` (inherited)
//! 2. `output_state`, `true` while the supply is connected
//! 3. `control_state`
//! 4. `control_mode`
//!
//! ## Methods
//! 1. `remote_disconnect`
//! 2. `remote_reconnect`
//!
//! The control mode decides which remote transitions are allowed. Mode 0
//! locks the disconnector; in modes 1, 3 and 5 a remote reconnect closes
//! the supply directly, in modes 2, 4 and 6 it only arms the disconnector
//! for a manual reconnection.

use derive_try_from_primitive::TryFromPrimitive;
use log::debug;

use crate::access::{ActionResult, DataAccessResult};
use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, integer};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ControlState {
    Disconnected = 0,
    #[default]
    Connected = 1,
    ReadyForReconnection = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum ControlMode {
    /// Always connected, no transition allowed.
    #[default]
    None = 0,
    Mode1 = 1,
    Mode2 = 2,
    Mode3 = 3,
    Mode4 = 4,
    Mode5 = 5,
    Mode6 = 6,
}

impl ControlMode {
    /// Whether a remote reconnect goes straight to `Connected`.
    fn reconnects_directly(self) -> bool {
        matches!(self, Self::Mode1 | Self::Mode3 | Self::Mode5)
    }
}

/// Disconnect control object, COSEM interface class 70.
#[derive(Debug, Clone, PartialEq)]
pub struct DisconnectControl {
    base: ObjectBase,
    pub output_state: bool,
    pub control_state: ControlState,
    pub control_mode: ControlMode,
}

impl Default for DisconnectControl {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            output_state: true,
            control_state: ControlState::Connected,
            control_mode: ControlMode::None,
        }
    }
}

impl DisconnectControl {
    pub fn new(logical_name: ObisCode, control_mode: ControlMode) -> Self {
        Self { control_mode, ..Self::with_logical_name(logical_name) }
    }

    fn enter(&mut self, state: ControlState) {
        debug!("disconnector {:?} -> {:?}", self.control_state, state);
        self.control_state = state;
        self.output_state = state == ControlState::Connected;
    }

    pub fn remote_disconnect(&mut self) -> Result<(), ActionResult> {
        if self.control_mode == ControlMode::None {
            return Err(ActionResult::ReadWriteDenied);
        }
        self.enter(ControlState::Disconnected);
        Ok(())
    }

    pub fn remote_reconnect(&mut self) -> Result<(), ActionResult> {
        match self.control_mode {
            ControlMode::None => Err(ActionResult::ReadWriteDenied),
            mode if mode.reconnects_directly() => {
                self.enter(ControlState::Connected);
                Ok(())
            }
            _ => {
                if self.control_state == ControlState::Disconnected {
                    self.enter(ControlState::ReadyForReconnection);
                }
                Ok(())
            }
        }
    }
}

impl InterfaceClass for DisconnectControl {
    const OBJECT_TYPE: ObjectType = ObjectType::DisconnectControl;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "OutputState",
            DataType::Boolean,
            |o, _| Ok(Data::Boolean(o.output_state)),
            |o, v| {
                o.output_state = v.as_bool().ok_or(DataAccessResult::TypeUnmatched)?;
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "ControlState",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.control_state as u8)),
            |o, v| {
                o.control_state =
                    ControlState::try_from(integer::<u8>(&v)?).map_err(|_| DataAccessResult::OtherReason)?;
                Ok(())
            },
        )
        .volatile(),
        AttributeDef::<Self>::new(
            "ControlMode",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.control_mode as u8)),
            |o, v| {
                o.control_mode = ControlMode::try_from(integer::<u8>(&v)?).map_err(|_| DataAccessResult::OtherReason)?;
                Ok(())
            },
        ),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[
        MethodDef::<Self>::new("RemoteDisconnect", |o, _| o.remote_disconnect().map(|()| None)),
        MethodDef::<Self>::new("RemoteReconnect", |o, _| o.remote_reconnect().map(|()| None)),
    ];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
