use core::fmt;
use core::str::FromStr;

use derive_try_from_primitive::TryFromPrimitive;

/// COSEM interface classes known to this crate, keyed by class id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u16)]
#[non_exhaustive]
#[rustfmt::skip]
pub enum ObjectType {
  Data                  =  1,
  Register              =  3,
  ExtendedRegister      =  4,
  ProfileGeneric        =  7,
  Clock                 =  8,
  IecHdlcSetup          = 23,
  TcpUdpSetup           = 41,
  SecuritySetup         = 64,
  DisconnectControl     = 70,
  G3PlcMacLayerCounters = 90,
}

impl ObjectType {
    pub const ALL: [ObjectType; 10] = [
        ObjectType::Data,
        ObjectType::Register,
        ObjectType::ExtendedRegister,
        ObjectType::ProfileGeneric,
        ObjectType::Clock,
        ObjectType::IecHdlcSetup,
        ObjectType::TcpUdpSetup,
        ObjectType::SecuritySetup,
        ObjectType::DisconnectControl,
        ObjectType::G3PlcMacLayerCounters,
    ];

    pub const fn class_id(&self) -> u16 {
        *self as u16
    }

    /// Name written to the `Type` attribute of a persisted `Object` element.
    #[rustfmt::skip]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Data                  => "Data",
            Self::Register              => "Register",
            Self::ExtendedRegister      => "ExtendedRegister",
            Self::ProfileGeneric        => "ProfileGeneric",
            Self::Clock                 => "Clock",
            Self::IecHdlcSetup          => "IecHdlcSetup",
            Self::TcpUdpSetup           => "TcpUdpSetup",
            Self::SecuritySetup         => "SecuritySetup",
            Self::DisconnectControl     => "DisconnectControl",
            Self::G3PlcMacLayerCounters => "G3PlcMacLayerCounters",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or_else(|| s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_ids() {
        assert_eq!(ObjectType::Register.class_id(), 3);
        assert_eq!(ObjectType::IecHdlcSetup.class_id(), 23);
        assert_eq!(ObjectType::try_from(70).unwrap(), ObjectType::DisconnectControl);
        assert!(ObjectType::try_from(2).is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for object_type in ObjectType::ALL {
            assert_eq!(object_type.as_str().parse::<ObjectType>().unwrap(), object_type);
        }
        assert!("AssociationLn".parse::<ObjectType>().is_err());
    }
}
