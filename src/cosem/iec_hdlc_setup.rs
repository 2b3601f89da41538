//! COSEM Interface Class 23: IEC HDLC setup
//!
//! Parameters of the HDLC data link layer of a serial port.
//!
//! ## Attributes
//! 1. `logical_name` (inherited)
//! 2. `comm_speed` (enum, default 9600 baud)
//! 3. `window_size_transmit`
//! 4. `window_size_receive`
//! 5. `max_info_field_length_transmit`
//! 6. `max_info_field_length_receive`
//! 7. `inter_octet_time_out`, milliseconds
//! 8. `inactivity_time_out`, seconds
//! 9. `device_address`
//!
//! Every attribute is static, so a fresh object asks for all of them.

use derive_try_from_primitive::TryFromPrimitive;

use crate::access::DataAccessResult;
use crate::cosem::{AttributeDef, InterfaceClass, ObjectBase, integer};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// Serial line speed as enumerated by attribute 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum BaudRate {
    Baud300 = 0,
    Baud600 = 1,
    Baud1200 = 2,
    Baud2400 = 3,
    Baud4800 = 4,
    #[default]
    Baud9600 = 5,
    Baud19200 = 6,
    Baud38400 = 7,
    Baud57600 = 8,
    Baud115200 = 9,
}

impl BaudRate {
    pub const fn bits_per_second(self) -> u32 {
        match self {
            Self::Baud57600 => 57_600,
            Self::Baud115200 => 115_200,
            speed => 300 << speed as u32,
        }
    }
}

/// IEC HDLC setup object, COSEM interface class 23, version 1.
#[derive(Debug, Clone, PartialEq)]
pub struct IecHdlcSetup {
    base: ObjectBase,
    pub communication_speed: BaudRate,
    pub window_size_transmit: u8,
    pub window_size_receive: u8,
    pub max_info_length_transmit: u16,
    pub max_info_length_receive: u16,
    pub inter_octet_timeout: u16,
    pub inactivity_timeout: u16,
    pub device_address: u16,
}

impl Default for IecHdlcSetup {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            communication_speed: BaudRate::Baud9600,
            window_size_transmit: 1,
            window_size_receive: 1,
            max_info_length_transmit: 128,
            max_info_length_receive: 128,
            inter_octet_timeout: 25,
            inactivity_timeout: 120,
            device_address: 0,
        }
    }
}

impl IecHdlcSetup {
    pub fn new(logical_name: ObisCode) -> Self {
        Self::with_logical_name(logical_name)
    }
}

// Window sizes are 1..=7 on the wire.
fn window_size(value: &Data) -> Result<u8, DataAccessResult> {
    match integer::<u8>(value)? {
        size @ 1..=7 => Ok(size),
        _ => Err(DataAccessResult::OtherReason),
    }
}

impl InterfaceClass for IecHdlcSetup {
    const OBJECT_TYPE: ObjectType = ObjectType::IecHdlcSetup;
    const VERSION: u8 = 1;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "Speed",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.communication_speed as u8)),
            |o, v| {
                o.communication_speed =
                    BaudRate::try_from(integer::<u8>(&v)?).map_err(|_| DataAccessResult::OtherReason)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "WindowSizeTX",
            DataType::Unsigned,
            |o, _| Ok(Data::Unsigned(o.window_size_transmit)),
            |o, v| {
                o.window_size_transmit = window_size(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "WindowSizeRX",
            DataType::Unsigned,
            |o, _| Ok(Data::Unsigned(o.window_size_receive)),
            |o, v| {
                o.window_size_receive = window_size(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "MaximumInfoLengthTX",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.max_info_length_transmit)),
            |o, v| {
                o.max_info_length_transmit = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "MaximumInfoLengthRX",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.max_info_length_receive)),
            |o, v| {
                o.max_info_length_receive = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "InterCharachterTimeout",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.inter_octet_timeout)),
            |o, v| {
                o.inter_octet_timeout = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "InactivityTimeout",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.inactivity_timeout)),
            |o, v| {
                o.inactivity_timeout = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "DeviceAddress",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.device_address)),
            |o, v| {
                o.device_address = integer(&v)?;
                Ok(())
            },
        ),
    ];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosem::CosemObject;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let setup = IecHdlcSetup::default();
        assert_eq!(setup.class_id(), 23);
        assert_eq!(setup.version(), 1);
        assert_eq!(setup.attribute_count(), 9);
        assert_eq!(setup.get_value(2, None).unwrap(), Data::Enum(5));
        assert_eq!(setup.get_value(5, None).unwrap(), Data::LongUnsigned(128));
        assert_eq!(setup.get_value(8, None).unwrap(), Data::LongUnsigned(120));
    }

    #[test]
    fn test_fresh_object_reads_everything() {
        let setup = IecHdlcSetup::default();
        assert_eq!(setup.attribute_indexes_to_read(false), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_set_speed() {
        let mut setup = IecHdlcSetup::default();
        setup.set_value(2, Data::Enum(9)).unwrap();
        assert_eq!(setup.communication_speed, BaudRate::Baud115200);
        assert!(matches!(setup.set_value(2, Data::Enum(10)), Err(Error::DataAccess(DataAccessResult::OtherReason))));
    }

    #[test]
    fn test_window_size_range() {
        let mut setup = IecHdlcSetup::default();
        setup.set_value(3, Data::Unsigned(7)).unwrap();
        assert_eq!(setup.window_size_transmit, 7);
        assert!(setup.set_value(4, Data::Unsigned(0)).is_err());
        assert!(setup.set_value(4, Data::Unsigned(8)).is_err());
        assert_eq!(setup.window_size_receive, 1);
    }

    #[test]
    fn test_numeric_narrowing() {
        let mut setup = IecHdlcSetup::default();
        setup.set_value(9, Data::DoubleLongUnsigned(0x10)).unwrap();
        assert_eq!(setup.device_address, 0x10);
        assert!(matches!(
            setup.set_value(9, Data::DoubleLongUnsigned(0x1_0000)),
            Err(Error::DataAccess(DataAccessResult::TypeUnmatched))
        ));
    }

    #[test]
    fn test_bits_per_second() {
        assert_eq!(BaudRate::Baud300.bits_per_second(), 300);
        assert_eq!(BaudRate::Baud9600.bits_per_second(), 9600);
        assert_eq!(BaudRate::Baud38400.bits_per_second(), 38400);
        assert_eq!(BaudRate::Baud115200.bits_per_second(), 115200);
    }
}
