//! COSEM Interface Class 41: TCP-UDP setup
//!
//! Parameters of the TCP or UDP based transport layer of an IP port.
//!
//! ## Attributes
//! 1. `logical_name` (inherited)
//! 2. `tcp_udp_port`, default 4059
//! 3. `ip_reference`, logical name of the IPv4/IPv6 setup object in use,
//!    looked up in the owning collection with `find_by_ln(None, ..)`
//! 4. `mss`, maximum segment size
//! 5. `nb_of_sim_conn`, simultaneous connections
//! 6. `inactivity_time_out`, seconds

use crate::cosem::{AttributeDef, InterfaceClass, ObjectBase, integer, obis_code};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// Port registered for DLMS/COSEM over TCP and UDP.
pub const DLMS_PORT: u16 = 4059;

/// TCP-UDP setup object, COSEM interface class 41.
#[derive(Debug, Clone, PartialEq)]
pub struct TcpUdpSetup {
    base: ObjectBase,
    pub port: u16,
    /// `None` until the IP setup object is known.
    pub ip_reference: Option<ObisCode>,
    pub maximum_segment_size: u16,
    pub maximum_simultaneous_connections: u8,
    pub inactivity_timeout: u16,
}

impl Default for TcpUdpSetup {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            port: DLMS_PORT,
            ip_reference: None,
            maximum_segment_size: 576,
            maximum_simultaneous_connections: 1,
            inactivity_timeout: 180,
        }
    }
}

impl TcpUdpSetup {
    pub fn new(logical_name: ObisCode) -> Self {
        Self::with_logical_name(logical_name)
    }
}

impl InterfaceClass for TcpUdpSetup {
    const OBJECT_TYPE: ObjectType = ObjectType::TcpUdpSetup;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "Port",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.port)),
            |o, v| {
                o.port = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "IPReference",
            DataType::OctetString,
            |o, _| Ok(Data::OctetString(o.ip_reference.map(|ln| ln.encode().to_vec()).unwrap_or_default())),
            |o, v| {
                o.ip_reference = match v.as_bytes() {
                    Some([]) => None,
                    _ => Some(obis_code(&v)?),
                };
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "MaximumSegmentSize",
            DataType::LongUnsigned,
            |o, _| Ok(Data::LongUnsigned(o.maximum_segment_size)),
            |o, v| {
                o.maximum_segment_size = integer(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "MaximumSimultaneousConnections",
            DataType::Unsigned,
            |o, _| Ok(Data::Unsigned(o.maximum_simultaneous_connections)),
            |o, v| {
                o.maximum_simultaneous_connections = integer(&v)?;
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
    use crate::access::DataAccessResult;
    use crate::cosem::CosemObject;
    use crate::error::Error;

    #[test]
    fn test_defaults() {
        let setup = TcpUdpSetup::new(ObisCode::new(0, 0, 25, 0, 0, 255));
        assert_eq!(setup.class_id(), 41);
        assert_eq!(setup.attribute_count(), 6);
        assert_eq!(setup.get_value(2, None).unwrap(), Data::LongUnsigned(4059));
        assert_eq!(setup.get_value(3, None).unwrap(), Data::OctetString(vec![]));
        assert_eq!(setup.get_value(4, None).unwrap(), Data::LongUnsigned(576));
    }

    #[test]
    fn test_ip_reference() {
        let mut setup = TcpUdpSetup::default();
        setup.set_value(3, Data::OctetString(vec![0, 0, 25, 1, 0, 255])).unwrap();
        assert_eq!(setup.ip_reference, Some(ObisCode::new(0, 0, 25, 1, 0, 255)));

        let result = setup.set_value(3, Data::OctetString(vec![0, 0, 25]));
        assert!(matches!(result, Err(Error::DataAccess(DataAccessResult::TypeUnmatched))));

        setup.set_value(3, Data::OctetString(vec![])).unwrap();
        assert_eq!(setup.ip_reference, None);
    }

    #[test]
    fn test_port_range() {
        let mut setup = TcpUdpSetup::default();
        setup.set_value(2, Data::LongUnsigned(4060)).unwrap();
        assert_eq!(setup.port, 4060);
        assert!(setup.set_value(2, Data::DoubleLong(-1)).is_err());
    }
}
