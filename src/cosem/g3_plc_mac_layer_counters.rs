//! COSEM Interface Class 90: G3-PLC MAC layer counters
//!
//! Statistics of the G3-PLC MAC sublayer. All counters are
//! double-long-unsigned and wrap at `u32::MAX`.
//!
//! ## Methods
//! 1. `reset`, zeroes every counter

use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, integer};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

/// G3-PLC MAC layer counters, COSEM interface class 90, version 1.
#[derive(Debug, Clone, PartialEq)]
pub struct G3PlcMacLayerCounters {
    base: ObjectBase,
    pub tx_data_packet_count: u32,
    pub rx_data_packet_count: u32,
    pub tx_cmd_packet_count: u32,
    pub rx_cmd_packet_count: u32,
    pub csma_fail_count: u32,
    pub csma_no_ack_count: u32,
    pub bad_crc_count: u32,
    pub tx_data_broadcast_count: u32,
    pub rx_data_broadcast_count: u32,
}

impl Default for G3PlcMacLayerCounters {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            tx_data_packet_count: 0,
            rx_data_packet_count: 0,
            tx_cmd_packet_count: 0,
            rx_cmd_packet_count: 0,
            csma_fail_count: 0,
            csma_no_ack_count: 0,
            bad_crc_count: 0,
            tx_data_broadcast_count: 0,
            rx_data_broadcast_count: 0,
        }
    }
}

impl G3PlcMacLayerCounters {
    pub fn new(logical_name: ObisCode) -> Self {
        Self::with_logical_name(logical_name)
    }

    pub fn reset(&mut self) {
        *self = Self { base: self.base.clone(), ..Self::default() };
    }
}

macro_rules! counter {
    ($name:literal, $field:ident) => {
        AttributeDef::<G3PlcMacLayerCounters>::new(
            $name,
            DataType::DoubleLongUnsigned,
            |o, _| Ok(Data::DoubleLongUnsigned(o.$field)),
            |o, v| {
                o.$field = integer(&v)?;
                Ok(())
            },
        )
        .volatile()
    };
}

impl InterfaceClass for G3PlcMacLayerCounters {
    const OBJECT_TYPE: ObjectType = ObjectType::G3PlcMacLayerCounters;
    const VERSION: u8 = 1;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        counter!("TxDataPacketCount", tx_data_packet_count),
        counter!("RxDataPacketCount", rx_data_packet_count),
        counter!("TxCmdPacketCount", tx_cmd_packet_count),
        counter!("RxCmdPacketCount", rx_cmd_packet_count),
        counter!("CSMAFailCount", csma_fail_count),
        counter!("CSMANoAckCount", csma_no_ack_count),
        counter!("BadCrcCount", bad_crc_count),
        counter!("TxDataBroadcastCount", tx_data_broadcast_count),
        counter!("RxDataBroadcastCount", rx_data_broadcast_count),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[MethodDef::<Self>::new("Reset", |o, _| {
        o.reset();
        Ok(None)
    })];

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

    #[test]
    fn test_counters() {
        let mut counters = G3PlcMacLayerCounters::new(ObisCode::new(0, 0, 29, 0, 0, 255));
        assert_eq!(counters.class_id(), 90);
        assert_eq!(counters.version(), 1);
        assert_eq!(counters.attribute_count(), 10);

        counters.update_value(8, Data::DoubleLongUnsigned(17)).unwrap();
        assert_eq!(counters.bad_crc_count, 17);
        assert_eq!(counters.get_value(8, None).unwrap(), Data::DoubleLongUnsigned(17));
        assert!(counters.set_value(2, Data::DoubleLong(-1)).is_err());
    }

    #[test]
    fn test_reset_keeps_identity() {
        let ln = ObisCode::new(0, 0, 29, 0, 0, 255);
        let mut counters = G3PlcMacLayerCounters::new(ln);
        counters.tx_data_packet_count = 1000;
        counters.rx_data_broadcast_count = 3;

        counters.invoke(1, None).unwrap();
        assert_eq!(counters.tx_data_packet_count, 0);
        assert_eq!(counters.rx_data_broadcast_count, 0);
        assert_eq!(counters.logical_name(), Some(ln));
    }
}
