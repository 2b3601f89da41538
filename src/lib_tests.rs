#[cfg(test)]
mod register_tests {
    use super::super::*;
    use crate::cosem::register::Register;

    #[test]
    fn test_register_read_dispatch() {
        let ln = ObisCode::new(1, 0, 1, 7, 0, 255);
        let mut register = Register::with_logical_name(ln);

        register.update_value(3, ScalerUnit::new(-2, Unit::Watt).to_data()).unwrap();
        register.update_value(2, Data::DoubleLongUnsigned(12345)).unwrap();

        assert_eq!(register.value(), &Data::Float64(123.45));
        assert_eq!(register.get_value(2, None).unwrap(), Data::DoubleLongUnsigned(12345));
        assert_eq!(register.get_value(3, None).unwrap(), Data::Structure(vec![Data::Integer(-2), Data::Enum(27)]));
        assert_eq!(register.get_value(1, None).unwrap(), Data::OctetString(vec![1, 0, 1, 7, 0, 255]));
    }

    #[test]
    fn test_register_scaler_applied_whatever_the_order() {
        let mut register = Register::default();
        register.update_value(2, Data::LongUnsigned(2305)).unwrap();
        register.update_value(3, ScalerUnit::new(-1, Unit::Volt).to_data()).unwrap();
        assert_eq!(register.scaled_value(), Some(230.5));
        assert_eq!(register.raw_value(), &Data::LongUnsigned(2305));
    }
}

#[cfg(test)]
mod access_tests {
    use super::super::*;
    use crate::cosem::clock::Clock;
    use crate::cosem::register::Register;

    #[test]
    fn test_denial_is_not_a_failure() {
        let mut clock = Clock::new(ObisCode::new(0, 0, 1, 0, 0, 255));
        clock.base_mut().set_attribute_access(3, AttributeAccess::READ_ONLY).unwrap();
        clock.base_mut().set_method_access(6, MethodAccess::NO_ACCESS).unwrap();

        let write = clock.set_value(3, Data::Long(60)).unwrap_err();
        assert_eq!(write.access_result(), Some(DataAccessResult::ReadWriteDenied));
        let action = clock.invoke(6, Some(Data::Long(10))).unwrap_err();
        assert_eq!(action.access_result(), Some(DataAccessResult::ReadWriteDenied));

        // the object is still usable afterwards
        assert_eq!(clock.get_value(3, None).unwrap(), Data::Long(0));
        clock.set_value(7, Data::Integer(60)).unwrap();
    }

    #[test]
    fn test_out_of_range_is_a_local_error() {
        let register = Register::default();
        let err = register.get_value(4, None).unwrap_err();
        assert!(matches!(err, Error::InvalidAttributeIndex(4)));
        assert_eq!(err.access_result(), None);
    }

    #[test]
    fn test_logical_name_is_read_once() {
        let mut register = Register::default();
        assert_eq!(register.attribute_indexes_to_read(false), [1, 3, 2]);

        register.update_value(1, Data::OctetString(vec![1, 0, 1, 8, 0, 255])).unwrap();
        register.update_value(3, ScalerUnit::new(0, Unit::WattHour).to_data()).unwrap();
        assert_eq!(register.attribute_indexes_to_read(false), [2]);
        assert_eq!(register.attribute_indexes_to_read(true), [1, 3, 2]);
    }
}

#[cfg(test)]
mod setup_tests {
    use super::super::*;
    use crate::cosem::iec_hdlc_setup::IecHdlcSetup;

    #[test]
    fn test_hdlc_defaults() {
        let setup = IecHdlcSetup::new(ObisCode::new(0, 0, 22, 0, 0, 255));
        let expected = [
            Data::Enum(5),
            Data::Unsigned(1),
            Data::Unsigned(1),
            Data::LongUnsigned(128),
            Data::LongUnsigned(128),
            Data::LongUnsigned(25),
            Data::LongUnsigned(120),
            Data::LongUnsigned(0),
        ];
        for (index, value) in (2..).zip(expected) {
            assert_eq!(setup.get_value(index, None).unwrap(), value, "attribute {index}");
        }
        assert_eq!(IecHdlcSetup::default().attribute_indexes_to_read(false), [1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_every_class_describes_itself() {
        for object_type in ObjectType::ALL {
            let object = cosem::create_object(object_type);
            for index in 1..=object.attribute_count() {
                assert!(object.attribute_name(index).is_ok(), "{object_type} attribute {index}");
                assert!(object.data_type(index).is_ok());
            }
            for index in 1..=object.method_count() {
                assert!(object.method_name(index).is_ok(), "{object_type} method {index}");
            }
            assert!(object.attribute_name(object.attribute_count() + 1).is_err());
        }
    }
}

#[cfg(test)]
mod collection_tests {
    use super::super::*;
    use crate::cosem::clock::{Clock, ClockBase};
    use crate::cosem::data::DataObject;
    use crate::cosem::disconnect_control::{ControlMode, DisconnectControl};
    use crate::cosem::iec_hdlc_setup::{BaudRate, IecHdlcSetup};
    use crate::cosem::register::Register;
    use crate::cosem::security_setup::{CertificateEntity, CertificateInfo, CertificateType, SecuritySetup};
    use crate::cosem::{CaptureObject, ProfileGeneric};

    const CLOCK: ObisCode = ObisCode::new(0, 0, 1, 0, 0, 255);
    const ENERGY: ObisCode = ObisCode::new(1, 0, 1, 8, 0, 255);
    const PROFILE: ObisCode = ObisCode::new(1, 0, 99, 1, 0, 255);
    const HDLC: ObisCode = ObisCode::new(0, 0, 22, 0, 0, 255);
    const SECURITY: ObisCode = ObisCode::new(0, 0, 43, 0, 0, 255);
    const DISCONNECTOR: ObisCode = ObisCode::new(0, 0, 96, 3, 10, 255);
    const SERIAL: ObisCode = ObisCode::new(0, 0, 96, 1, 0, 255);

    fn meter() -> ObjectCollection {
        let mut objects = ObjectCollection::new();

        let mut clock = Clock::new(CLOCK);
        clock.time = DateTime::new(Date::new(2024, 6, 1), Time::new(12, 0, 0, 0), -120, ClockStatus::DAYLIGHT_SAVING_ACTIVE);
        clock.time_zone = -60;
        clock.daylight_savings_enabled = true;
        clock.clock_base = ClockBase::Crystal;
        objects.add(clock);

        let mut register = Register::new(ENERGY, Data::DoubleLongUnsigned(1000), ScalerUnit::new(-3, Unit::WattHour));
        register.base_mut().description = Some("Active energy import".into());
        objects.add(register);

        objects.add(ProfileGeneric::new(
            PROFILE,
            vec![CaptureObject::new(ObjectType::Clock, CLOCK, 2), CaptureObject::new(ObjectType::Register, ENERGY, 2)],
            900,
            96,
        ));

        let mut hdlc = IecHdlcSetup::new(HDLC);
        hdlc.communication_speed = BaudRate::Baud19200;
        hdlc.device_address = 0x10;
        objects.add(hdlc);

        let mut security = SecuritySetup::new(SECURITY);
        security.server_system_title = b"GRX12345".to_vec();
        security.certificates.push(CertificateInfo {
            entity: CertificateEntity::Server,
            certificate_type: CertificateType::KeyAgreement,
            serial_number: vec![0x01, 0x02],
            issuer: b"CN=Root".to_vec(),
            subject: b"CN=Meter <1>".to_vec(),
            subject_alt_name: Vec::new(),
        });
        objects.add(security);

        objects.add(DisconnectControl::new(DISCONNECTOR, ControlMode::Mode2));
        objects.add(DataObject::new(SERIAL, Data::VisibleString("LGZ & Co".into())));
        objects
    }

    fn assert_same_values(left: &ObjectCollection, right: &ObjectCollection) {
        assert_eq!(left.len(), right.len());
        for (a, b) in left.iter().zip(right.iter()) {
            assert_eq!(a.object_type(), b.object_type());
            assert_eq!(a.logical_name(), b.logical_name());
            assert_eq!(a.base().description, b.base().description);
            for index in 1..=a.attribute_count() {
                assert_eq!(
                    a.get_value(index, None).unwrap(),
                    b.get_value(index, None).unwrap(),
                    "{} attribute {index}",
                    a.object_type()
                );
            }
        }
    }

    #[test]
    fn test_capture_then_select_entries() {
        let mut objects = meter();
        objects.capture(&PROFILE).unwrap();
        objects.find_mut::<Register>(&ENERGY).unwrap().set_raw_value(Data::DoubleLongUnsigned(1250));
        objects.find_mut::<Clock>(&CLOCK).unwrap().invoke(6, Some(Data::Long(900))).unwrap();
        objects.invoke(ObjectType::ProfileGeneric, &PROFILE, 2, None).unwrap();

        let profile = objects.find::<ProfileGeneric>(&PROFILE).unwrap();
        let selector = SelectiveAccess::new(
            2,
            Data::Structure(vec![
                Data::DoubleLongUnsigned(2),
                Data::DoubleLongUnsigned(0),
                Data::LongUnsigned(2),
                Data::LongUnsigned(2),
            ]),
        );
        let rows = profile.get_value(2, Some(&selector)).unwrap();
        assert_eq!(rows, Data::Array(vec![Data::Structure(vec![Data::DoubleLongUnsigned(1250)])]));
    }

    #[test]
    fn test_xml_file_round_trip() {
        let mut objects = meter();
        objects.capture(&PROFILE).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meter.xml");
        objects.save_to_file(&path, XmlSettings::default()).unwrap();
        let loaded = ObjectCollection::load_from_file(&path).unwrap();

        assert_same_values(&objects, &loaded);
        assert_eq!(loaded.find::<ProfileGeneric>(&PROFILE).unwrap().buffer.len(), 1);
    }

    #[test]
    fn test_xml_round_trip_keeping_defaults() {
        let objects = meter();
        let settings = XmlSettings { include_values: true, skip_defaults: false };

        let mut out = Vec::new();
        objects.save(&mut out, settings).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<MaximumInfoLengthTX Type=\"UInt16\">128</MaximumInfoLengthTX>"));
        assert!(text.contains("LGZ &amp; Co"));

        let loaded = ObjectCollection::load(text.as_bytes()).unwrap();
        assert_same_values(&objects, &loaded);
    }

    #[test]
    fn test_xml_round_trip_keeps_string_padding() {
        let mut objects = ObjectCollection::new();
        objects.add(DataObject::new(SERIAL, Data::VisibleString("  METER 1 ".into())));
        objects.add(DataObject::new(ObisCode::new(0, 0, 96, 1, 1, 255), Data::Utf8String(" Zähler\t".into())));
        objects.add(DataObject::new(ObisCode::new(0, 0, 96, 1, 2, 255), Data::VisibleString("   ".into())));

        let mut out = Vec::new();
        objects.save(&mut out, XmlSettings::default()).unwrap();
        let loaded = ObjectCollection::load(out.as_slice()).unwrap();

        assert_same_values(&objects, &loaded);
        assert_eq!(loaded.find::<DataObject>(&SERIAL).unwrap().value, Data::VisibleString("  METER 1 ".into()));
    }

    #[test]
    fn test_identity_only_document() {
        let objects = meter();
        let settings = XmlSettings { include_values: false, ..XmlSettings::default() };

        let mut out = Vec::new();
        objects.save(&mut out, settings).unwrap();
        let loaded = ObjectCollection::load(out.as_slice()).unwrap();

        assert_eq!(loaded.len(), objects.len());
        let register = loaded.find::<Register>(&ENERGY).unwrap();
        assert_eq!(register.value(), &Data::Null);
        assert_eq!(register.base().description.as_deref(), Some("Active energy import"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ObjectCollection::load_from_file(dir.path().join("absent.xml"));
        assert!(matches!(result, Err(XmlError::Io(_))));
    }
}

#[cfg(test)]
mod codec_tests {
    use super::super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn number() -> impl Strategy<Value = Data> {
        prop_oneof![
            any::<i32>().prop_map(Data::DoubleLong),
            any::<u32>().prop_map(Data::DoubleLongUnsigned),
            any::<i8>().prop_map(Data::Integer),
            any::<i16>().prop_map(Data::Long),
            any::<u8>().prop_map(Data::Unsigned),
            any::<u16>().prop_map(Data::LongUnsigned),
            any::<i64>().prop_map(Data::Long64),
            any::<u64>().prop_map(Data::Long64Unsigned),
            (-1.0e6f32..1.0e6f32).prop_map(Data::Float32),
            (-1.0e12f64..1.0e12f64).prop_map(Data::Float64),
        ]
    }

    fn calendar() -> impl Strategy<Value = Data> {
        // raw field bytes cover the wildcard sentinels as well as concrete values
        prop_oneof![
            any::<[u8; 5]>().prop_map(|bytes| Data::Date(Date::parse(&bytes).unwrap().1)),
            any::<[u8; 4]>().prop_map(|bytes| Data::Time(Time::parse(&bytes).unwrap().1)),
            any::<[u8; 12]>().prop_map(|bytes| Data::DateTime(DateTime::parse(&bytes).unwrap().1)),
            (1970u16..2100, 1u8..=12, 1u8..=28).prop_map(|(y, m, d)| Data::Date(Date::new(y, m, d))),
        ]
    }

    fn octets() -> impl Strategy<Value = Data> {
        prop_oneof![
            vec(any::<bool>(), 0..20).prop_map(Data::BitString),
            vec(any::<u8>(), 0..300).prop_map(Data::OctetString),
            "[ -~]{0,16}".prop_map(Data::VisibleString),
            any::<String>().prop_map(Data::Utf8String),
        ]
    }

    fn leaf() -> impl Strategy<Value = Data> {
        prop_oneof![
            Just(Data::Null),
            Just(Data::DontCare),
            any::<bool>().prop_map(Data::Boolean),
            any::<u8>().prop_map(Data::Enum),
            any::<u8>().prop_map(Data::Bcd),
            octets(),
            number(),
            calendar(),
        ]
    }

    /// Array of `Structure { octet-string, ... }` rows, the shape of a
    /// profile buffer or a capture object list.
    fn table() -> impl Strategy<Value = Data> {
        (1usize..4, 0usize..5).prop_flat_map(|(columns, rows)| {
            vec(vec(vec(any::<u8>(), 0..8).prop_map(Data::OctetString), columns).prop_map(Data::Structure), rows)
                .prop_map(Data::Array)
        })
    }

    fn value() -> impl Strategy<Value = Data> {
        let tree = leaf().prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                vec(inner.clone(), 0..6).prop_map(Data::Structure),
                // arrays are homogeneous: keep the members sharing the first one's type
                vec(inner, 1..6).prop_map(|items| {
                    let element = items[0].data_type();
                    Data::Array(items.into_iter().filter(|item| item.data_type() == element).collect())
                }),
            ]
        });
        prop_oneof![4 => tree, 1 => table()]
    }

    proptest! {
        #[test]
        fn test_decode_inverts_encode(value in value()) {
            let bytes = codec::encode(value.data_type(), &value).unwrap();
            let (decoded, data_type, end) = codec::decode(&bytes, 0).unwrap();
            prop_assert_eq!(end, bytes.len());
            prop_assert_eq!(data_type, value.data_type());
            prop_assert_eq!(decoded, value);
        }

        #[test]
        fn test_truncated_input_never_panics(value in value(), cut in 0usize..64) {
            let bytes = codec::encode(value.data_type(), &value).unwrap();
            let cut = cut.min(bytes.len().saturating_sub(1));
            let _ = codec::decode(&bytes[..cut], 0);
        }
    }
}
