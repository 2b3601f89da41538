//! COSEM Interface Class 64: Security setup
//!
//! Security policy, suite, system titles and certificates of an
//! association.
//!
//! ## Attributes
//! 1. `logical_name` (inherited)
//! 2. `security_policy`
//! 3. `security_suite`
//! 4. `client_system_title`
//! 5. `server_system_title`
//! 6. `certificates`
//!
//! ## Methods
//! 1. `security_activate`
//! 2. `key_transfer`
//! 3. `key_agreement`
//! 4. `generate_key_pair`
//! 5. `generate_certificate_request`
//! 6. `import_certificate`
//! 7. `export_certificate`
//! 8. `remove_certificate`
//!
//! The object holds configuration only. Key agreement and the certificate
//! methods (3 to 7) need asymmetric cryptography and answer `OtherReason`.
//! Keys received by `key_transfer` stay wrapped and are queued for the
//! session layer, see [`SecuritySetup::take_pending_keys`].

use bitflags::bitflags;
use derive_try_from_primitive::TryFromPrimitive;
use log::debug;

use crate::access::{ActionResult, DataAccessResult};
use crate::cosem::{AttributeDef, InterfaceClass, MethodDef, ObjectBase, integer};
use crate::data::{Data, DataType};
use crate::obis_code::ObisCode;
use crate::object_type::ObjectType;

bitflags! {
    /// Version 1 security policy: what requests and responses must carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct SecurityPolicy: u8 {
        const AUTHENTICATED_REQUEST  = 0x04;
        const ENCRYPTED_REQUEST      = 0x08;
        const SIGNED_REQUEST         = 0x10;
        const AUTHENTICATED_RESPONSE = 0x20;
        const ENCRYPTED_RESPONSE     = 0x40;
        const SIGNED_RESPONSE        = 0x80;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum SecuritySuite {
    /// AES-GCM-128, AES-128 key wrap
    #[default]
    Suite0 = 0,
    /// ECDH-ECDSA-AES-GCM-128-SHA-256
    Suite1 = 1,
    /// ECDH-ECDSA-AES-GCM-256-SHA-384
    Suite2 = 2,
}

/// Key identifiers accepted by `key_transfer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum KeyId {
    GlobalUnicastEncryption = 0,
    GlobalBroadcastEncryption = 1,
    Authentication = 2,
    /// Key encryption key
    Master = 3,
}

/// A key as received by `key_transfer`, still wrapped with the master key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub key_id: KeyId,
    pub wrapped: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum CertificateEntity {
    Server = 0,
    Client = 1,
    CertificationAuthority = 2,
    Other = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum CertificateType {
    DigitalSignature = 0,
    KeyAgreement = 1,
    Tls = 2,
    Other = 3,
}

/// One element of attribute 6. The certificate itself is not held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    pub entity: CertificateEntity,
    pub certificate_type: CertificateType,
    pub serial_number: Vec<u8>,
    pub issuer: Vec<u8>,
    pub subject: Vec<u8>,
    pub subject_alt_name: Vec<u8>,
}

impl CertificateInfo {
    pub fn to_data(&self) -> Data {
        Data::Structure(vec![
            Data::Enum(self.entity as u8),
            Data::Enum(self.certificate_type as u8),
            Data::OctetString(self.serial_number.clone()),
            Data::OctetString(self.issuer.clone()),
            Data::OctetString(self.subject.clone()),
            Data::OctetString(self.subject_alt_name.clone()),
        ])
    }

    pub fn from_data(value: &Data) -> Result<Self, DataAccessResult> {
        let [entity, certificate_type, serial_number, issuer, subject, subject_alt_name] =
            value.as_items().ok_or(DataAccessResult::TypeUnmatched)?
        else {
            return Err(DataAccessResult::TypeUnmatched);
        };
        Ok(Self {
            entity: enumerated(entity)?,
            certificate_type: enumerated(certificate_type)?,
            serial_number: octets(serial_number)?,
            issuer: octets(issuer)?,
            subject: octets(subject)?,
            subject_alt_name: octets(subject_alt_name)?,
        })
    }
}

fn enumerated<E: TryFrom<u8>>(value: &Data) -> Result<E, DataAccessResult> {
    E::try_from(integer::<u8>(value)?).map_err(|_| DataAccessResult::OtherReason)
}

fn octets(value: &Data) -> Result<Vec<u8>, DataAccessResult> {
    value.as_bytes().map(<[u8]>::to_vec).ok_or(DataAccessResult::TypeUnmatched)
}

/// System titles are 8 bytes; empty means not yet known.
fn system_title(value: &Data) -> Result<Vec<u8>, DataAccessResult> {
    match octets(value)? {
        title if title.is_empty() || title.len() == 8 => Ok(title),
        _ => Err(DataAccessResult::OtherReason),
    }
}

/// Security setup object, COSEM interface class 64, version 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SecuritySetup {
    base: ObjectBase,
    pub security_policy: SecurityPolicy,
    pub security_suite: SecuritySuite,
    pub client_system_title: Vec<u8>,
    pub server_system_title: Vec<u8>,
    pub certificates: Vec<CertificateInfo>,
    pending_keys: Vec<WrappedKey>,
}

impl Default for SecuritySetup {
    fn default() -> Self {
        Self {
            base: ObjectBase::of::<Self>(),
            security_policy: SecurityPolicy::empty(),
            security_suite: SecuritySuite::Suite0,
            client_system_title: Vec::new(),
            server_system_title: Vec::new(),
            certificates: Vec::new(),
            pending_keys: Vec::new(),
        }
    }
}

impl SecuritySetup {
    pub fn new(logical_name: ObisCode) -> Self {
        Self::with_logical_name(logical_name)
    }

    /// Switches to a stronger policy. Every currently required protection
    /// must remain in `policy`.
    pub fn security_activate(&mut self, policy: SecurityPolicy) -> Result<(), ActionResult> {
        if !policy.contains(self.security_policy) {
            debug!("refusing to weaken security policy {:?} to {:?}", self.security_policy, policy);
            return Err(ActionResult::ReadWriteDenied);
        }
        self.security_policy = policy;
        Ok(())
    }

    /// Queues wrapped keys. Nothing is queued if any entry is malformed.
    pub fn key_transfer(&mut self, keys: &Data) -> Result<(), ActionResult> {
        let keys = keys
            .as_items()
            .ok_or(ActionResult::TypeUnmatched)?
            .iter()
            .map(|entry| match entry.as_items() {
                Some([key_id, wrapped]) => Ok(WrappedKey { key_id: enumerated(key_id)?, wrapped: octets(wrapped)? }),
                _ => Err(DataAccessResult::TypeUnmatched),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.pending_keys.extend(keys);
        Ok(())
    }

    pub fn pending_keys(&self) -> &[WrappedKey] {
        &self.pending_keys
    }

    /// Hands the queued keys over to the session layer.
    pub fn take_pending_keys(&mut self) -> Vec<WrappedKey> {
        std::mem::take(&mut self.pending_keys)
    }

    /// Removes certificate info records.
    ///
    /// `Structure { Enum(0), Structure { entity, type, system_title } }`
    /// matches by entity and type; `Structure { Enum(1), Structure {
    /// serial_number, issuer } }` by serial number and issuer.
    /// `ObjectUndefined` if nothing matched.
    pub fn remove_certificate(&mut self, identification: &Data) -> Result<(), ActionResult> {
        let Some([kind, options]) = identification.as_items() else {
            return Err(ActionResult::TypeUnmatched);
        };
        let options = options.as_items().ok_or(ActionResult::TypeUnmatched)?;
        let before = self.certificates.len();
        match (integer::<u8>(kind)?, options) {
            (0, [entity, certificate_type, _system_title]) => {
                let entity: CertificateEntity = enumerated(entity)?;
                let certificate_type: CertificateType = enumerated(certificate_type)?;
                self.certificates.retain(|c| c.entity != entity || c.certificate_type != certificate_type);
            }
            (1, [serial_number, issuer]) => {
                let (serial_number, issuer) = (octets(serial_number)?, octets(issuer)?);
                self.certificates.retain(|c| c.serial_number != serial_number || c.issuer != issuer);
            }
            _ => return Err(ActionResult::TypeUnmatched),
        }
        if self.certificates.len() == before {
            return Err(ActionResult::ObjectUndefined);
        }
        Ok(())
    }
}

/// Handler of key agreement, key pair generation, certificate request,
/// import and export (methods 3 to 7).
///
/// These need elliptic-curve operations and a certificate store, which live
/// in the session layer. The object model answers them with `OtherReason`.
fn needs_cryptography(_: &mut SecuritySetup, _: Option<Data>) -> Result<Option<Data>, ActionResult> {
    Err(ActionResult::OtherReason)
}

impl InterfaceClass for SecuritySetup {
    const OBJECT_TYPE: ObjectType = ObjectType::SecuritySetup;
    const VERSION: u8 = 1;
    const ATTRIBUTES: &'static [AttributeDef<Self>] = &[
        AttributeDef::<Self>::new(
            "SecurityPolicy",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.security_policy.bits())),
            |o, v| {
                o.security_policy = SecurityPolicy::from_bits(integer(&v)?).ok_or(DataAccessResult::OtherReason)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "SecuritySuite",
            DataType::Enum,
            |o, _| Ok(Data::Enum(o.security_suite as u8)),
            |o, v| {
                o.security_suite = enumerated(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "ClientSystemTitle",
            DataType::OctetString,
            |o, _| Ok(Data::OctetString(o.client_system_title.clone())),
            |o, v| {
                o.client_system_title = system_title(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "ServerSystemTitle",
            DataType::OctetString,
            |o, _| Ok(Data::OctetString(o.server_system_title.clone())),
            |o, v| {
                o.server_system_title = system_title(&v)?;
                Ok(())
            },
        ),
        AttributeDef::<Self>::new(
            "Certificates",
            DataType::Array,
            |o, _| Ok(Data::Array(o.certificates.iter().map(CertificateInfo::to_data).collect())),
            |o, v| {
                o.certificates = v
                    .as_items()
                    .ok_or(DataAccessResult::TypeUnmatched)?
                    .iter()
                    .map(CertificateInfo::from_data)
                    .collect::<Result<_, _>>()?;
                Ok(())
            },
        ),
    ];
    const METHODS: &'static [MethodDef<Self>] = &[
        MethodDef::<Self>::new("SecurityActivate", |o, p| {
            let policy = p.as_ref().ok_or(ActionResult::TypeUnmatched)?;
            let policy = SecurityPolicy::from_bits(integer(policy)?).ok_or(ActionResult::OtherReason)?;
            o.security_activate(policy).map(|()| None)
        }),
        MethodDef::<Self>::new("KeyTransfer", |o, p| {
            o.key_transfer(p.as_ref().ok_or(ActionResult::TypeUnmatched)?).map(|()| None)
        }),
        MethodDef::<Self>::new("KeyAgreement", needs_cryptography),
        MethodDef::<Self>::new("GenerateKeyPair", needs_cryptography),
        MethodDef::<Self>::new("GenerateCertificateRequest", needs_cryptography),
        MethodDef::<Self>::new("ImportCertificate", needs_cryptography),
        MethodDef::<Self>::new("ExportCertificate", needs_cryptography),
        MethodDef::<Self>::new("RemoveCertificate", |o, p| {
            o.remove_certificate(p.as_ref().ok_or(ActionResult::TypeUnmatched)?).map(|()| None)
        }),
    ];

    fn object_base(&self) -> &ObjectBase {
        &self.base
    }

    fn object_base_mut(&mut self) -> &mut ObjectBase {
        &mut self.base
    }
}
