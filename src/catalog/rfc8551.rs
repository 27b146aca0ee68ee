//! S/MIME capabilities.
//!
//! [RFC 8551] defines the `smimeCapabilities` signed attribute listing the
//! algorithms a sender supports. The parameters of each capability are
//! looked up in the registry `smimeCapabilities`.
//!
//! [RFC 8551]: https://tools.ietf.org/html/rfc8551

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{Registries, CMS_ATTRIBUTES, SMIME_CAPABILITIES};
use crate::schema::{Fields, Schema};


/// `smimeCapabilities`
pub const SMIME_CAPABILITIES_ATTR: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 15]);

/// `SMIMECapability`
pub fn smime_capability() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("capabilityID", Schema::oid())
            .optional("parameters", Schema::open_type(
                "capabilityID", SMIME_CAPABILITIES
            ))
    )
}

/// `SMIMECapabilities`
pub fn smime_capabilities() -> Schema {
    Schema::sequence_of(smime_capability())
}

pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 8551 definitions.");
    registries.register(
        CMS_ATTRIBUTES, &SMIME_CAPABILITIES_ATTR, smime_capabilities()
    );
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::catalog::{rfc5652, rfc5990};
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::encode;
    use crate::int::Integer;
    use crate::value::Value;

    // Attribute { smimeCapabilities, { {
    //   { id-kem-rsa, { kdf3 { sha256 }, 16 } },
    //   { sha256 }
    // } } }
    const CAPABILITIES: &[u8] =
        b"\x30\x47\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x09\x0f\
          \x31\x3a\x30\x38\
            \x30\x29\x06\x07\x28\x81\x8c\x71\x02\x02\x04\
              \x30\x1e\x30\x19\
                \x06\x0a\x2b\x81\x05\x10\x86\x48\x09\x2c\x01\x02\
                \x30\x0b\x06\x09\x60\x86\x48\x01\x65\x03\x04\x02\x01\
              \x02\x01\x10\
            \x30\x0b\x06\x09\x60\x86\x48\x01\x65\x03\x04\x02\x01";

    #[test]
    fn schemas_are_valid() {
        smime_capabilities().check().unwrap();
    }

    #[test]
    fn resolved_capabilities() {
        let options = DecodeOptions::deep(
            Arc::new(crate::catalog::registries())
        );
        let schema = rfc5652::attribute();
        let value = decode(
            Bytes::from_static(CAPABILITIES), &schema, &options
        ).unwrap();
        let values = value.get("attrValues")
            .and_then(Value::as_elements).unwrap();
        let capabilities = values[0].as_elements().unwrap();
        assert_eq!(capabilities.len(), 2);

        let kem = &capabilities[0];
        assert_eq!(
            kem.get("capabilityID").and_then(Value::as_oid),
            Some(&rfc5990::KEM_RSA.to_owned_oid())
        );
        let params = kem.get("parameters").unwrap();
        assert!(params.as_open().is_some());
        assert_eq!(
            params.get("keyLength").and_then(Value::as_integer),
            Some(&Integer::from(16))
        );
        assert!(capabilities[1].get("parameters").is_none());

        assert_eq!(encode(&value, &schema).unwrap(), CAPABILITIES);
    }
}
