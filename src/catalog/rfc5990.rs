//! The RSA-KEM key transport algorithm in CMS.
//!
//! This module provides the algorithm parameters of [RFC 5990]. They are
//! registered both as algorithm identifier parameters and as S/MIME
//! capabilities.
//!
//! [RFC 5990]: https://tools.ietf.org/html/rfc5990

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{
    Registries, ALGORITHM_IDENTIFIER_PARAMETERS, SMIME_CAPABILITIES,
};
use crate::schema::{Fields, Schema};
use super::rfc5280;


//------------ Object Identifiers --------------------------------------------

/// `id-rsa-kem`
pub const RSA_KEM: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 16, 3, 14]);

/// `id-kem-rsa`
pub const KEM_RSA: ConstOid = Oid(&[40, 129, 140, 113, 2, 2, 4]);

/// `id-kdf-kdf2`
pub const KDF2: ConstOid = Oid(&[43, 129, 5, 16, 134, 72, 9, 44, 1, 1]);

/// `id-kdf-kdf3`
pub const KDF3: ConstOid = Oid(&[43, 129, 5, 16, 134, 72, 9, 44, 1, 2]);

pub const SHA1: ConstOid = Oid(&[43, 14, 3, 2, 26]);
pub const SHA224: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 4]);
pub const SHA256: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 1]);
pub const SHA384: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 2]);
pub const SHA512: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 2, 3]);

/// `id-aes128-Wrap`
///
/// The AES key wrap algorithms have absent parameters.
pub const AES128_WRAP: ConstOid = Oid(&[96, 134, 72, 1, 101, 3, 4, 1, 5]);

/// `id-alg-CMS3DESwrap`
pub const CMS3DES_WRAP: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 16, 3, 6]);


//------------ Parameters ----------------------------------------------------

/// `GenericHybridParameters`
pub fn generic_hybrid_parameters() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("kem", rfc5280::algorithm_identifier())
            .required("dem", rfc5280::algorithm_identifier())
    )
}

/// `RsaKemParameters`
pub fn rsa_kem_parameters() -> Schema {
    Schema::sequence(
        Fields::new()
            .required(
                "keyDerivationFunction", rfc5280::algorithm_identifier()
            )
            .required("keyLength", Schema::integer())
    )
}


//------------ register ------------------------------------------------------

pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 5990 definitions.");
    for name in &[ALGORITHM_IDENTIFIER_PARAMETERS, SMIME_CAPABILITIES] {
        let registry = registries.registry_mut(name);
        registry.register(&RSA_KEM, generic_hybrid_parameters());
        registry.register(&KEM_RSA, rsa_kem_parameters());
        registry.register(&KDF2, rfc5280::algorithm_identifier());
        registry.register(&KDF3, rfc5280::algorithm_identifier());
        for oid in &[SHA1, SHA224, SHA256, SHA384, SHA512, CMS3DES_WRAP] {
            registry.register(oid, Schema::null());
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::encode;
    use crate::int::Integer;
    use crate::value::Value;

    #[test]
    fn rsa_kem_algorithm() {
        // id-rsa-kem {
        //   kem: id-kem-rsa { kdf3 { sha256 }, 16 },
        //   dem: aes128-wrap
        // }
        let data = Bytes::from_static(
            b"\x30\x47\
              \x06\x0b\x2a\x86\x48\x86\xf7\x0d\x01\x09\x10\x03\x0e\
              \x30\x38\
                \x30\x29\
                  \x06\x07\x28\x81\x8c\x71\x02\x02\x04\
                  \x30\x1e\
                    \x30\x19\
                      \x06\x0a\x2b\x81\x05\x10\x86\x48\x09\x2c\x01\x02\
                      \x30\x0b\x06\x09\x60\x86\x48\x01\x65\x03\x04\x02\x01\
                    \x02\x01\x10\
                \x30\x0b\x06\x09\x60\x86\x48\x01\x65\x03\x04\x01\x05"
        );
        let schema = rfc5280::algorithm_identifier();
        let options = DecodeOptions::deep(
            Arc::new(crate::catalog::registries())
        );
        let value = decode(data.clone(), &schema, &options).unwrap();
        let params = value.get("parameters").unwrap();
        let kem_params = params.get("kem")
            .and_then(|kem| kem.get("parameters")).unwrap();
        assert!(kem_params.as_open().is_some());
        assert_eq!(
            kem_params.get("keyLength").and_then(Value::as_integer),
            Some(&Integer::from(16))
        );
        let kdf = kem_params.get("keyDerivationFunction")
            .and_then(|kdf| kdf.get("parameters")).unwrap();
        assert_eq!(
            kdf.get("algorithm").and_then(Value::as_oid),
            Some(&SHA256.to_owned_oid())
        );
        assert!(kdf.get("parameters").is_none());
        assert!(
            params.get("dem").and_then(|dem| dem.get("parameters")).is_none()
        );
        assert_eq!(encode(&value, &schema).unwrap(), data.as_ref());
    }

    #[test]
    fn smime_capabilities() {
        let registries = crate::catalog::registries();
        for oid in &[RSA_KEM, KEM_RSA, SHA1, CMS3DES_WRAP] {
            assert_eq!(
                registries.lookup(SMIME_CAPABILITIES, oid),
                registries.lookup(ALGORITHM_IDENTIFIER_PARAMETERS, oid)
            );
        }
        assert!(registries.lookup(SMIME_CAPABILITIES, &AES128_WRAP).is_none());
    }
}
