//! Asymmetric key packages.
//!
//! See [RFC 5958](https://tools.ietf.org/html/rfc5958).

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{Registries, CMS_CONTENT_TYPES};
use crate::schema::{Fields, Schema};
use crate::tag::Tag;
use super::{rfc5280, rfc5652};


/// `id-ct-KP-aKeyPackage`
pub const KEY_PACKAGE: ConstOid
    = Oid(&[96, 134, 72, 1, 101, 2, 1, 2, 78, 5]);

/// `OneAsymmetricKey`, also known as `PrivateKeyInfo`.
pub fn one_asymmetric_key() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required(
                "privateKeyAlgorithm", rfc5280::algorithm_identifier()
            )
            .required("privateKey", Schema::octet_string())
            .optional(
                "attributes", rfc5652::attributes().implicit(Tag::CTX_0)
            )
            .optional("publicKey", Schema::bit_string().implicit(Tag::CTX_1))
            .extensible()
    )
}

/// `AsymmetricKeyPackage`
pub fn asymmetric_key_package() -> Schema {
    Schema::sequence_of(one_asymmetric_key())
}

/// `EncryptedPrivateKeyInfo`
pub fn encrypted_private_key_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required(
                "encryptionAlgorithm", rfc5280::algorithm_identifier()
            )
            .required("encryptedData", Schema::octet_string())
    )
}

pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 5958 definitions.");
    registries.register(
        CMS_CONTENT_TYPES, &KEY_PACKAGE, asymmetric_key_package()
    );
}


//============ Tests =========================================================
