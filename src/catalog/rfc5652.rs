//! Cryptographic Message Syntax.
//!
//! This module describes the content info and signed data types of
//! [RFC 5652] as well as the basic signed attributes.
//!
//! The content type `id-data` is deliberately not registered: encapsulated
//! content of this type is arbitrary data rather than an encoded value and
//! is kept as raw octets.
//!
//! [RFC 5652]: https://tools.ietf.org/html/rfc5652

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{Registries, CMS_ATTRIBUTES, CMS_CONTENT_TYPES};
use crate::schema::{Fields, Schema, Variants};
use crate::tag::Tag;
use super::{opaque_sequence, rfc5280};


//------------ Object Identifiers --------------------------------------------

/// `id-data`
pub const ID_DATA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 1]);

/// `id-signedData`
pub const ID_SIGNED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);

/// `id-contentType`
pub const ID_CONTENT_TYPE: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 3]);

/// `id-messageDigest`
pub const ID_MESSAGE_DIGEST: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 4]);

/// `id-signingTime`
pub const ID_SIGNING_TIME: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 5]);


//------------ Content Info --------------------------------------------------

/// `ContentInfo`
pub fn content_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("contentType", Schema::oid())
            .required("content", Schema::open_type(
                "contentType", CMS_CONTENT_TYPES
            ).explicit(Tag::CTX_0))
    )
}

/// `EncapsulatedContentInfo`
pub fn encapsulated_content_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("eContentType", Schema::oid())
            .optional("eContent", Schema::open_octets(
                "eContentType", CMS_CONTENT_TYPES
            ).explicit(Tag::CTX_0))
    )
}


//------------ Attributes ----------------------------------------------------

/// `Attribute`
///
/// The type of the values is looked up in the registry `cmsAttributes`.
pub fn attribute() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("attrType", Schema::oid())
            .required("attrValues", Schema::set_of(
                Schema::open_type("attrType", CMS_ATTRIBUTES)
            ))
    )
}

/// `SignedAttributes`, `UnsignedAttributes`, and friends.
pub fn attributes() -> Schema {
    Schema::set_of(attribute())
}


//------------ Signed Data ---------------------------------------------------

/// `IssuerAndSerialNumber`
pub fn issuer_and_serial_number() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("issuer", rfc5280::name())
            .required("serialNumber", Schema::integer())
    )
}

/// `SignerIdentifier`
pub fn signer_identifier() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("issuerAndSerialNumber", issuer_and_serial_number())
            .variant(
                "subjectKeyIdentifier",
                Schema::octet_string().implicit(Tag::CTX_0)
            )
    )
}

/// `SignerInfo`
pub fn signer_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("sid", signer_identifier())
            .required("digestAlgorithm", rfc5280::algorithm_identifier())
            .optional("signedAttrs", attributes().implicit(Tag::CTX_0))
            .required(
                "signatureAlgorithm", rfc5280::algorithm_identifier()
            )
            .required("signature", Schema::octet_string())
            .optional("unsignedAttrs", attributes().implicit(Tag::CTX_1))
    )
}

/// `CertificateChoices`
///
/// Only plain certificates are described in detail.
pub fn certificate_choices() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("certificate", rfc5280::certificate())
            .variant(
                "extendedCertificate", opaque_sequence().implicit(Tag::CTX_0)
            )
            .variant("v1AttrCert", opaque_sequence().implicit(Tag::CTX_1))
            .variant("v2AttrCert", opaque_sequence().implicit(Tag::CTX_2))
            .variant("other", Schema::sequence(
                Fields::new()
                    .required("otherCertFormat", Schema::oid())
                    .required("otherCert", Schema::any())
            ).implicit(Tag::CTX_3))
    )
}

/// `RevocationInfoChoice`
pub fn revocation_info_choice() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("crl", rfc5280::certificate_list())
            .variant("other", Schema::sequence(
                Fields::new()
                    .required("otherRevInfoFormat", Schema::oid())
                    .required("otherRevInfo", Schema::any())
            ).implicit(Tag::CTX_1))
    )
}

/// `SignedData`
pub fn signed_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required(
                "digestAlgorithms",
                Schema::set_of(rfc5280::algorithm_identifier())
            )
            .required("encapContentInfo", encapsulated_content_info())
            .optional(
                "certificates",
                Schema::set_of(certificate_choices()).implicit(Tag::CTX_0)
            )
            .optional(
                "crls",
                Schema::set_of(revocation_info_choice()).implicit(Tag::CTX_1)
            )
            .required("signerInfos", Schema::set_of(signer_info()))
    )
}


//------------ register ------------------------------------------------------

/// Registers content types and attributes.
pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 5652 definitions.");
    registries.register(CMS_CONTENT_TYPES, &ID_SIGNED_DATA, signed_data());

    let attributes = registries.registry_mut(CMS_ATTRIBUTES);
    attributes.register(&ID_CONTENT_TYPE, Schema::oid());
    attributes.register(&ID_MESSAGE_DIGEST, Schema::octet_string());
    attributes.register(&ID_SIGNING_TIME, rfc5280::time());
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::encode;
    use crate::value::Value;

    fn deep() -> DecodeOptions {
        DecodeOptions::deep(Arc::new(crate::catalog::registries()))
    }

    #[test]
    fn schemas_are_valid() {
        content_info().check().unwrap();
        signed_data().check().unwrap();
        signer_info().check().unwrap();
    }

    #[test]
    fn signed_attributes() {
        // A contentType and a signingTime attribute.
        let data = Bytes::from_static(
            b"\x31\x2e\
              \x30\x18\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x09\x03\
                \x31\x0b\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x07\x01\
              \x30\x12\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x09\x05\
                \x31\x05\x17\x03abc"
        );
        // The broken UTCTime is only noticed when resolving.
        assert!(
            decode(data.clone(), &attributes(), &DecodeOptions::shallow())
                .is_ok()
        );
        assert!(decode(data, &attributes(), &deep()).is_err());

        let data = Bytes::from_static(
            b"\x31\x38\
              \x30\x18\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x09\x03\
                \x31\x0b\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x07\x01\
              \x30\x1c\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x09\x05\
                \x31\x0f\x17\x0d190514085811Z"
        );
        let value = decode(data.clone(), &attributes(), &deep()).unwrap();
        let elements = value.as_elements().unwrap();
        assert_eq!(
            elements[0].get("attrValues").and_then(Value::as_elements)
                .and_then(|values| values[0].as_oid()),
            Some(&ID_DATA.to_owned_oid())
        );
        let time = elements[1].get("attrValues")
            .and_then(Value::as_elements).unwrap()[0]
            .as_choice().unwrap().value().as_time();
        assert_eq!(
            time, Utc.with_ymd_and_hms(2019, 5, 14, 8, 58, 11).single()
        );
        assert_eq!(encode(&value, &attributes()).unwrap(), data.as_ref());
    }

    #[test]
    fn data_content_stays_raw() {
        let data = Bytes::from_static(
            b"\x30\x12\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x07\x01\
              \xa0\x05\x04\x03abc"
        );
        let value = decode(
            data.clone(), &encapsulated_content_info(), &deep()
        ).unwrap();
        assert_eq!(
            value.get("eContent").and_then(Value::as_bytes),
            Some(&Bytes::from_static(b"abc"))
        );
        assert_eq!(
            encode(&value, &encapsulated_content_info()).unwrap(),
            data.as_ref()
        );
    }
}
