//! PKCS #7: Cryptographic Message Syntax Version 1.5.
//!
//! This module describes the types of [RFC 2315]. Content types are
//! registered in their own registry `pkcs7ContentTypes` since they differ
//! from their CMS counterparts.
//!
//! [RFC 2315]: https://tools.ietf.org/html/rfc2315

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{
    Registries, CERTIFICATE_ATTRIBUTES, PKCS7_CONTENT_TYPES,
};
use crate::schema::{Fields, Schema, Variants};
use crate::tag::Tag;
use super::{rfc5280, rfc5652};


//------------ Object Identifiers --------------------------------------------

pub const DATA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 1]);
pub const SIGNED_DATA: ConstOid = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 2]);
pub const ENVELOPED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 3]);
pub const SIGNED_AND_ENVELOPED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 4]);
pub const DIGESTED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 5]);
pub const ENCRYPTED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 7, 6]);


//------------ Attributes ----------------------------------------------------

/// `Attribute`
///
/// Unlike its CMS counterpart, the values are left as they are.
pub fn attribute() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("type", Schema::oid())
            .required("values", Schema::set_of(Schema::any()))
    )
}

pub fn attributes() -> Schema {
    Schema::set_of(attribute())
}

/// `AttributeValueAssertion`
pub fn attribute_value_assertion() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("attributeType", Schema::oid())
            .required("attributeValue", Schema::open_type(
                "attributeType", CERTIFICATE_ATTRIBUTES
            ))
    )
}


//------------ Content Info --------------------------------------------------

/// `ContentInfo`
pub fn content_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("contentType", Schema::oid())
            .optional("content", Schema::open_type(
                "contentType", PKCS7_CONTENT_TYPES
            ).explicit(Tag::CTX_0))
    )
}

/// `EncryptedContentInfo`
///
/// The encrypted content is kept as an OCTET STRING. It can’t be decoded
/// according to the content type without decrypting it first.
pub fn encrypted_content_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("contentType", Schema::oid())
            .required(
                "contentEncryptionAlgorithm", rfc5280::algorithm_identifier()
            )
            .optional(
                "encryptedContent", Schema::octet_string().implicit(Tag::CTX_0)
            )
    )
}


//------------ Certificates and CRLs -----------------------------------------

/// `ExtendedCertificateInfo`
pub fn extended_certificate_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("certificate", rfc5280::certificate())
            .required("attributes", attributes())
    )
}

/// `ExtendedCertificate`
pub fn extended_certificate() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("extendedCertificateInfo", extended_certificate_info())
            .required("signatureAlgorithm", rfc5280::algorithm_identifier())
            .required("signature", Schema::bit_string())
    )
}

/// `ExtendedCertificateOrCertificate`
pub fn extended_certificate_or_certificate() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("certificate", rfc5280::certificate())
            .variant(
                "extendedCertificate",
                extended_certificate().implicit(Tag::CTX_0)
            )
    )
}

/// `ExtendedCertificatesAndCertificates`
pub fn extended_certificates_and_certificates() -> Schema {
    Schema::set_of(extended_certificate_or_certificate())
}

/// `CertificateRevocationList`
pub fn certificate_revocation_list() -> Schema {
    let entry = Schema::sequence(
        Fields::new()
            .required("userCertificate", Schema::integer())
            .required("revocationDate", Schema::utc_time())
    );
    let tbs = Schema::sequence(
        Fields::new()
            .required("signature", rfc5280::algorithm_identifier())
            .required("issuer", rfc5280::name())
            .required("lastUpdate", Schema::utc_time())
            .required("nextUpdate", Schema::utc_time())
            .optional("revokedCertificates", Schema::sequence_of(entry))
    );
    Schema::sequence(
        Fields::new()
            .required("tbsCertificateRevocationList", tbs)
            .required("signatureAlgorithm", rfc5280::algorithm_identifier())
            .required("signature", Schema::bit_string())
    )
}

/// `CertificateRevocationLists`
pub fn certificate_revocation_lists() -> Schema {
    Schema::set_of(certificate_revocation_list())
}


//------------ Signed Data ---------------------------------------------------

/// `SignerInfo`
pub fn signer_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required(
                "issuerAndSerialNumber",
                rfc5652::issuer_and_serial_number()
            )
            .required("digestAlgorithm", rfc5280::algorithm_identifier())
            .optional(
                "authenticatedAttributes",
                attributes().implicit(Tag::CTX_0)
            )
            .required(
                "digestEncryptionAlgorithm",
                rfc5280::algorithm_identifier()
            )
            .required("encryptedDigest", Schema::octet_string())
            .optional(
                "unauthenticatedAttributes",
                attributes().implicit(Tag::CTX_1)
            )
    )
}

/// `SignedData`
pub fn signed_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .optional(
                "digestAlgorithms",
                Schema::set_of(rfc5280::algorithm_identifier())
            )
            .required("contentInfo", content_info())
            .optional(
                "certificates",
                extended_certificates_and_certificates().implicit(Tag::CTX_0)
            )
            .optional(
                "crls", certificate_revocation_lists().implicit(Tag::CTX_1)
            )
            .optional("signerInfos", Schema::set_of(signer_info()))
    )
}


//------------ Other Content Types -------------------------------------------

/// `RecipientInfo`
pub fn recipient_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required(
                "issuerAndSerialNumber",
                rfc5652::issuer_and_serial_number()
            )
            .required(
                "keyEncryptionAlgorithm", rfc5280::algorithm_identifier()
            )
            .required("encryptedKey", Schema::octet_string())
    )
}

/// `EnvelopedData`
pub fn enveloped_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("recipientInfos", Schema::set_of(recipient_info()))
            .required("encryptedContentInfo", encrypted_content_info())
    )
}

/// `SignedAndEnvelopedData`
pub fn signed_and_enveloped_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("recipientInfos", Schema::set_of(recipient_info()))
            .required(
                "digestAlgorithms",
                Schema::set_of(rfc5280::algorithm_identifier())
            )
            .required("encryptedContentInfo", encrypted_content_info())
            .optional(
                "certificates",
                extended_certificates_and_certificates().implicit(Tag::CTX_0)
            )
            .optional(
                "crls", certificate_revocation_lists().implicit(Tag::CTX_1)
            )
            .required("signerInfos", Schema::set_of(signer_info()))
    )
}

/// `DigestedData`
pub fn digested_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("digestAlgorithm", rfc5280::algorithm_identifier())
            .required("contentInfo", content_info())
            .required("digest", Schema::octet_string())
    )
}

/// `EncryptedData`
pub fn encrypted_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("encryptedContentInfo", encrypted_content_info())
    )
}

/// `DigestInfo`
pub fn digest_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("digestAlgorithm", rfc5280::algorithm_identifier())
            .required("digest", Schema::octet_string())
    )
}


//------------ register ------------------------------------------------------

/// Registers the PKCS #7 content types.
pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 2315 definitions.");
    let content = registries.registry_mut(PKCS7_CONTENT_TYPES);
    content.register(&DATA, Schema::octet_string());
    content.register(&SIGNED_DATA, signed_data());
    content.register(&ENVELOPED_DATA, enveloped_data());
    content.register(&SIGNED_AND_ENVELOPED_DATA, signed_and_enveloped_data());
    content.register(&DIGESTED_DATA, digested_data());
    content.register(&ENCRYPTED_DATA, encrypted_data());
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::{canonicalize, encode, encode_to_bytes};
    use crate::value::{Open, Value};

    const UNORDERED: &[u8] = include_bytes!("../../test/pkcs7-unordered.der");
    const REORDERED: &[u8] = include_bytes!("../../test/pkcs7-reordered.der");

    fn deep() -> DecodeOptions {
        DecodeOptions::deep(Arc::new(crate::catalog::registries()))
    }

    #[test]
    fn schemas_are_valid() {
        for schema in &[
            content_info(), signed_data(), enveloped_data(),
            signed_and_enveloped_data(), digested_data(), encrypted_data(),
            digest_info(), attribute_value_assertion(),
        ] {
            schema.check().unwrap();
        }
    }

    #[test]
    fn shallow_round_trip() {
        for data in &[UNORDERED, REORDERED] {
            let value = decode(
                Bytes::from_static(*data), &content_info(),
                &DecodeOptions::shallow()
            ).unwrap();
            assert!(value.get("content").unwrap().as_bytes().is_some());
            assert_eq!(encode(&value, &content_info()).unwrap(), *data);
        }
    }

    #[test]
    fn deep_decode() {
        let value = decode(
            Bytes::from_static(UNORDERED), &content_info(), &deep()
        ).unwrap();
        assert_eq!(
            value.get("contentType").and_then(Value::as_oid),
            Some(&SIGNED_DATA.to_owned_oid())
        );
        let signed = value.get("content").unwrap();
        assert!(signed.as_open().is_some());
        assert_eq!(
            signed.get("contentInfo").and_then(|info| info.get("contentType"))
                .and_then(Value::as_oid),
            Some(&DATA.to_owned_oid())
        );
        assert_eq!(
            signed.get("digestAlgorithms").and_then(Value::as_elements)
                .map(<[Value]>::len),
            Some(0)
        );

        let certificates = signed.get("certificates")
            .and_then(Value::as_elements).unwrap();
        assert_eq!(certificates.len(), 4);
        for certificate in certificates {
            let choice = certificate.as_choice().unwrap();
            assert_eq!(choice.variant(), "certificate");
            let tbs = choice.value().get("tbsCertificate").unwrap();
            let algorithm = tbs.get("signature").unwrap();
            assert_eq!(
                algorithm.get("algorithm").and_then(Value::as_oid),
                Some(&rfc5280::MD5_WITH_RSA_ENCRYPTION.to_owned_oid())
            );
            assert_eq!(
                algorithm.get("parameters").map(Value::resolved),
                Some(&Value::Null)
            );
        }

        // The third certificate is a version 1 certificate without an
        // explicit version.
        let versions = certificates.iter().map(|certificate| {
            certificate.get("tbsCertificate")
                .and_then(|tbs| tbs.get("version"))
                .and_then(Value::as_integer)
                .and_then(|version| version.to_i64())
        }).collect::<Vec<_>>();
        assert_eq!(versions, [Some(2), Some(2), Some(0), Some(2)]);

        let tbs = certificates[0].get("tbsCertificate").unwrap();
        let issuer = tbs.get("issuer").unwrap().as_choice().unwrap().value()
            .as_elements().unwrap();
        let first = &issuer[0].as_elements().unwrap()[0];
        assert_eq!(
            first.get("value").and_then(Value::as_str), Some("RU")
        );
        assert!(first.get("value").unwrap().as_open().is_some());
    }

    #[test]
    fn reorder() {
        let options = deep();
        let mut value = decode(
            Bytes::from_static(UNORDERED), &content_info(), &options
        ).unwrap();

        // The unordered message contains an empty crls field that the
        // reordered one lacks.
        let components = match value {
            Value::Sequence(ref mut components) => components,
            _ => panic!("not a sequence")
        };
        let open = match components.remove("content") {
            Some(Value::Open(open)) => open,
            _ => panic!("content not resolved")
        };
        let schema = open.schema().clone();
        let mut signed = open.into_value();
        match signed {
            Value::Sequence(ref mut components) => {
                assert!(components.remove("crls").is_some());
            }
            _ => panic!("signed data not a sequence")
        }
        components.insert("content", Value::Open(Open::new(schema, signed)));

        let encoded = encode_to_bytes(&value, &content_info()).unwrap();
        assert_eq!(encoded.as_ref(), REORDERED);

        let again = decode(encoded.clone(), &content_info(), &options)
            .unwrap();
        assert_eq!(encode(&again, &content_info()).unwrap(), REORDERED);
    }

    #[test]
    fn canonical_is_idempotent() {
        let once = canonicalize(
            Bytes::from_static(REORDERED), &signed_content()
        ).unwrap();
        assert_eq!(once.as_ref(), REORDERED);
        let twice = canonicalize(once.clone(), &signed_content()).unwrap();
        assert_eq!(once, twice);
    }

    /// A content info with the signed data spelled out.
    fn signed_content() -> Schema {
        Schema::sequence(
            Fields::new()
                .required("contentType", Schema::oid())
                .optional("content", signed_data().explicit(Tag::CTX_0))
        )
    }

    #[test]
    fn canonicalize_sorts_certificates() {
        let canonical = canonicalize(
            Bytes::from_static(UNORDERED), &signed_content()
        ).unwrap();
        assert_ne!(canonical.as_ref(), UNORDERED);
        assert_eq!(canonical.len(), UNORDERED.len());
        let value = decode(
            canonical, &signed_content(), &DecodeOptions::shallow()
        ).unwrap();
        let certificates = value.get("content")
            .and_then(|content| content.get("certificates"))
            .and_then(Value::as_elements).unwrap();
        assert_eq!(certificates.len(), 4);
    }
}
