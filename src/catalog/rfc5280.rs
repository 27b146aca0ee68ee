//! Certificates and CRLs.
//!
//! This module describes the types of the Internet X.509 Public Key
//! Infrastructure Certificate and CRL Profile defined in [RFC 5280]
//! together with the most common certificate extensions, name attributes,
//! and algorithm parameters.
//!
//! [RFC 5280]: https://tools.ietf.org/html/rfc5280

use log::debug;
use crate::int::Integer;
use crate::oid::{ConstOid, Oid};
use crate::registry::{
    Registries, ALGORITHM_IDENTIFIER_PARAMETERS, CERTIFICATE_ATTRIBUTES,
    CERTIFICATE_EXTENSIONS,
};
use crate::schema::{Fields, Schema, Variants};
use crate::tag::Tag;
use crate::value::Value;
use super::opaque_sequence;


//------------ Object Identifiers --------------------------------------------

/// `id-ce-subjectKeyIdentifier`
pub const SUBJECT_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 14]);

/// `id-ce-keyUsage`
pub const KEY_USAGE: ConstOid = Oid(&[85, 29, 15]);

/// `id-ce-subjectAltName`
pub const SUBJECT_ALT_NAME: ConstOid = Oid(&[85, 29, 17]);

/// `id-ce-basicConstraints`
pub const BASIC_CONSTRAINTS: ConstOid = Oid(&[85, 29, 19]);

/// `id-ce-certificatePolicies`
pub const CERTIFICATE_POLICIES: ConstOid = Oid(&[85, 29, 32]);

/// `id-ce-authorityKeyIdentifier`
pub const AUTHORITY_KEY_IDENTIFIER: ConstOid = Oid(&[85, 29, 35]);

/// `id-ce-extKeyUsage`
pub const EXT_KEY_USAGE: ConstOid = Oid(&[85, 29, 37]);

/// `id-ce-inhibitAnyPolicy`
pub const INHIBIT_ANY_POLICY: ConstOid = Oid(&[85, 29, 54]);

pub const AT_COMMON_NAME: ConstOid = Oid(&[85, 4, 3]);
pub const AT_SERIAL_NUMBER: ConstOid = Oid(&[85, 4, 5]);
pub const AT_COUNTRY_NAME: ConstOid = Oid(&[85, 4, 6]);
pub const AT_LOCALITY_NAME: ConstOid = Oid(&[85, 4, 7]);
pub const AT_STATE_OR_PROVINCE_NAME: ConstOid = Oid(&[85, 4, 8]);
pub const AT_ORGANIZATION_NAME: ConstOid = Oid(&[85, 4, 10]);
pub const AT_ORGANIZATIONAL_UNIT_NAME: ConstOid = Oid(&[85, 4, 11]);

/// `id-emailAddress` from PKCS #9
pub const EMAIL_ADDRESS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 1]);

/// `id-domainComponent` from RFC 4519
pub const DOMAIN_COMPONENT: ConstOid
    = Oid(&[9, 146, 38, 137, 147, 242, 44, 100, 1, 25]);

/// `rsaEncryption` from RFC 3279
pub const RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 1]);

pub const MD2_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 2]);
pub const MD5_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 4]);
pub const SHA1_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 5]);
pub const SHA256_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 11]);
pub const SHA384_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 12]);
pub const SHA512_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 13]);
pub const SHA224_WITH_RSA_ENCRYPTION: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 1, 14]);

/// `id-ecPublicKey` from RFC 5480
pub const EC_PUBLIC_KEY: ConstOid = Oid(&[42, 134, 72, 206, 61, 2, 1]);


//------------ Basic Types ---------------------------------------------------

/// `AlgorithmIdentifier`
///
/// The type of the parameters is looked up in the registry
/// `algorithmIdentifierParameters`.
pub fn algorithm_identifier() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("algorithm", Schema::oid())
            .optional("parameters", Schema::open_type(
                "algorithm", ALGORITHM_IDENTIFIER_PARAMETERS
            ))
    )
}

/// `Time`
pub fn time() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("utcTime", Schema::utc_time())
            .variant("generalTime", Schema::generalized_time())
    )
}

/// `DirectoryString`
///
/// TeletexString and UniversalString are not supported.
pub fn directory_string() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("printableString", Schema::printable_string())
            .variant("utf8String", Schema::utf8_string())
            .variant("bmpString", Schema::bmp_string())
    )
}


//------------ Names ---------------------------------------------------------

/// `AttributeTypeAndValue`
pub fn attribute_type_and_value() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("type", Schema::oid())
            .required("value", Schema::open_type(
                "type", CERTIFICATE_ATTRIBUTES
            ))
    )
}

/// `RelativeDistinguishedName`
pub fn relative_distinguished_name() -> Schema {
    Schema::set_of(attribute_type_and_value())
}

/// `Name`
pub fn name() -> Schema {
    Schema::choice(
        Variants::new()
            .variant(
                "rdnSequence",
                Schema::sequence_of(relative_distinguished_name())
            )
    )
}

/// `GeneralName`
///
/// The content of `x400Address` and `ediPartyName` is kept uninterpreted.
pub fn general_name() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("otherName", Schema::sequence(
                Fields::new()
                    .required("type-id", Schema::oid())
                    .required("value", Schema::any().explicit(Tag::CTX_0))
            ).implicit(Tag::CTX_0))
            .variant("rfc822Name", Schema::ia5_string().implicit(Tag::CTX_1))
            .variant("dNSName", Schema::ia5_string().implicit(Tag::CTX_2))
            .variant("x400Address", opaque_sequence().implicit(Tag::CTX_3))
            .variant("directoryName", name().implicit(Tag::ctx(4)))
            .variant("ediPartyName", opaque_sequence().implicit(Tag::ctx(5)))
            .variant(
                "uniformResourceIdentifier",
                Schema::ia5_string().implicit(Tag::ctx(6))
            )
            .variant("iPAddress", Schema::octet_string().implicit(Tag::ctx(7)))
            .variant("registeredID", Schema::oid().implicit(Tag::ctx(8)))
    )
}

/// `GeneralNames`
pub fn general_names() -> Schema {
    Schema::sequence_of(general_name())
}


//------------ Certificates --------------------------------------------------

/// `Validity`
pub fn validity() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("notBefore", time())
            .required("notAfter", time())
    )
}

/// `SubjectPublicKeyInfo`
pub fn subject_public_key_info() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("algorithm", algorithm_identifier())
            .required("subjectPublicKey", Schema::bit_string())
    )
}

/// `Extension`
///
/// The type of the extension value is looked up in the registry
/// `certificateExtensions`.
pub fn extension() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("extnID", Schema::oid())
            .defaulted("critical", Schema::boolean(), Value::Boolean(false))
            .required("extnValue", Schema::open_octets(
                "extnID", CERTIFICATE_EXTENSIONS
            ))
    )
}

/// `Extensions`
pub fn extensions() -> Schema {
    Schema::sequence_of(extension())
}

/// `TBSCertificate`
pub fn tbs_certificate() -> Schema {
    Schema::sequence(
        Fields::new()
            .defaulted(
                "version",
                Schema::integer().explicit(Tag::CTX_0),
                Value::Integer(Integer::from(0))
            )
            .required("serialNumber", Schema::integer())
            .required("signature", algorithm_identifier())
            .required("issuer", name())
            .required("validity", validity())
            .required("subject", name())
            .required("subjectPublicKeyInfo", subject_public_key_info())
            .optional(
                "issuerUniqueID", Schema::bit_string().implicit(Tag::CTX_1)
            )
            .optional(
                "subjectUniqueID", Schema::bit_string().implicit(Tag::CTX_2)
            )
            .optional("extensions", extensions().explicit(Tag::CTX_3))
    )
}

/// `Certificate`
pub fn certificate() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("tbsCertificate", tbs_certificate())
            .required("signatureAlgorithm", algorithm_identifier())
            .required("signature", Schema::bit_string())
    )
}


//------------ CRLs ----------------------------------------------------------

/// `TBSCertList`
pub fn tbs_cert_list() -> Schema {
    Schema::sequence(
        Fields::new()
            .optional("version", Schema::integer())
            .required("signature", algorithm_identifier())
            .required("issuer", name())
            .required("thisUpdate", time())
            .optional("nextUpdate", time())
            .optional("revokedCertificates", Schema::sequence_of(
                Schema::sequence(
                    Fields::new()
                        .required("userCertificate", Schema::integer())
                        .required("revocationDate", time())
                        .optional("crlEntryExtensions", extensions())
                )
            ))
            .optional("crlExtensions", extensions().explicit(Tag::CTX_0))
    )
}

/// `CertificateList`
pub fn certificate_list() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("tbsCertList", tbs_cert_list())
            .required("signatureAlgorithm", algorithm_identifier())
            .required("signatureValue", Schema::bit_string())
    )
}


//------------ Extensions ----------------------------------------------------

/// `BasicConstraints`
pub fn basic_constraints() -> Schema {
    Schema::sequence(
        Fields::new()
            .defaulted("cA", Schema::boolean(), Value::Boolean(false))
            .optional("pathLenConstraint", Schema::integer())
    )
}

/// `AuthorityKeyIdentifier`
pub fn authority_key_identifier() -> Schema {
    Schema::sequence(
        Fields::new()
            .optional(
                "keyIdentifier", Schema::octet_string().implicit(Tag::CTX_0)
            )
            .optional(
                "authorityCertIssuer", general_names().implicit(Tag::CTX_1)
            )
            .optional(
                "authorityCertSerialNumber",
                Schema::integer().implicit(Tag::CTX_2)
            )
    )
}

/// `PolicyInformation`
pub fn policy_information() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("policyIdentifier", Schema::oid())
            .optional("policyQualifiers", Schema::sequence_of(
                Schema::sequence(
                    Fields::new()
                        .required("policyQualifierId", Schema::oid())
                        .required("qualifier", Schema::any())
                )
            ))
    )
}

/// `CertificatePolicies`
pub fn certificate_policies() -> Schema {
    Schema::sequence_of(policy_information())
}

/// `ECParameters` from RFC 5480
///
/// Specified curves are kept uninterpreted.
pub fn ec_parameters() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("namedCurve", Schema::oid())
            .variant("implicitCurve", Schema::null())
            .variant("specifiedCurve", opaque_sequence())
    )
}


//------------ register ------------------------------------------------------

/// Registers extensions, name attributes, and algorithm parameters.
pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 5280 definitions.");

    let extensions = registries.registry_mut(CERTIFICATE_EXTENSIONS);
    extensions.register(&SUBJECT_KEY_IDENTIFIER, Schema::octet_string());
    extensions.register(&KEY_USAGE, Schema::bit_string());
    extensions.register(&SUBJECT_ALT_NAME, general_names());
    extensions.register(&BASIC_CONSTRAINTS, basic_constraints());
    extensions.register(&CERTIFICATE_POLICIES, certificate_policies());
    extensions.register(&AUTHORITY_KEY_IDENTIFIER, authority_key_identifier());
    extensions.register(&EXT_KEY_USAGE, Schema::sequence_of(Schema::oid()));
    extensions.register(&INHIBIT_ANY_POLICY, Schema::integer());

    let attributes = registries.registry_mut(CERTIFICATE_ATTRIBUTES);
    attributes.register(&AT_COUNTRY_NAME, Schema::printable_string());
    attributes.register(&AT_SERIAL_NUMBER, Schema::printable_string());
    for oid in &[
        AT_COMMON_NAME, AT_LOCALITY_NAME, AT_STATE_OR_PROVINCE_NAME,
        AT_ORGANIZATION_NAME, AT_ORGANIZATIONAL_UNIT_NAME,
    ] {
        attributes.register(oid, directory_string());
    }
    attributes.register(&EMAIL_ADDRESS, Schema::ia5_string());
    attributes.register(&DOMAIN_COMPONENT, Schema::ia5_string());

    let parameters = registries.registry_mut(ALGORITHM_IDENTIFIER_PARAMETERS);
    for oid in &[
        RSA_ENCRYPTION, MD2_WITH_RSA_ENCRYPTION, MD5_WITH_RSA_ENCRYPTION,
        SHA1_WITH_RSA_ENCRYPTION, SHA224_WITH_RSA_ENCRYPTION,
        SHA256_WITH_RSA_ENCRYPTION, SHA384_WITH_RSA_ENCRYPTION,
        SHA512_WITH_RSA_ENCRYPTION,
    ] {
        parameters.register(oid, Schema::null());
    }
    parameters.register(&EC_PUBLIC_KEY, ec_parameters());
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::decode::{decode, DecodeOptions, ErrorKind};
    use crate::encode::encode;

    fn deep() -> DecodeOptions {
        DecodeOptions::deep(Arc::new(crate::catalog::registries()))
    }

    #[test]
    fn schemas_are_valid() {
        for schema in &[
            algorithm_identifier(), name(), general_names(), certificate(),
            certificate_list(), basic_constraints(),
            authority_key_identifier(), certificate_policies(),
            ec_parameters(),
        ] {
            schema.check().unwrap();
        }
    }

    #[test]
    fn basic_constraints_extension() {
        // critical TRUE, cA TRUE, pathLenConstraint 0
        let data = Bytes::from_static(
            b"\x30\x12\x06\x03\x55\x1d\x13\x01\x01\xff\
              \x04\x08\x30\x06\x01\x01\xff\x02\x01\x00"
        );
        let value = decode(data.clone(), &extension(), &deep()).unwrap();
        assert_eq!(value.get("critical").and_then(Value::as_bool), Some(true));
        let constraints = value.get("extnValue").unwrap().resolved();
        assert_eq!(constraints.get("cA").and_then(Value::as_bool), Some(true));
        assert_eq!(
            constraints.get("pathLenConstraint")
                .and_then(Value::as_integer)
                .and_then(Integer::to_i64),
            Some(0)
        );
        assert_eq!(encode(&value, &extension()).unwrap(), data.as_ref());
    }

    #[test]
    fn default_critical_is_filled_in() {
        let data = Bytes::from_static(
            b"\x30\x0a\x06\x03\x55\x1d\x36\x04\x03\x02\x01\x00"
        );
        let value = decode(data, &extension(), &deep()).unwrap();
        assert_eq!(
            value.get("critical").and_then(Value::as_bool), Some(false)
        );
        assert_eq!(
            value.get("extnValue").unwrap().resolved()
                .as_integer().and_then(Integer::to_i64),
            Some(0)
        );
    }

    #[test]
    fn invalid_registered_extension() {
        // keyUsage with a non-zero unused bit.
        let data = Bytes::from_static(
            b"\x30\x0b\x06\x03\x55\x1d\x0f\x04\x04\x03\x02\x01\x87"
        );
        let err = decode(data.clone(), &extension(), &deep()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEncoding);
        assert_eq!(err.pos().offset(), 9);

        // Shallow decoding doesn’t look inside.
        assert!(
            decode(data, &extension(), &DecodeOptions::shallow()).is_ok()
        );
    }

    #[test]
    fn general_name_choices() {
        let names = Bytes::from_static(
            b"\x30\x17\x82\x0bexample.com\x87\x04\xc0\x00\x02\x01\
              \x88\x02\x2a\x03"
        );
        let value = decode(
            names.clone(), &general_names(), &DecodeOptions::shallow()
        ).unwrap();
        let elements = value.as_elements().unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].as_choice().unwrap().variant(), "dNSName");
        assert_eq!(
            elements[0].as_choice().unwrap().value().as_str(),
            Some("example.com")
        );
        assert_eq!(elements[1].as_choice().unwrap().variant(), "iPAddress");
        assert_eq!(
            elements[2].as_choice().unwrap().variant(), "registeredID"
        );
        assert_eq!(encode(&value, &general_names()).unwrap(), names.as_ref());
    }
}
