//! X.509 extensions for IP addresses and AS identifiers.
//!
//! This module describes the two certificate extensions defined in
//! [RFC 3779].
//!
//! [RFC 3779]: https://tools.ietf.org/html/rfc3779

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{Registries, CERTIFICATE_EXTENSIONS};
use crate::schema::{Fields, Schema, Variants};
use crate::tag::Tag;


//------------ Object Identifiers --------------------------------------------

/// `id-pe-ipAddrBlocks`
pub const IP_ADDR_BLOCKS: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 1, 7]);

/// `id-pe-autonomousSysIds`
pub const AUTONOMOUS_SYS_IDS: ConstOid = Oid(&[43, 6, 1, 5, 5, 7, 1, 8]);


//------------ IP Address Delegation -----------------------------------------

/// `IPAddressRange`
pub fn ip_address_range() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("min", Schema::bit_string())
            .required("max", Schema::bit_string())
    )
}

/// `IPAddressOrRange`
pub fn ip_address_or_range() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("addressPrefix", Schema::bit_string())
            .variant("addressRange", ip_address_range())
    )
}

/// `IPAddressChoice`
pub fn ip_address_choice() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("inherit", Schema::null())
            .variant(
                "addressesOrRanges", Schema::sequence_of(ip_address_or_range())
            )
    )
}

/// `IPAddressFamily`
pub fn ip_address_family() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("addressFamily", Schema::octet_string())
            .required("ipAddressChoice", ip_address_choice())
    )
}

/// `IPAddrBlocks`
pub fn ip_addr_blocks() -> Schema {
    Schema::sequence_of(ip_address_family())
}


//------------ AS Identifier Delegation --------------------------------------

/// `ASRange`
pub fn as_range() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("min", Schema::integer())
            .required("max", Schema::integer())
    )
}

/// `ASIdOrRange`
pub fn as_id_or_range() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("id", Schema::integer())
            .variant("range", as_range())
    )
}

/// `ASIdentifierChoice`
pub fn as_identifier_choice() -> Schema {
    Schema::choice(
        Variants::new()
            .variant("inherit", Schema::null())
            .variant("asIdsOrRanges", Schema::sequence_of(as_id_or_range()))
    )
}

/// `ASIdentifiers`
pub fn as_identifiers() -> Schema {
    Schema::sequence(
        Fields::new()
            .optional("asnum", as_identifier_choice().explicit(Tag::CTX_0))
            .optional("rdi", as_identifier_choice().explicit(Tag::CTX_1))
    )
}


//------------ register ------------------------------------------------------

pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 3779 definitions.");
    let extensions = registries.registry_mut(CERTIFICATE_EXTENSIONS);
    extensions.register(&IP_ADDR_BLOCKS, ip_addr_blocks());
    extensions.register(&AUTONOMOUS_SYS_IDS, as_identifiers());
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::catalog::rfc5280;
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::encode;
    use crate::value::Value;

    fn deep() -> DecodeOptions {
        DecodeOptions::deep(Arc::new(crate::catalog::registries()))
    }

    #[test]
    fn ip_resources() {
        // IPv4: 10.0.0.0/8 and the range 192.168.0.0 to 192.168.1.255,
        // IPv6: inherit.
        let data = Bytes::from_static(
            b"\x30\x22\
              \x30\x18\x04\x02\x00\x01\x30\x12\
                \x03\x02\x00\x0a\
                \x30\x0c\x03\x04\x00\xc0\xa8\x00\x03\x04\x01\xc0\xa8\x00\
              \x30\x06\x04\x02\x00\x02\x05\x00"
        );
        let value = decode(
            data.clone(), &ip_addr_blocks(), &DecodeOptions::shallow()
        ).unwrap();
        let families = value.as_elements().unwrap();
        assert_eq!(families.len(), 2);
        let v4 = families[0].get("ipAddressChoice").unwrap()
            .as_choice().unwrap();
        assert_eq!(v4.variant(), "addressesOrRanges");
        let items = v4.value().as_elements().unwrap();
        assert_eq!(items[0].as_choice().unwrap().variant(), "addressPrefix");
        assert_eq!(
            items[0].as_choice().unwrap().value()
                .as_bit_string().unwrap().bit_len(),
            8
        );
        assert_eq!(items[1].as_choice().unwrap().variant(), "addressRange");
        assert_eq!(
            families[1].get("ipAddressChoice").unwrap()
                .as_choice().unwrap().variant(),
            "inherit"
        );
        assert_eq!(encode(&value, &ip_addr_blocks()).unwrap(), data.as_ref());
    }

    #[test]
    fn as_resources_in_extension() {
        // asnum: 64496 and 64500 to 64511
        let data = Bytes::from_static(
            b"\x30\x26\x06\x08\x2b\x06\x01\x05\x05\x07\x01\x08\
              \x01\x01\xff\
              \x04\x17\x30\x15\xa0\x13\x30\x11\
                \x02\x03\x00\xfb\xf0\
                \x30\x0a\x02\x03\x00\xfb\xf4\x02\x03\x00\xfb\xff"
        );
        let value = decode(data.clone(), &rfc5280::extension(), &deep())
            .unwrap();
        let ids = value.get("extnValue").unwrap();
        assert!(ids.as_open().is_some());
        assert!(ids.get("rdi").is_none());
        let asnum = ids.get("asnum").unwrap().as_choice().unwrap();
        assert_eq!(asnum.variant(), "asIdsOrRanges");
        let items = asnum.value().as_elements().unwrap();
        assert_eq!(
            items[0].as_choice().unwrap().value().as_integer()
                .and_then(|id| id.to_u64()),
            Some(64496)
        );
        assert_eq!(
            items[1].get("max").and_then(Value::as_integer)
                .and_then(|id| id.to_u64()),
            Some(64511)
        );
        assert_eq!(
            encode(&value, &rfc5280::extension()).unwrap(), data.as_ref()
        );
    }
}
