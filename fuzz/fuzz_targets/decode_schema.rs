#![no_main]

use std::sync::Arc;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use derschema::{canonicalize, decode, encode, DecodeOptions};
use derschema::catalog::{registries, rfc2315, rfc6066};

fuzz_target!(|data: &[u8]| {
    let data = Bytes::copy_from_slice(data);
    let options = DecodeOptions::deep(Arc::new(registries()));
    for schema in &[rfc6066::pki_path(), rfc2315::content_info()] {
        // Anything that decodes must encode, and the encoding is stable.
        if let Ok(value) = decode(data.clone(), schema, &options) {
            let encoded = Bytes::from(encode(&value, schema).unwrap());
            let again = decode(encoded.clone(), schema, &options).unwrap();
            assert_eq!(encode(&again, schema).unwrap(), encoded.as_ref());
        }
        if let Ok(canonical) = canonicalize(data.clone(), schema) {
            assert_eq!(
                canonicalize(canonical.clone(), schema).unwrap(), canonical
            );
        }
    }
});
