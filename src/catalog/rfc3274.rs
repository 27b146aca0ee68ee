//! Compressed data content type for CMS.
//!
//! See [RFC 3274](https://tools.ietf.org/html/rfc3274).

use log::debug;
use crate::oid::{ConstOid, Oid};
use crate::registry::{Registries, CMS_CONTENT_TYPES};
use crate::schema::{Fields, Schema};
use super::{rfc5280, rfc5652};


/// `id-ct-compressedData`
pub const COMPRESSED_DATA: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 16, 1, 9]);

/// `id-alg-zlibCompress`
///
/// The algorithm has no parameters.
pub const ZLIB_COMPRESS: ConstOid
    = Oid(&[42, 134, 72, 134, 247, 13, 1, 9, 16, 3, 8]);

/// `CompressedData`
pub fn compressed_data() -> Schema {
    Schema::sequence(
        Fields::new()
            .required("version", Schema::integer())
            .required("compressionAlgorithm", rfc5280::algorithm_identifier())
            .required(
                "encapContentInfo", rfc5652::encapsulated_content_info()
            )
    )
}

pub fn register(registries: &mut Registries) {
    debug!("Registering RFC 3274 definitions.");
    registries.register(CMS_CONTENT_TYPES, &COMPRESSED_DATA, compressed_data());
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use bytes::Bytes;
    use crate::decode::{decode, DecodeOptions};
    use crate::encode::encode;
    use crate::value::Value;

    #[test]
    fn compressed_content_info() {
        // ContentInfo { compressedData, CompressedData { 0, zlib,
        // { id-data, [0] 'deadbeef'H } } }
        let data = Bytes::from_static(
            b"\x30\x38\
              \x06\x0b\x2a\x86\x48\x86\xf7\x0d\x01\x09\x10\x01\x09\
              \xa0\x29\x30\x27\
                \x02\x01\x00\
                \x30\x0d\x06\x0b\x2a\x86\x48\x86\xf7\x0d\x01\x09\x10\x03\x08\
                \x30\x13\x06\x09\x2a\x86\x48\x86\xf7\x0d\x01\x07\x01\
                  \xa0\x06\x04\x04\xde\xad\xbe\xef"
        );
        let options = DecodeOptions::deep(
            Arc::new(crate::catalog::registries())
        );
        let schema = rfc5652::content_info();
        let value = decode(data.clone(), &schema, &options).unwrap();
        let compressed = value.get("content").unwrap();
        assert!(compressed.as_open().is_some());
        assert_eq!(
            compressed.get("compressionAlgorithm")
                .and_then(|alg| alg.get("algorithm"))
                .and_then(Value::as_oid),
            Some(&ZLIB_COMPRESS.to_owned_oid())
        );
        assert_eq!(
            compressed.get("encapContentInfo")
                .and_then(|info| info.get("eContent"))
                .and_then(Value::as_bytes),
            Some(&Bytes::from_static(b"\xde\xad\xbe\xef"))
        );
        assert_eq!(encode(&value, &schema).unwrap(), data.as_ref());
    }
}
