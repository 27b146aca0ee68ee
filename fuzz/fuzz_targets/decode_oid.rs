#![no_main]

use std::str::FromStr;
use libfuzzer_sys::fuzz_target;
use derschema::Oid;
use bytes::Bytes;

fuzz_target!(|data: &[u8]| {
    let oid = match Oid::from_content(Bytes::copy_from_slice(data)) {
        Ok(oid) => oid,
        Err(_) => return,
    };
    let text = oid.to_string();
    assert_eq!(Oid::from_str(&text).ok(), Some(oid));
});
