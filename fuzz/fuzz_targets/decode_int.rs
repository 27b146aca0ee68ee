#![no_main]

use libfuzzer_sys::fuzz_target;
use bytes::Bytes;
use derschema::Integer;

fuzz_target!(|data: &[u8]| {
    let int = match Integer::from_content(Bytes::copy_from_slice(data)) {
        Ok(int) => int,
        Err(_) => return,
    };
    if let Some(value) = int.to_i64() {
        assert_eq!(Integer::from(value), int);
    }
    if let Some(value) = int.to_u64() {
        assert_eq!(Integer::from(value), int);
        assert!(!int.is_negative());
    }
});
