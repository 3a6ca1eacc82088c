//! Fuzz target for base64 blob decoding.

#![no_main]

use githubctl::materialize::decode_blob;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(payload) = std::str::from_utf8(data) {
        let _ = decode_blob("fuzz", payload);
    }
});
