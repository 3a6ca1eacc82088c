//! Fuzz target for GitHub contents responses.
//!
//! Feeds arbitrary bytes to the contents parser and, for file bodies, to
//! the blob decoder, checking for panics, crashes, or hangs.

#![no_main]

use githubctl::materialize::decode_blob;
use githubctl::remote::client::Contents;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(Contents::File(file)) = Contents::from_slice(data) {
        if let Ok(payload) = file.into_base64() {
            let _ = decode_blob("fuzz", &payload);
        }
    }
});
