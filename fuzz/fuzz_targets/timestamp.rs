#![no_main]

use libfuzzer_sys::fuzz_target;
use roadcheck_core::types::Timestamp;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = std::str::from_utf8(data) {
        if let Ok(ts) = Timestamp::parse(value) {
            // Accepted stamps must survive a display round trip.
            let _ = Timestamp::parse(&ts.to_string());
        }
    }
});
