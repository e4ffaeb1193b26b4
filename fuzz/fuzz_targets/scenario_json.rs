#![no_main]

use libfuzzer_sys::fuzz_target;
use roadcheck_analysis::Scenario;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Must return Ok or Err without crashing or panicking.
        let _ = Scenario::parse(content, "<fuzz>");
    }
});
