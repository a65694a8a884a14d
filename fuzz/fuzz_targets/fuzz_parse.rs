#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // errors are fine, panics are not
        if let Err(e) = cronspec::Spec::parse(s) {
            let _ = e.display_rich();
        }
    }
});
