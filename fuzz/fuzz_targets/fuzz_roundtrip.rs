#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(spec) = cronspec::Spec::parse(s) {
            let displayed = spec.to_string();
            let reparsed = cronspec::Spec::parse(&displayed)
                .expect("display output must be parseable");
            assert_eq!(spec, reparsed, "display roundtrip changed '{s}' via '{displayed}'");
        }
    }
});
