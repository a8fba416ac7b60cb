#![no_main]

use libfuzzer_sys::fuzz_target;
use qpcr_optimizer::input::{parse_values, ConditionText, InputFile};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // None of the input parsers may panic
        let _ = parse_values("fuzz", input);
        let _ = ConditionText::from_spec(input);
        let _ = InputFile::parse(input);
    }
});
