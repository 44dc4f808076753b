#![no_main]

use libfuzzer_sys::fuzz_target;

use watrun::wat::parse;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);
    let _ = parse(&source);
});
