#![no_main]

use libfuzzer_sys::fuzz_target;

use watrun::wat::Lexer;

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    // The lexer must stop after Eof or the first error, never loop or panic
    let mut seen_end = false;
    for result in Lexer::new(&source) {
        assert!(!seen_end, "token produced after end of stream");
        match result {
            Ok(token) => seen_end = token.is_eof(),
            Err(_) => seen_end = true,
        }
    }
});
