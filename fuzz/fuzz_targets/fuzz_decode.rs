#![no_main]

use libfuzzer_sys::fuzz_target;

// Decoding arbitrary bytes must never panic, and anything that decodes
// successfully must round-trip through the canonical form unchanged.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(fault) = cairn_errors::codec::decode_str(text) {
        let encoded = cairn_errors::codec::encode(&fault);
        let back = cairn_errors::codec::decode(&encoded).expect("canonical form re-decodes");
        assert_eq!(back, fault);
    }
});
