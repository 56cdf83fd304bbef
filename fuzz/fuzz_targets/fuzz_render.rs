#![no_main]

use libfuzzer_sys::fuzz_target;

use cairn_errors::{render, MultiCauseStyle, RenderOptions};

// Any decodable payload must render without panicking, under both
// multi-cause policies, and identically across repeated calls.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(fault) = cairn_errors::codec::decode_str(text) {
        for style in [MultiCauseStyle::ListCodes, MultiCauseStyle::Elide] {
            let options = RenderOptions { multi_cause: style };
            let first = render::render_with(&fault, &options);
            let second = render::render_with(&fault, &options);
            assert_eq!(first, second);
        }
    }
});
