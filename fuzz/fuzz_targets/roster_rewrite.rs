#![no_main]
use libfuzzer_sys::fuzz_target;
use roster::{from_xml_str, to_xml_string};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = from_xml_str(s) {
            let written = to_xml_string(&doc);
            assert_eq!(from_xml_str(&written).ok(), Some(doc));
        }
    }
});
