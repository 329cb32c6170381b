//! Fuzzes the fixed-offset report parser used by the OTA response decoders.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_hid_common_report_parser
#![no_main]
use libfuzzer_sys::fuzz_target;
use rfota_hid_common::ReportParser;

fuzz_target!(|data: &[u8]| {
    let parser = ReportParser::new(data);
    for offset in 0..data.len().saturating_add(4) {
        let _ = parser.read_u8_at(offset);
        let _ = parser.read_u16_le_at(offset);
        let _ = parser.read_u32_le_at(offset);
        let _ = parser.read_bytes_at(offset, 10);
    }
    let _ = parser.read_bytes_at(usize::MAX, 2);
});
