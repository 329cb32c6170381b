//! Fuzzes the PixArt OTA response decoders with arbitrary device buffers.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_pxi_responses
#![no_main]
use libfuzzer_sys::fuzz_target;
use rfota_hid_pxi_protocol::frame::{
    parse_fw_info_response, parse_notification, parse_ota_init_new_response,
};

fuzz_target!(|data: &[u8]| {
    // Short or garbage buffers must come back as errors, never panics.
    let _ = parse_ota_init_new_response(data);
    let _ = parse_fw_info_response(data);
    let _ = parse_notification(data);
});
