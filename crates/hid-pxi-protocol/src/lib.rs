//! PixArt RF OTA wire protocol (I/O-free).
//!
//! PixArt RF receivers and peripherals accept firmware over a vendor HID
//! collection. This crate builds the request buffers and decodes the
//! responses of that protocol without touching a device; the transfer engine
//! in `rfota-ota` drives them over an [`rfota_hid_common::OtaTransport`].
//!
//! # Modules
//! - [`ids`]: vendor ID, report IDs, opcodes, target and disconnect enums
//! - [`spec_check`]: device verdict returned by `OtaInitNew`
//! - [`frame`]: per-command encoders and decoders
//! - [`chunk`]: object and payload-packet splitting
//! - [`checksum`]: additive 16-bit checksum
//!
//! # Transfer overview
//! 1. `OtaInit` on the output report, then `OtaInitNew` on the feature report
//!    to learn MTU, PRN threshold and the resume point.
//! 2. For each 4096-byte object: `FwObjectCreate`, payload packets, and
//!    acknowledgments every PRN packets plus one after the last packet.
//! 3. `FwUpgrade` with the whole-image checksum and version, then `McuReset`.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod checksum;
pub mod chunk;
pub mod error;
pub mod frame;
pub mod ids;
pub mod spec_check;

pub use checksum::checksum16;
pub use chunk::{FirmwareObject, OBJECT_SIZE_MAX, object_count, prefix_checksum, split_objects};
pub use error::{FrameError, FrameResult};
pub use frame::{
    FwInfoResponse, NOTIFY_RET_LEN, Notification, OTA_BUF_SZ, OtaInitNewResponse,
    VERSION_FIELD_LEN,
};
pub use ids::{DisconnectReason, OtaOpcode, OtaTarget, PIXART_VENDOR_ID, PROTOCOL_ID, report_ids};
pub use spec_check::SpecCheckResult;
