//! Resumable OTA firmware transfer for PixArt RF HID devices
//!
//! This crate drives the complete update of a wireless peripheral over an
//! [`OtaTransport`]:
//! - Capability negotiation (MTU, packet-receipt threshold, spec check)
//! - Resume from the device-reported object offset when the prefix matches
//! - Object creation and payload streaming with periodic acknowledgments
//! - Upgrade commit with whole-image checksum, then device reset
//!
//! # Architecture
//!
//! - [`sequencer`]: [`OtaUpdater`], the end-to-end transfer
//! - [`negotiation`]: `OtaInit`, `OtaInitNew`, `FwGetInfo`
//! - [`resume`]: resume decision
//! - [`flow`]: object writes and flow control
//! - [`notify`]: acknowledgment reads
//! - [`upgrade`]: upgrade commit and reset
//! - [`session`]: per-transfer state
//! - [`observer`]: progress and status events
//! - [`config`]: serde configuration
//! - [`error`]: error types
//!
//! Wire framing lives in `rfota-hid-pxi-protocol`; the transport trait and
//! test doubles live in `rfota-hid-common`.
//!
//! # Example
//!
//! ```ignore
//! use rfota_ota::prelude::*;
//!
//! let transport = rfota_hid_common::HidapiTransport::open("/dev/hidraw3")?;
//! let mut updater = OtaUpdater::new(transport, OtaConfig::default());
//! let current = updater.setup()?;
//! println!("running {}", current.version);
//!
//! let image = FirmwareImage::new(std::fs::read("fw.bin")?, "1.0.3");
//! let report = updater.write_firmware(&image, &mut |event: UpdateEvent| {
//!     println!("{event:?}");
//! })?;
//! println!("wrote {} objects", report.objects_written);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod firmware;
pub mod flow;
pub mod negotiation;
pub mod notify;
pub mod observer;
pub mod prelude;
pub mod resume;
pub mod sequencer;
pub mod session;
pub mod upgrade;

pub use config::OtaConfig;
pub use error::{OtaError, OtaErrorKind, OtaResult, ResumeMismatch};
pub use firmware::{FirmwareImage, FirmwareSource};
pub use negotiation::DeviceFirmwareInfo;
pub use observer::{DeviceStatus, NullObserver, UpdateEvent, UpdateObserver};
pub use rfota_hid_common::OtaTransport;
pub use sequencer::{OtaUpdater, UpdateReport};
pub use session::SessionState;
