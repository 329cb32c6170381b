//! Common HID plumbing for the RF OTA transfer engine
//!
//! This crate provides the transport boundary the OTA engine is written
//! against, plus small utilities shared by the wire framer and the engine:
//!
//! - [`transport`]: the [`OtaTransport`] request/response capability
//! - [`report_parser`]: fixed-offset little-endian report reading and building
//! - [`dump`]: a transport decorator that logs raw buffers for inspection
//! - [`transport::mock`]: a scripted transport for deterministic tests
//! - `hidapi_transport` (feature `hidapi`): a `/dev/hidraw*` backed transport

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod dump;
#[cfg(feature = "hidapi")]
pub mod hidapi_transport;
pub mod report_parser;
pub mod transport;

pub use dump::{DumpingTransport, dump_raw};
#[cfg(feature = "hidapi")]
pub use hidapi_transport::HidapiTransport;
pub use report_parser::*;
pub use transport::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Failed to open device: {0}")]
    OpenError(String),

    #[error("Failed to read from device: {0}")]
    ReadError(String),

    #[error("Failed to write to device: {0}")]
    WriteError(String),

    #[error("Feature report ioctl failed: {0}")]
    FeatureReport(String),

    #[error("Read timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Device disconnected")]
    Disconnected,
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
