//! Convenience re-exports for common OTA types

pub use crate::config::OtaConfig;
pub use crate::error::{OtaError, OtaErrorKind, OtaResult, ResumeMismatch};
pub use crate::firmware::{FirmwareImage, FirmwareSource};
pub use crate::negotiation::DeviceFirmwareInfo;
pub use crate::observer::{DeviceStatus, NullObserver, UpdateEvent, UpdateObserver};
pub use crate::sequencer::{OtaUpdater, UpdateReport};
pub use crate::session::SessionState;
pub use rfota_hid_common::OtaTransport;
pub use rfota_hid_pxi_protocol::{OtaTarget, SpecCheckResult};
