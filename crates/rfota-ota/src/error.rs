//! Error types for OTA transfer operations

use rfota_hid_common::HidCommonError;
use rfota_hid_pxi_protocol::{FrameError, SpecCheckResult};
use thiserror::Error;

/// Errors that abort an OTA transfer
#[derive(Error, Debug)]
pub enum OtaError {
    /// Transport read, write or feature ioctl failed
    #[error("Transport error: {context}: {source}")]
    Transport {
        /// What the engine was doing when the transport failed
        context: String,
        /// Underlying transport error
        #[source]
        source: HidCommonError,
    },

    /// Device acknowledged with an unexpected opcode
    #[error("Protocol error: {operation} opcode got {actual:#04x}, expected {expected:#04x}")]
    UnexpectedOpcode {
        /// Command being acknowledged
        operation: &'static str,
        /// Opcode the engine waited for
        expected: u8,
        /// Opcode the device returned
        actual: u8,
    },

    /// Device advertised a capability the transfer cannot use
    #[error("Protocol error: invalid capability: {0}")]
    InvalidCapability(String),

    /// Device response could not be decoded
    #[error("Protocol error: malformed {operation} response: {source}")]
    MalformedResponse {
        /// Command whose response was malformed
        operation: &'static str,
        /// Decoder error
        #[source]
        source: FrameError,
    },

    /// Device running checksum disagrees with the host after an object
    #[error("Checksum fail: device reported {device:#06x}, expected {expected:#06x}")]
    ChecksumMismatch {
        /// Checksum from the last acknowledgment
        device: u16,
        /// Host session checksum after the object
        expected: u16,
    },

    /// Device rejected the transfer during negotiation
    #[error("Spec check failed: {0}")]
    SpecCheck(SpecCheckResult),

    /// Host-side input cannot be framed; raised before any transport I/O
    #[error("Format error: {0}")]
    Format(#[from] FrameError),
}

/// Coarse classification of OTA failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtaErrorKind {
    /// Transport I/O failure
    Transport,
    /// Unexpected or malformed device response
    Protocol,
    /// Checksum disagreement
    Checksum,
    /// Device refused the transfer
    SpecCheck,
    /// Device-side partial transfer cannot be continued
    ResumeMismatch,
    /// Invalid host-side framing input
    Format,
}

impl OtaError {
    /// Build a transport error with context.
    pub fn transport(context: impl Into<String>, source: HidCommonError) -> Self {
        OtaError::Transport {
            context: context.into(),
            source,
        }
    }

    /// Classify the error.
    pub fn kind(&self) -> OtaErrorKind {
        match self {
            OtaError::Transport { .. } => OtaErrorKind::Transport,
            OtaError::UnexpectedOpcode { .. }
            | OtaError::InvalidCapability(_)
            | OtaError::MalformedResponse { .. } => OtaErrorKind::Protocol,
            OtaError::ChecksumMismatch { .. } => OtaErrorKind::Checksum,
            OtaError::SpecCheck(_) => OtaErrorKind::SpecCheck,
            OtaError::Format(_) => OtaErrorKind::Format,
        }
    }

    /// Whether calling `write_firmware` again may succeed.
    ///
    /// Transport failures and a `Reconnect` verdict leave the device able to
    /// resume; every other kind fails the same way on retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OtaError::Transport { .. } | OtaError::SpecCheck(SpecCheckResult::Reconnect)
        )
    }
}

/// Result alias for OTA operations
pub type OtaResult<T> = Result<T, OtaError>;

/// Reason a device-reported resume point cannot be used
///
/// Always recovered from by restarting the transfer at object 0.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResumeMismatch {
    /// Device offset is past the end of the current image
    #[error("offset from device is invalid: got {offset:#x}, current maximum {objects:#x}")]
    OffsetOutOfRange {
        /// Device-reported object offset
        offset: u16,
        /// Object count of the current image
        objects: usize,
    },

    /// Device prefix was written from a different image
    #[error("checksum is different from previous fw: got {device:#06x}, expected {image:#06x}")]
    ChecksumDiffers {
        /// Device-reported prefix checksum
        device: u16,
        /// Prefix checksum of the current image
        image: u16,
    },
}

impl ResumeMismatch {
    /// Always [`OtaErrorKind::ResumeMismatch`].
    pub fn kind(&self) -> OtaErrorKind {
        OtaErrorKind::ResumeMismatch
    }

    /// Always true.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}
