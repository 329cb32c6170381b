//! Framing errors.

use rfota_hid_common::HidCommonError;
use thiserror::Error;

/// Errors raised while building or decoding OTA frames.
///
/// All variants except [`FrameError::Report`] are detected from host-side
/// input alone, before any byte reaches the transport.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("version string is {len} bytes, field holds {max}")]
    VersionTooLong { len: usize, max: usize },

    #[error("firmware image is empty")]
    EmptyImage,

    #[error("firmware image of {len} bytes does not fit the 32-bit size field")]
    ImageTooLarge { len: usize },

    #[error("firmware image splits into {count} objects, at most {max} are addressable")]
    TooManyObjects { count: usize, max: usize },

    #[error("object address {address:#x} does not fit the 32-bit address field")]
    AddressOverflow { address: usize },

    #[error(transparent)]
    Report(#[from] HidCommonError),
}

pub type FrameResult<T> = Result<T, FrameError>;
