//! Firmware images handed to the transfer engine

use serde::{Deserialize, Serialize};

/// Source of the image bytes and version to transfer
///
/// Container parsing happens upstream; the engine only needs the default
/// image payload and the version string written into the upgrade frame.
pub trait FirmwareSource {
    /// Default image payload.
    fn image_bytes(&self) -> &[u8];

    /// Version string, at most 10 bytes on the wire.
    fn version(&self) -> &str;
}

impl<S: FirmwareSource + ?Sized> FirmwareSource for &S {
    fn image_bytes(&self) -> &[u8] {
        (**self).image_bytes()
    }

    fn version(&self) -> &str {
        (**self).version()
    }
}

/// Owned firmware image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareImage {
    /// Image payload
    pub data: Vec<u8>,
    /// Image version
    pub version: String,
}

impl FirmwareImage {
    /// Create an image from bytes and a version.
    pub fn new(data: impl Into<Vec<u8>>, version: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            version: version.into(),
        }
    }

    /// Image size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image has no payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Parse the version as semver.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

impl FirmwareSource for FirmwareImage {
    fn image_bytes(&self) -> &[u8] {
        &self.data
    }

    fn version(&self) -> &str {
        &self.version
    }
}
