//! OTA initialization, capability negotiation and firmware info
//!
//! The device is first switched into OTA mode with `OtaInit`, then told the
//! image size with `OtaInitNew`. The `OtaInitNew` response carries the
//! transfer parameters (MTU, PRN threshold) and the device-side resume point.

use rfota_hid_common::OtaTransport;
use rfota_hid_pxi_protocol::{OBJECT_SIZE_MAX, OtaOpcode, OtaTarget, SpecCheckResult, frame};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{OtaError, OtaResult};
use crate::session::SessionState;

/// Firmware currently running on the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFirmwareInfo {
    /// Version string, at most five characters
    pub version: String,
    /// Device-reported image checksum
    pub checksum: u16,
}

impl DeviceFirmwareInfo {
    /// Parse the version as semver when it is a `major.minor.patch` triplet.
    pub fn semver(&self) -> Option<semver::Version> {
        semver::Version::parse(&self.version).ok()
    }
}

/// Switch the device into OTA mode.
pub fn ota_init<T>(transport: &mut T) -> OtaResult<()>
where
    T: OtaTransport + ?Sized,
{
    transport
        .write_raw(0, &frame::encode_ota_init())
        .map_err(|e| OtaError::transport("failed to send OtaInit", e))
}

/// Announce an image of `image_size` bytes and read back the session
/// parameters.
///
/// Fails with [`OtaError::SpecCheck`] when the device rejects the transfer and
/// with [`OtaError::InvalidCapability`] when it advertises an MTU of zero.
pub fn ota_init_new<T>(
    transport: &mut T,
    image_size: u32,
    target: OtaTarget,
    settle_delay: Duration,
) -> OtaResult<SessionState>
where
    T: OtaTransport + ?Sized,
{
    transport
        .set_feature_report(&frame::encode_ota_init_new(image_size, target))
        .map_err(|e| OtaError::transport("failed to send OtaInitNew", e))?;

    if !settle_delay.is_zero() {
        std::thread::sleep(settle_delay);
    }

    let mut res = frame::ota_init_new_response_template();
    transport
        .get_feature_report(&mut res)
        .map_err(|e| OtaError::transport("failed to read OtaInitNew response", e))?;
    let resp = frame::parse_ota_init_new_response(&res).map_err(|source| {
        OtaError::MalformedResponse {
            operation: OtaOpcode::OtaInitNew.name(),
            source,
        }
    })?;

    let session = SessionState::from_response(&resp);
    debug!("negotiated session:\n{session}");

    if session.spec_check_result != SpecCheckResult::Ok {
        return Err(OtaError::SpecCheck(session.spec_check_result));
    }
    if session.mtu_size == 0 {
        return Err(OtaError::InvalidCapability(
            "device advertised an MTU of 0".to_string(),
        ));
    }
    let cap = usize::try_from(session.max_object_size).unwrap_or(usize::MAX);
    if cap != 0 && cap < OBJECT_SIZE_MAX {
        warn!(
            "device max object size {} is below {}; transferring {}-byte objects anyway",
            session.max_object_size, OBJECT_SIZE_MAX, OBJECT_SIZE_MAX
        );
    }
    Ok(session)
}

/// Query the running firmware's version and checksum.
pub fn fw_get_info<T>(transport: &mut T) -> OtaResult<DeviceFirmwareInfo>
where
    T: OtaTransport + ?Sized,
{
    transport
        .write_raw(0, &frame::encode_fw_get_info())
        .map_err(|e| OtaError::transport("failed to send FwGetInfo", e))?;

    // Only the first FW_INFO_GET_LEN bytes are requested; the rest of the
    // response buffer stays zero.
    let mut res = frame::fw_info_response_template();
    let mut window = [0u8; frame::FW_INFO_GET_LEN];
    for (dst, src) in window.iter_mut().zip(res) {
        *dst = src;
    }
    transport
        .get_feature_report(&mut window)
        .map_err(|e| OtaError::transport("failed to read FwGetInfo response", e))?;
    for (dst, src) in res.iter_mut().zip(window) {
        *dst = src;
    }
    let info = frame::parse_fw_info_response(&res).map_err(|source| {
        OtaError::MalformedResponse {
            operation: OtaOpcode::FwGetInfo.name(),
            source,
        }
    })?;

    if info.opcode != OtaOpcode::FwGetInfo.as_u8() {
        return Err(OtaError::UnexpectedOpcode {
            operation: OtaOpcode::FwGetInfo.name(),
            expected: OtaOpcode::FwGetInfo.as_u8(),
            actual: info.opcode,
        });
    }
    Ok(DeviceFirmwareInfo {
        version: info.version,
        checksum: info.checksum,
    })
}
