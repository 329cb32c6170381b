//! Upgrade commit and device reset

use rfota_hid_common::OtaTransport;
use rfota_hid_pxi_protocol::{DisconnectReason, OtaOpcode, checksum16, frame};
use tracing::debug;

use crate::error::{OtaError, OtaResult};
use crate::notify::{ACK_OFFSET_UPGRADE, expect_ack};

/// Commit the transferred image.
///
/// The frame is built before any I/O, so an oversized version fails with
/// [`OtaError::Format`] without touching the transport.
pub fn fw_upgrade<T>(transport: &mut T, image: &[u8], version: &str) -> OtaResult<u16>
where
    T: OtaTransport + ?Sized,
{
    let size = frame::validate_image_len(image.len())?;
    let checksum = checksum16(image);
    let req = frame::encode_fw_upgrade(size, checksum, version)?;

    transport
        .write_raw(0, &req)
        .map_err(|e| OtaError::transport("failed to send FwUpgrade", e))?;
    expect_ack(transport, ACK_OFFSET_UPGRADE, OtaOpcode::FwUpgrade)?;
    debug!("upgrade committed: {size} bytes, checksum {checksum:#06x}, version {version}");
    Ok(checksum)
}

/// Ask the device to reboot. No acknowledgment is read.
pub fn mcu_reset<T>(transport: &mut T) -> OtaResult<()>
where
    T: OtaTransport + ?Sized,
{
    transport
        .write_raw(0, &frame::encode_mcu_reset(DisconnectReason::Reset))
        .map_err(|e| OtaError::transport("failed to reset", e))
}
