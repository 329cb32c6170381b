//! Object creation, payload streaming and packet-receipt flow control

use core::num::NonZeroUsize;
use rfota_hid_common::OtaTransport;
use rfota_hid_pxi_protocol::{FirmwareObject, OtaOpcode, frame};
use tracing::trace;

use crate::error::{OtaError, OtaResult};
use crate::notify::{ACK_OFFSET_WRITE, expect_ack};
use crate::session::SessionState;

/// Packet-receipt-notification counter for one object
///
/// The device must be read back after every `threshold` packets and after
/// the final packet of the object. A threshold of 0 acknowledges every
/// packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowController {
    threshold: u16,
    sent: u16,
}

impl FlowController {
    /// Start a counter for a fresh object.
    pub fn new(threshold: u16) -> Self {
        Self { threshold, sent: 0 }
    }

    /// Record a sent packet; returns true when an acknowledgment is due.
    pub fn on_packet(&mut self, is_last: bool) -> bool {
        self.sent = self.sent.saturating_add(1);
        self.sent >= self.threshold || is_last
    }

    /// Reset the counter after an acknowledgment was consumed.
    pub fn acknowledged(&mut self) {
        self.sent = 0;
    }

    /// Packets sent since the last acknowledgment.
    pub fn pending(&self) -> u16 {
        self.sent
    }
}

fn negotiated_mtu(session: &SessionState) -> OtaResult<NonZeroUsize> {
    NonZeroUsize::new(usize::from(session.mtu_size))
        .ok_or_else(|| OtaError::InvalidCapability("device advertised an MTU of 0".to_string()))
}

/// Create `object` on the device and stream its payload.
///
/// On success the session offset and checksum are advanced past the object
/// and the device running checksum has been verified against them.
pub fn write_object<T>(
    transport: &mut T,
    session: &mut SessionState,
    object: &FirmwareObject<'_>,
) -> OtaResult<()>
where
    T: OtaTransport + ?Sized,
{
    let mtu = negotiated_mtu(session)?;

    let create = frame::encode_object_create(object.address, object.len())?;
    transport
        .write_raw(0, &create)
        .map_err(|e| OtaError::transport(format!("failed to create object {}", object.index), e))?;
    expect_ack(transport, ACK_OFFSET_WRITE, OtaOpcode::FwObjectCreate)?;

    let total = object.packet_count(mtu);
    let mut flow = FlowController::new(session.prn_threshold);
    let mut device_checksum = 0u16;
    for (i, packet) in object.packets(mtu).enumerate() {
        transport
            .write_raw(0, &frame::encode_payload(packet))
            .map_err(|e| {
                OtaError::transport(format!("failed to write object {} packet {i}", object.index), e)
            })?;
        if flow.on_packet(i + 1 == total) {
            let note = expect_ack(transport, ACK_OFFSET_WRITE, OtaOpcode::FwWrite)?;
            trace!(
                "object {} ack after packet {i}: checksum {:#06x}",
                object.index, note.checksum
            );
            device_checksum = note.checksum;
            flow.acknowledged();
        }
    }

    session.advance(object.checksum());
    if device_checksum != session.checksum {
        return Err(OtaError::ChecksumMismatch {
            device: device_checksum,
            expected: session.checksum,
        });
    }
    Ok(())
}
