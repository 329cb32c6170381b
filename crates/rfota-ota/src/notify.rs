//! Acknowledgment reads

use rfota_hid_common::OtaTransport;
use rfota_hid_pxi_protocol::{Notification, OtaOpcode, frame};

use crate::error::{OtaError, OtaResult};

/// Read offset used for object-create and payload acknowledgments.
pub const ACK_OFFSET_WRITE: u64 = 0;
/// Read offset used for the upgrade acknowledgment.
pub const ACK_OFFSET_UPGRADE: u64 = 1;

/// Block until the device returns one notification.
pub fn wait_notify<T>(transport: &mut T, read_offset: u64) -> OtaResult<Notification>
where
    T: OtaTransport + ?Sized,
{
    let len = frame::notify_read_len(read_offset);
    let raw = transport
        .read_raw(read_offset, len)
        .map_err(|e| OtaError::transport("failed to read notification", e))?;
    frame::parse_notification(&raw).map_err(|source| OtaError::MalformedResponse {
        operation: "notification",
        source,
    })
}

/// Wait for a notification and require it to acknowledge `opcode`.
pub fn expect_ack<T>(transport: &mut T, read_offset: u64, opcode: OtaOpcode) -> OtaResult<Notification>
where
    T: OtaTransport + ?Sized,
{
    let note = wait_notify(transport, read_offset)?;
    if !note.is(opcode) {
        return Err(OtaError::UnexpectedOpcode {
            operation: opcode.name(),
            expected: opcode.as_u8(),
            actual: note.opcode,
        });
    }
    Ok(note)
}
