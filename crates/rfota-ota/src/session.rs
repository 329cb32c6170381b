//! Per-transfer session state

use rfota_hid_pxi_protocol::{OtaInitNewResponse, SpecCheckResult};
use std::fmt;

/// Mutable state of one transfer
///
/// Populated from the `OtaInitNew` response, reset by the resume check on
/// mismatch, and advanced after every completed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Last reported device status
    pub status: u8,
    /// Device hint on whether a new transfer flow is required
    pub resume_flag: u8,
    /// Index of the next object the device expects
    pub offset: u16,
    /// Checksum over objects below `offset`
    pub checksum: u16,
    /// Device-advertised object size cap
    pub max_object_size: u32,
    /// Payload packet size
    pub mtu_size: u16,
    /// Packets sent before an acknowledgment is required
    pub prn_threshold: u16,
    /// Device verdict on the proposed transfer
    pub spec_check_result: SpecCheckResult,
}

impl SessionState {
    /// Build the session from a negotiated response.
    pub fn from_response(resp: &OtaInitNewResponse) -> Self {
        Self {
            status: resp.status,
            resume_flag: resp.resume_flag,
            offset: resp.offset,
            checksum: resp.checksum,
            max_object_size: resp.max_object_size,
            mtu_size: resp.mtu_size,
            prn_threshold: resp.prn_threshold,
            spec_check_result: resp.spec_check,
        }
    }

    /// Forget the device-side partial transfer.
    pub fn restart(&mut self) {
        self.offset = 0;
        self.checksum = 0;
    }

    /// Record a completed object.
    pub fn advance(&mut self, object_checksum: u16) {
        self.offset = self.offset.wrapping_add(1);
        self.checksum = self.checksum.wrapping_add(object_checksum);
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {:#x}", self.status)?;
        writeln!(f, "NewFlow: {:#x}", self.resume_flag)?;
        writeln!(f, "CurrentObjectOffset: {:#x}", self.offset)?;
        writeln!(f, "CurrentChecksum: {:#x}", self.checksum)?;
        writeln!(f, "MaxObjectSize: {:#x}", self.max_object_size)?;
        writeln!(f, "MtuSize: {:#x}", self.mtu_size)?;
        writeln!(f, "PacketReceiptNotificationThreshold: {:#x}", self.prn_threshold)?;
        write!(f, "SpecCheckResult: {}", self.spec_check_result.as_str())
    }
}
