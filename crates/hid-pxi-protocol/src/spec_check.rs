//! Device-side spec check verdict returned by `OtaInitNew`.

/// Outcome of the device validating a proposed transfer (size, version).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecCheckResult {
    Ok,
    /// Image size exceeds what the device can store.
    FirmwareOutOfBounds,
    /// OTA commands arrived out of order.
    ProcessIllegal,
    /// Device asks the host to reconnect before retrying.
    Reconnect,
    /// Image version rejected by the device.
    VersionError,
    /// Code outside the documented table.
    Unknown(u8),
}

impl SpecCheckResult {
    pub fn from_u8(code: u8) -> Self {
        match code {
            1 => SpecCheckResult::Ok,
            2 => SpecCheckResult::FirmwareOutOfBounds,
            3 => SpecCheckResult::ProcessIllegal,
            4 => SpecCheckResult::Reconnect,
            5 => SpecCheckResult::VersionError,
            other => SpecCheckResult::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SpecCheckResult::Ok => 1,
            SpecCheckResult::FirmwareOutOfBounds => 2,
            SpecCheckResult::ProcessIllegal => 3,
            SpecCheckResult::Reconnect => 4,
            SpecCheckResult::VersionError => 5,
            SpecCheckResult::Unknown(code) => code,
        }
    }

    pub fn is_ok(self) -> bool {
        self == SpecCheckResult::Ok
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SpecCheckResult::Ok => "ok",
            SpecCheckResult::FirmwareOutOfBounds => "fw-out-of-bounds",
            SpecCheckResult::ProcessIllegal => "process-illegal",
            SpecCheckResult::Reconnect => "reconnect",
            SpecCheckResult::VersionError => "fw-img-version-error",
            SpecCheckResult::Unknown(_) => "unknown",
        }
    }
}

impl core::fmt::Display for SpecCheckResult {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} [{:#04x}]", self.as_str(), self.code())
    }
}
