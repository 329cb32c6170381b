//! PixArt RF OTA identifiers: vendor ID, report IDs, command opcodes.
//!
//! The OTA interface is a vendor HID collection exposing three numbered
//! reports. Every buffer exchanged with the device starts with one of these
//! report IDs, followed (for requests) by a one-byte command opcode.
//!
//! | Report | ID     | Direction            | Used for                           |
//! |--------|--------|----------------------|------------------------------------|
//! | Input  | `0x05` | device → host        | notifications / acknowledgments    |
//! | Output | `0x06` | host → device        | commands and payload packets       |
//! | Feature| `0x07` | request/response     | OTA negotiation, firmware info     |

#![deny(static_mut_refs)]

/// PixArt Imaging USB vendor ID.
pub const PIXART_VENDOR_ID: u16 = 0x093A;

/// Update protocol identifier advertised for PixArt RF receivers.
pub const PROTOCOL_ID: &str = "com.pixart.rf";

/// HID report IDs used on the OTA interface.
pub mod report_ids {
    /// Notifications read back from the device.
    pub const INPUT: u8 = 0x05;
    /// Commands and payload written to the device.
    pub const OUTPUT: u8 = 0x06;
    /// Negotiation request/response buffers.
    pub const FEATURE: u8 = 0x07;
}

/// One-byte OTA command opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OtaOpcode {
    OtaInit = 0x10,
    FwWrite = 0x17,
    FwUpgrade = 0x18,
    McuReset = 0x22,
    FwGetInfo = 0x23,
    FwObjectCreate = 0x25,
    OtaInitNew = 0x27,
    OtaRetransmit = 0x28,
    OtaDisconnect = 0x29,
}

impl OtaOpcode {
    pub const ALL: [OtaOpcode; 9] = [
        OtaOpcode::OtaInit,
        OtaOpcode::FwWrite,
        OtaOpcode::FwUpgrade,
        OtaOpcode::McuReset,
        OtaOpcode::FwGetInfo,
        OtaOpcode::FwObjectCreate,
        OtaOpcode::OtaInitNew,
        OtaOpcode::OtaRetransmit,
        OtaOpcode::OtaDisconnect,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_u8() == value)
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            OtaOpcode::OtaInit => "OtaInit",
            OtaOpcode::FwWrite => "FwWrite",
            OtaOpcode::FwUpgrade => "FwUpgrade",
            OtaOpcode::McuReset => "McuReset",
            OtaOpcode::FwGetInfo => "FwGetInfo",
            OtaOpcode::FwObjectCreate => "FwObjectCreate",
            OtaOpcode::OtaInitNew => "OtaInitNew",
            OtaOpcode::OtaRetransmit => "OtaRetransmit",
            OtaOpcode::OtaDisconnect => "OtaDisconnect",
        }
    }
}

impl core::fmt::Display for OtaOpcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} [{:#04x}]", self.name(), self.as_u8())
    }
}

/// Which image an `OtaInitNew` request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum OtaTarget {
    #[default]
    MainFirmware = 0,
    HelperFirmware = 1,
    ExternalResource = 2,
}

impl OtaTarget {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Reason byte carried by reset/disconnect commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisconnectReason {
    CodeJump = 1,
    UpdateDone = 2,
    Reset = 3,
}

impl DisconnectReason {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}
