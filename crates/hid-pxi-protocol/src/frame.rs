//! Request encoders and response decoders for every OTA command.
//!
//! Requests are built as owned buffers; responses are decoded from the raw
//! bytes the transport hands back. All multi-byte fields are little-endian
//! and sit at fixed offsets.
//!
//! ```text
//! OtaInitNew request   07 27 | size:u32 | target:u8 | version:[0;10]
//! OtaInitNew response  07 27 .. status@3 resume@4 offset:u16@5 checksum:u16@7
//!                      max_object:u32@9 mtu:u16@13 prn:u16@15 spec@17
//! ObjectCreate         06 25 | address:u32 | size:u32
//! Payload              06 | packet bytes
//! FwUpgrade            06 18 | size:u32 | checksum:u16 | version:[u8;10]
//! McuReset             06 22 | reason:u8
//! Notification         05 opcode@1 .. checksum:u16@3
//! ```

use crate::chunk::object_count;
use crate::error::{FrameError, FrameResult};
use crate::ids::{DisconnectReason, OtaOpcode, OtaTarget, report_ids};
use crate::spec_check::SpecCheckResult;
use rfota_hid_common::{ReportBuilder, ReportParser};

/// Size of every response buffer.
pub const OTA_BUF_SZ: usize = 32;
/// Notification payload length, excluding the report ID.
pub const NOTIFY_RET_LEN: usize = 4;
/// Firmware-info payload length, excluding the report ID.
pub const FW_INFO_RET_LEN: usize = 8;
/// Bytes requested by the `FwGetInfo` feature read.
pub const FW_INFO_GET_LEN: usize = FW_INFO_RET_LEN + 1;
/// Width of the version field in `OtaInitNew` and `FwUpgrade` requests.
pub const VERSION_FIELD_LEN: usize = 10;
/// Width of the version string reported by `FwGetInfo`.
pub const DEVICE_VERSION_LEN: usize = 5;
/// Largest number of objects a transfer can address (16-bit offset).
pub const OBJECT_COUNT_MAX: usize = u16::MAX as usize;

/// Capabilities and resume hints returned by `OtaInitNew`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtaInitNewResponse {
    pub status: u8,
    pub resume_flag: u8,
    /// Index of the next object the device expects.
    pub offset: u16,
    /// Device checksum over objects below `offset`.
    pub checksum: u16,
    pub max_object_size: u32,
    pub mtu_size: u16,
    pub prn_threshold: u16,
    pub spec_check: SpecCheckResult,
}

/// Decoded `FwGetInfo` feature report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FwInfoResponse {
    pub opcode: u8,
    pub version: String,
    pub checksum: u16,
}

/// Decoded device notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    /// Opcode of the command being acknowledged.
    pub opcode: u8,
    /// Device running checksum.
    pub checksum: u16,
}

impl Notification {
    pub fn is(&self, opcode: OtaOpcode) -> bool {
        self.opcode == opcode.as_u8()
    }
}

/// Check an image can be described on the wire and return its size field.
pub fn validate_image_len(len: usize) -> FrameResult<u32> {
    if len == 0 {
        return Err(FrameError::EmptyImage);
    }
    let size = u32::try_from(len).map_err(|_| FrameError::ImageTooLarge { len })?;
    let count = object_count(len);
    if count > OBJECT_COUNT_MAX {
        return Err(FrameError::TooManyObjects {
            count,
            max: OBJECT_COUNT_MAX,
        });
    }
    Ok(size)
}

fn output(opcode: OtaOpcode) -> ReportBuilder {
    ReportBuilder::command(report_ids::OUTPUT, opcode.as_u8())
}

pub fn encode_ota_init() -> Vec<u8> {
    output(OtaOpcode::OtaInit).into_inner()
}

pub fn encode_ota_init_new(image_size: u32, target: OtaTarget) -> Vec<u8> {
    let mut builder = ReportBuilder::command(report_ids::FEATURE, OtaOpcode::OtaInitNew.as_u8());
    builder
        .write_u32_le(image_size)
        .write_u8(target.as_u8())
        .write_bytes(&[0u8; VERSION_FIELD_LEN]);
    builder.into_inner()
}

fn feature_template(opcode: OtaOpcode) -> [u8; OTA_BUF_SZ] {
    let mut buf = [0u8; OTA_BUF_SZ];
    buf[0] = report_ids::FEATURE;
    buf[1] = opcode.as_u8();
    buf
}

/// Zeroed response buffer pre-filled with `[0x07, 0x27]`.
pub fn ota_init_new_response_template() -> [u8; OTA_BUF_SZ] {
    feature_template(OtaOpcode::OtaInitNew)
}

pub fn parse_ota_init_new_response(buf: &[u8]) -> FrameResult<OtaInitNewResponse> {
    let parser = ReportParser::new(buf);
    Ok(OtaInitNewResponse {
        status: parser.read_u8_at(3)?,
        resume_flag: parser.read_u8_at(4)?,
        offset: parser.read_u16_le_at(5)?,
        checksum: parser.read_u16_le_at(7)?,
        max_object_size: parser.read_u32_le_at(9)?,
        mtu_size: parser.read_u16_le_at(13)?,
        prn_threshold: parser.read_u16_le_at(15)?,
        spec_check: SpecCheckResult::from_u8(parser.read_u8_at(17)?),
    })
}

/// `address` and `size` are converted to the 32-bit wire fields.
pub fn encode_object_create(address: usize, size: usize) -> FrameResult<Vec<u8>> {
    let wire_address = u32::try_from(address).map_err(|_| FrameError::AddressOverflow { address })?;
    let wire_size = u32::try_from(size).map_err(|_| FrameError::ImageTooLarge { len: size })?;
    let mut builder = output(OtaOpcode::FwObjectCreate);
    builder.write_u32_le(wire_address).write_u32_le(wire_size);
    Ok(builder.into_inner())
}

pub fn encode_payload(packet: &[u8]) -> Vec<u8> {
    let mut builder = ReportBuilder::with_capacity(packet.len().saturating_add(1));
    builder.write_u8(report_ids::OUTPUT).write_bytes(packet);
    builder.into_inner()
}

/// Fails with [`FrameError::VersionTooLong`] when `version` exceeds
/// [`VERSION_FIELD_LEN`] bytes.
pub fn encode_fw_upgrade(image_size: u32, checksum: u16, version: &str) -> FrameResult<Vec<u8>> {
    check_version(version)?;
    let mut builder = output(OtaOpcode::FwUpgrade);
    builder.write_u32_le(image_size).write_u16_le(checksum);
    builder.write_fixed(version.as_bytes(), VERSION_FIELD_LEN)?;
    Ok(builder.into_inner())
}

/// Validate a version string against the upgrade frame's version field.
pub fn check_version(version: &str) -> FrameResult<()> {
    let len = version.len();
    if len > VERSION_FIELD_LEN {
        return Err(FrameError::VersionTooLong {
            len,
            max: VERSION_FIELD_LEN,
        });
    }
    Ok(())
}

pub fn encode_mcu_reset(reason: DisconnectReason) -> Vec<u8> {
    let mut builder = output(OtaOpcode::McuReset);
    builder.write_u8(reason.as_u8());
    builder.into_inner()
}

pub fn encode_fw_get_info() -> Vec<u8> {
    output(OtaOpcode::FwGetInfo).into_inner()
}

/// Zeroed response buffer pre-filled with `[0x07, 0x23]`.
pub fn fw_info_response_template() -> [u8; OTA_BUF_SZ] {
    feature_template(OtaOpcode::FwGetInfo)
}

pub fn parse_fw_info_response(buf: &[u8]) -> FrameResult<FwInfoResponse> {
    let parser = ReportParser::new(buf);
    let opcode = parser.read_u8_at(2)?;
    let raw = parser.read_bytes_at(4, DEVICE_VERSION_LEN)?;
    let version_bytes = raw.split(|&b| b == 0).next().unwrap_or_default();
    let version = String::from_utf8_lossy(version_bytes).into_owned();
    let checksum = parser.read_u16_le_at(9)?;
    Ok(FwInfoResponse {
        opcode,
        version,
        checksum,
    })
}

/// Number of bytes to read for a notification at `read_offset`.
pub fn notify_read_len(read_offset: u64) -> usize {
    let offset = usize::try_from(read_offset).unwrap_or(usize::MAX);
    (NOTIFY_RET_LEN + 1).saturating_sub(offset)
}

/// Decode the bytes returned by a notification read.
///
/// The bytes land at the start of a zeroed buffer whose first byte is the
/// input report ID, so short reads leave trailing fields zero.
pub fn parse_notification(raw: &[u8]) -> FrameResult<Notification> {
    let mut buf = [0u8; OTA_BUF_SZ];
    buf[0] = report_ids::INPUT;
    for (slot, byte) in buf.iter_mut().zip(raw) {
        *slot = *byte;
    }

    let parser = ReportParser::new(&buf);
    Ok(Notification {
        opcode: parser.read_u8_at(1)?,
        checksum: parser.read_u16_le_at(3)?,
    })
}
