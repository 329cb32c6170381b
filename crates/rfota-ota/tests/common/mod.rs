//! Protocol-aware simulated PixArt RF device for integration tests.
//!
//! Decodes every request the engine sends, keeps a flash image and running
//! checksum, and queues the notifications a real device would raise. Reads
//! with no pending notification fail, so an engine that waits for an
//! acknowledgment the device never sends is caught.

#![allow(dead_code)]

use rfota_hid_common::{HidCommonError, HidCommonResult, OtaTransport};
use rfota_hid_pxi_protocol::{OtaOpcode, SpecCheckResult, checksum16, report_ids};
use std::collections::VecDeque;
use std::time::Duration;

/// Device-side transfer parameters.
#[derive(Debug, Clone)]
pub struct DeviceParams {
    pub mtu: u16,
    pub prn: u16,
    pub max_object_size: u32,
    pub spec_check: SpecCheckResult,
    pub version: [u8; 5],
}

impl Default for DeviceParams {
    fn default() -> Self {
        Self {
            mtu: 20,
            prn: 5,
            max_object_size: 4096,
            spec_check: SpecCheckResult::Ok,
            version: *b"1.0.0",
        }
    }
}

/// Fault to inject into the simulated device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Acknowledge object creation with this opcode instead of `0x25`.
    CreateAckOpcode(u8),
    /// Acknowledge payload with this opcode instead of `0x17`.
    WriteAckOpcode(u8),
    /// Acknowledge the upgrade with this opcode instead of `0x18`.
    UpgradeAckOpcode(u8),
    /// Add one to every reported running checksum from object `n` on.
    CorruptChecksumFrom(usize),
    /// Fail the `n`th raw write (0-based).
    FailWriteAt(usize),
    /// Fail every read.
    FailReads,
}

/// Commit recorded from an `FwUpgrade` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub size: u32,
    pub checksum: u16,
    pub version: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct SimulatedDevice {
    pub params: DeviceParams,
    faults: Vec<Fault>,

    // persistent device memory
    flash: Vec<u8>,
    committed_objects: u16,
    committed_checksum: u16,

    // transfer state
    in_ota: bool,
    announced_size: Option<u32>,
    announced_target: Option<u8>,
    current_object: Option<(usize, usize)>,
    received_in_object: usize,
    packets_since_ack: u16,
    running_checksum: u16,
    notifications: VecDeque<Vec<u8>>,

    // observations
    pub writes: Vec<Vec<u8>>,
    pub reads: Vec<(u64, usize)>,
    pub feature_sets: Vec<Vec<u8>>,
    pub read_timeout: Option<Duration>,
    pub objects_created: Vec<(u32, u32)>,
    pub acks_sent: usize,
    pub commit: Option<Commit>,
    pub resets: Vec<u8>,
    pub disconnected: bool,
}

impl SimulatedDevice {
    pub fn new(params: DeviceParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Device that already holds the first `objects` objects of `image`.
    pub fn with_partial(params: DeviceParams, image: &[u8], objects: usize) -> Self {
        let mut device = Self::new(params);
        let len = objects.saturating_mul(4096).min(image.len());
        device.flash = image[..len].to_vec();
        device.committed_objects = u16::try_from(objects).unwrap_or(u16::MAX);
        device.committed_checksum = checksum16(&image[..len]);
        device
    }

    /// Device reporting an arbitrary resume point.
    pub fn with_resume_point(params: DeviceParams, offset: u16, checksum: u16) -> Self {
        let mut device = Self::new(params);
        device.committed_objects = offset;
        device.committed_checksum = checksum;
        device
    }

    pub fn inject(&mut self, fault: Fault) {
        self.faults.push(fault);
    }

    pub fn flash(&self) -> &[u8] {
        &self.flash
    }

    pub fn pending_notifications(&self) -> usize {
        self.notifications.len()
    }

    pub fn announced_target(&self) -> Option<u8> {
        self.announced_target
    }

    fn fault_opcode(&self, pick: fn(&Fault) -> Option<u8>, default: OtaOpcode) -> u8 {
        self.faults
            .iter()
            .find_map(pick)
            .unwrap_or(default.as_u8())
    }

    fn checksum_offset(&self, object_index: usize) -> u16 {
        let corrupt = self.faults.iter().any(|f| {
            matches!(f, Fault::CorruptChecksumFrom(n) if object_index >= *n)
        });
        u16::from(corrupt)
    }

    fn notify(&mut self, opcode: u8, checksum: u16) {
        let c = checksum.to_le_bytes();
        self.notifications
            .push_back(vec![report_ids::INPUT, opcode, 0x00, c[0], c[1]]);
    }

    fn handle_payload(&mut self, data: &[u8]) -> HidCommonResult<()> {
        let Some((index, size)) = self.current_object else {
            return Err(HidCommonError::WriteError("payload without object".into()));
        };
        self.flash.extend_from_slice(data);
        self.received_in_object += data.len();
        self.running_checksum = self.running_checksum.wrapping_add(checksum16(data));
        self.packets_since_ack += 1;

        let object_done = self.received_in_object >= size;
        if self.packets_since_ack >= self.params.prn.max(1) || object_done {
            let opcode = self.fault_opcode(
                |f| match f {
                    Fault::WriteAckOpcode(op) => Some(*op),
                    _ => None,
                },
                OtaOpcode::FwWrite,
            );
            let reported = self
                .running_checksum
                .wrapping_add(self.checksum_offset(index));
            self.notify(opcode, reported);
            self.packets_since_ack = 0;
        }
        if object_done {
            self.current_object = None;
            self.committed_objects = u16::try_from(index + 1).unwrap_or(u16::MAX);
            self.committed_checksum = self.running_checksum;
        }
        Ok(())
    }

    fn handle_command(&mut self, data: &[u8]) -> HidCommonResult<()> {
        let Some(&opcode) = data.get(1) else {
            return Err(HidCommonError::WriteError("empty command".into()));
        };
        match OtaOpcode::from_u8(opcode) {
            Some(OtaOpcode::OtaInit) => {
                self.in_ota = true;
            }
            Some(OtaOpcode::FwGetInfo) => {}
            Some(OtaOpcode::FwObjectCreate) => {
                let field = |at: usize| -> HidCommonResult<u32> {
                    data.get(at..at + 4)
                        .and_then(|b| b.try_into().ok())
                        .map(u32::from_le_bytes)
                        .ok_or_else(|| HidCommonError::WriteError("short create".into()))
                };
                let address = field(2)?;
                let size = field(6)?;
                self.objects_created.push((address, size));
                let address = address as usize;
                if address == 0 {
                    self.flash.clear();
                    self.running_checksum = 0;
                } else if address < self.flash.len() {
                    self.flash.truncate(address);
                    self.running_checksum = checksum16(&self.flash);
                }
                self.received_in_object = 0;
                self.packets_since_ack = 0;
                self.current_object = Some((address / 4096, size as usize));
                let opcode = self.fault_opcode(
                    |f| match f {
                        Fault::CreateAckOpcode(op) => Some(*op),
                        _ => None,
                    },
                    OtaOpcode::FwObjectCreate,
                );
                self.notify(opcode, self.running_checksum);
            }
            Some(OtaOpcode::FwUpgrade) => {
                let size = data
                    .get(2..6)
                    .and_then(|b| b.try_into().ok())
                    .map(u32::from_le_bytes)
                    .unwrap_or_default();
                let checksum = data
                    .get(6..8)
                    .and_then(|b| b.try_into().ok())
                    .map(u16::from_le_bytes)
                    .unwrap_or_default();
                self.commit = Some(Commit {
                    size,
                    checksum,
                    version: data.get(8..).unwrap_or_default().to_vec(),
                });
                let opcode = self.fault_opcode(
                    |f| match f {
                        Fault::UpgradeAckOpcode(op) => Some(*op),
                        _ => None,
                    },
                    OtaOpcode::FwUpgrade,
                );
                self.notify(opcode, 0);
            }
            Some(OtaOpcode::McuReset) => {
                self.resets.push(data.get(2).copied().unwrap_or_default());
                self.in_ota = false;
            }
            _ => {
                return Err(HidCommonError::WriteError(format!(
                    "unexpected opcode {opcode:#04x}"
                )));
            }
        }
        Ok(())
    }

    fn init_new_response(&mut self, buf: &mut [u8]) {
        // resuming continues the running checksum from the committed prefix
        self.running_checksum = self.committed_checksum;
        self.flash.truncate(usize::from(self.committed_objects) * 4096);

        let mut res = [0u8; 32];
        res[0] = report_ids::FEATURE;
        res[1] = OtaOpcode::OtaInitNew.as_u8();
        res[4] = u8::from(self.committed_objects > 0);
        res[5..7].copy_from_slice(&self.committed_objects.to_le_bytes());
        res[7..9].copy_from_slice(&self.committed_checksum.to_le_bytes());
        res[9..13].copy_from_slice(&self.params.max_object_size.to_le_bytes());
        res[13..15].copy_from_slice(&self.params.mtu.to_le_bytes());
        res[15..17].copy_from_slice(&self.params.prn.to_le_bytes());
        res[17] = self.params.spec_check.code();
        for (dst, src) in buf.iter_mut().zip(res) {
            *dst = src;
        }
    }

    fn fw_info_response(&self, buf: &mut [u8]) {
        let mut res = [0u8; 32];
        res[0] = report_ids::FEATURE;
        res[2] = OtaOpcode::FwGetInfo.as_u8();
        res[4..9].copy_from_slice(&self.params.version);
        res[9..11].copy_from_slice(&checksum16(&self.flash).to_le_bytes());
        for (dst, src) in buf.iter_mut().zip(res) {
            *dst = src;
        }
    }
}

impl OtaTransport for SimulatedDevice {
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        if self.disconnected {
            return Err(HidCommonError::Disconnected);
        }
        self.feature_sets.push(data.to_vec());
        if data.get(1) == Some(&OtaOpcode::OtaInitNew.as_u8()) {
            self.announced_size = data
                .get(2..6)
                .and_then(|b| b.try_into().ok())
                .map(u32::from_le_bytes);
            self.announced_target = data.get(6).copied();
        }
        Ok(())
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        if self.disconnected {
            return Err(HidCommonError::Disconnected);
        }
        match buf.get(1).copied() {
            Some(op) if op == OtaOpcode::OtaInitNew.as_u8() => {
                if self.announced_size.is_none() {
                    return Err(HidCommonError::FeatureReport("OtaInitNew not sent".into()));
                }
                self.init_new_response(buf);
                Ok(())
            }
            Some(op) if op == OtaOpcode::FwGetInfo.as_u8() => {
                self.fw_info_response(buf);
                Ok(())
            }
            other => Err(HidCommonError::FeatureReport(format!(
                "unsupported feature request {other:?}"
            ))),
        }
    }

    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
        if self.disconnected {
            return Err(HidCommonError::Disconnected);
        }
        let index = self.writes.len();
        self.writes.push(data.to_vec());
        if self.faults.contains(&Fault::FailWriteAt(index)) {
            return Err(HidCommonError::WriteError(format!("injected failure at write #{index}")));
        }
        if offset != 0 || data.first() != Some(&report_ids::OUTPUT) {
            return Err(HidCommonError::WriteError("not an output report".into()));
        }
        let body = data.get(1..).unwrap_or_default();
        if self.current_object.is_some() {
            self.handle_payload(body)
        } else {
            self.handle_command(data)
        }
    }

    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        self.reads.push((offset, length));
        if self.disconnected || self.faults.contains(&Fault::FailReads) {
            return Err(HidCommonError::ReadError("injected read failure".into()));
        }
        let mut note = self
            .notifications
            .pop_front()
            .ok_or(HidCommonError::Timeout { timeout_ms: 0 })?;
        note.truncate(length);
        self.acks_sent += 1;
        Ok(note)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
        self.read_timeout = timeout;
        Ok(())
    }
}

/// Deterministic non-uniform image so per-object checksums differ.
pub fn test_image(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 7)) as u8).collect()
}

/// Raw writes that are object-create commands, as `(address, size)`.
pub fn created_objects(device: &SimulatedDevice) -> Vec<(u32, u32)> {
    device.objects_created.clone()
}
