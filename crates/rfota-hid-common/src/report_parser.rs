//! Fixed-offset HID report reading and building
//!
//! OTA responses are fixed-layout buffers where each field lives at a known
//! byte offset, so the parser reads by absolute position rather than
//! consuming a cursor.

use crate::{HidCommonError, HidCommonResult};

pub struct ReportParser<'a> {
    buffer: &'a [u8],
}

impl<'a> ReportParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { buffer: data }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn read_u8_at(&self, offset: usize) -> HidCommonResult<u8> {
        self.buffer
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_bounds(offset, 1))
    }

    pub fn read_u16_le_at(&self, offset: usize) -> HidCommonResult<u16> {
        let bytes = self.read_array_at::<2>(offset)?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32_le_at(&self, offset: usize) -> HidCommonResult<u32> {
        let bytes = self.read_array_at::<4>(offset)?;
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_bytes_at(&self, offset: usize, count: usize) -> HidCommonResult<&'a [u8]> {
        offset
            .checked_add(count)
            .and_then(|end| self.buffer.get(offset..end))
            .ok_or_else(|| self.out_of_bounds(offset, count))
    }

    fn read_array_at<const N: usize>(&self, offset: usize) -> HidCommonResult<[u8; N]> {
        let slice = self.read_bytes_at(offset, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn out_of_bounds(&self, offset: usize, count: usize) -> HidCommonError {
        HidCommonError::InvalidReport(format!(
            "{count} byte(s) at offset {offset:#x} exceed {}-byte report",
            self.buffer.len()
        ))
    }
}

pub struct ReportBuilder {
    buffer: Vec<u8>,
}

impl ReportBuilder {
    /// Start a report with its report ID and command byte.
    pub fn command(report_id: u8, opcode: u8) -> Self {
        let mut builder = Self::with_capacity(32);
        builder.write_u8(report_id).write_u8(opcode);
        builder
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buffer.push(value);
        self
    }

    pub fn write_u16_le(&mut self, value: u16) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32_le(&mut self, value: u32) -> &mut Self {
        self.buffer.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buffer.extend_from_slice(data);
        self
    }

    /// Copy `data` into a zero-filled field of exactly `width` bytes.
    pub fn write_fixed(&mut self, data: &[u8], width: usize) -> HidCommonResult<&mut Self> {
        if data.len() > width {
            return Err(HidCommonError::InvalidReport(format!(
                "{} bytes do not fit a {width}-byte field",
                data.len()
            )));
        }
        self.buffer.extend_from_slice(data);
        self.buffer
            .resize(self.buffer.len().saturating_add(width - data.len()), 0);
        Ok(self)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::with_capacity(32)
    }
}
