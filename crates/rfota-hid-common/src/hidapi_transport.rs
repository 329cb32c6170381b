//! `hidapi`-backed transport for a hidraw node opened by path
//!
//! hidraw has no notion of a file position, so the logical offsets of the
//! [`OtaTransport`] contract only affect how many bytes are requested.

use crate::{HidCommonError, HidCommonResult, OtaTransport};
use hidapi::{HidApi, HidDevice};
use std::ffi::CString;
use std::time::Duration;
use tracing::{debug, trace};

pub struct HidapiTransport {
    device: HidDevice,
    read_timeout: Option<Duration>,
}

impl HidapiTransport {
    /// Open the interface at `path` (e.g. `/dev/hidraw3`).
    pub fn open(path: &str) -> HidCommonResult<Self> {
        let api = HidApi::new().map_err(|e| HidCommonError::OpenError(e.to_string()))?;
        let c_path = CString::new(path)
            .map_err(|e| HidCommonError::OpenError(format!("invalid path {path:?}: {e}")))?;
        let device = api
            .open_path(&c_path)
            .map_err(|e| HidCommonError::OpenError(format!("{path}: {e}")))?;
        debug!("Opened OTA interface at {}", path);
        Ok(Self::from_device(device))
    }

    pub fn from_device(device: HidDevice) -> Self {
        Self {
            device,
            read_timeout: None,
        }
    }
}

/// hidapi read timeout in milliseconds; `-1` blocks.
fn hidapi_timeout_ms(timeout: Option<Duration>) -> i32 {
    match timeout {
        Some(timeout) => i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX),
        None => -1,
    }
}

/// Timeout reported in [`HidCommonError::Timeout`].
fn reported_timeout_ms(timeout: Option<Duration>) -> u64 {
    timeout
        .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

impl OtaTransport for HidapiTransport {
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        self.device
            .send_feature_report(data)
            .map_err(|e| HidCommonError::FeatureReport(e.to_string()))
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        let read = self
            .device
            .get_feature_report(buf)
            .map_err(|e| HidCommonError::FeatureReport(e.to_string()))?;
        trace!("GetFeature returned {} of {} bytes", read, buf.len());
        Ok(())
    }

    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
        trace!("write at logical offset {:#x}", offset);
        let written = self
            .device
            .write(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))?;
        if written != data.len() {
            return Err(HidCommonError::WriteError(format!(
                "short write: {written} of {} bytes",
                data.len()
            )));
        }
        Ok(())
    }

    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        trace!("read at logical offset {:#x}", offset);
        let mut buf = vec![0u8; length];
        let read = self
            .device
            .read_timeout(&mut buf, hidapi_timeout_ms(self.read_timeout))
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        if read == 0 && length > 0 {
            return Err(HidCommonError::Timeout {
                timeout_ms: reported_timeout_ms(self.read_timeout),
            });
        }
        buf.truncate(read);
        Ok(buf)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
        self.read_timeout = timeout;
        Ok(())
    }
}
