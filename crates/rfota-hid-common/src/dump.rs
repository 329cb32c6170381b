//! Raw buffer dumping for protocol debugging

use crate::{HidCommonResult, OtaTransport};
use std::time::Duration;
use tracing::debug;

/// Log `data` as hex under `title` at debug level.
pub fn dump_raw(title: &str, data: &[u8]) {
    debug!(
        "{title} ({} bytes): {}",
        data.len(),
        hex::encode(data)
    );
}

/// Transport decorator that dumps every request and response buffer.
///
/// Purely observational: calls are forwarded unchanged and errors pass through.
pub struct DumpingTransport<T> {
    inner: T,
}

impl<T: OtaTransport> DumpingTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: OtaTransport> OtaTransport for DumpingTransport<T> {
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        dump_raw("SetFeature", data);
        self.inner.set_feature_report(data)
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        self.inner.get_feature_report(buf)?;
        dump_raw("GetFeature", buf);
        Ok(())
    }

    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
        dump_raw(&format!("Write@{offset:#x}"), data);
        self.inner.write_raw(offset, data)
    }

    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        let data = self.inner.read_raw(offset, length)?;
        dump_raw(&format!("Read@{offset:#x}"), &data);
        Ok(data)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
        self.inner.set_read_timeout(timeout)
    }
}
