//! Transport capability consumed by the OTA engine

use crate::HidCommonResult;
use std::time::Duration;

/// Synchronous request/response access to one HID OTA interface.
///
/// Every call blocks until the device answers or the call fails. Buffers
/// carry their report ID in byte 0.
pub trait OtaTransport {
    /// Send a feature report (`HIDIOCSFEATURE`).
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()>;

    /// Fetch a feature report into `buf` (`HIDIOCGFEATURE`).
    ///
    /// `buf[0]` holds the report ID on entry; the whole buffer length is requested.
    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()>;

    /// Write an output report at a logical offset.
    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()>;

    /// Read `length` bytes of input report at a logical offset.
    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>>;

    /// Bound how long [`OtaTransport::read_raw`] may block. `None` blocks forever.
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> HidCommonResult<()> {
        Ok(())
    }
}

impl<T: OtaTransport + ?Sized> OtaTransport for &mut T {
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        (**self).set_feature_report(data)
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        (**self).get_feature_report(buf)
    }

    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
        (**self).write_raw(offset, data)
    }

    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        (**self).read_raw(offset, length)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
        (**self).set_read_timeout(timeout)
    }
}

impl<T: OtaTransport + ?Sized> OtaTransport for Box<T> {
    fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
        (**self).set_feature_report(data)
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        (**self).get_feature_report(buf)
    }

    fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
        (**self).write_raw(offset, data)
    }

    fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        (**self).read_raw(offset, length)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
        (**self).set_read_timeout(timeout)
    }
}

pub mod mock {
    //! Scripted transport: queued responses in, recorded calls out.

    use super::*;
    use crate::HidCommonError;
    use std::collections::VecDeque;

    /// One recorded call against a [`MockTransport`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TransportCall {
        SetFeature(Vec<u8>),
        GetFeature { len: usize },
        WriteRaw { offset: u64, data: Vec<u8> },
        ReadRaw { offset: u64, len: usize },
        SetReadTimeout(Option<Duration>),
    }

    #[derive(Debug, Default)]
    pub struct MockTransport {
        feature_queue: VecDeque<Vec<u8>>,
        read_queue: VecDeque<Vec<u8>>,
        calls: Vec<TransportCall>,
        fail_write_at: Option<usize>,
        writes_seen: usize,
        disconnected: bool,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the bytes the next `get_feature_report` copies into its buffer.
        pub fn queue_feature(&mut self, data: Vec<u8>) {
            self.feature_queue.push_back(data);
        }

        /// Queue the bytes the next `read_raw` returns (truncated to the requested length).
        pub fn queue_read(&mut self, data: Vec<u8>) {
            self.read_queue.push_back(data);
        }

        /// Make the `index`-th `write_raw` call (0-based) fail.
        pub fn fail_write_at(&mut self, index: usize) {
            self.fail_write_at = Some(index);
        }

        pub fn disconnect(&mut self) {
            self.disconnected = true;
        }

        pub fn reconnect(&mut self) {
            self.disconnected = false;
        }

        pub fn calls(&self) -> &[TransportCall] {
            &self.calls
        }

        /// Payloads of every `write_raw` call, in order.
        pub fn raw_writes(&self) -> Vec<Vec<u8>> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    TransportCall::WriteRaw { data, .. } => Some(data.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn pending_reads(&self) -> usize {
            self.read_queue.len()
        }

        fn check_connected(&self) -> HidCommonResult<()> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            Ok(())
        }
    }

    impl OtaTransport for MockTransport {
        fn set_feature_report(&mut self, data: &[u8]) -> HidCommonResult<()> {
            self.check_connected()?;
            self.calls.push(TransportCall::SetFeature(data.to_vec()));
            Ok(())
        }

        fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
            self.check_connected()?;
            self.calls.push(TransportCall::GetFeature { len: buf.len() });
            let data = self.feature_queue.pop_front().ok_or_else(|| {
                HidCommonError::FeatureReport("No feature report queued".to_string())
            })?;
            for (dst, src) in buf.iter_mut().zip(data) {
                *dst = src;
            }
            Ok(())
        }

        fn write_raw(&mut self, offset: u64, data: &[u8]) -> HidCommonResult<()> {
            self.check_connected()?;
            let index = self.writes_seen;
            self.writes_seen += 1;
            if self.fail_write_at == Some(index) {
                return Err(HidCommonError::WriteError(format!(
                    "Mock write failure at write #{index}"
                )));
            }
            self.calls.push(TransportCall::WriteRaw {
                offset,
                data: data.to_vec(),
            });
            Ok(())
        }

        fn read_raw(&mut self, offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
            self.check_connected()?;
            self.calls.push(TransportCall::ReadRaw {
                offset,
                len: length,
            });
            let mut data = self
                .read_queue
                .pop_front()
                .ok_or_else(|| HidCommonError::ReadError("No data available".to_string()))?;
            data.truncate(length);
            Ok(data)
        }

        fn set_read_timeout(&mut self, timeout: Option<Duration>) -> HidCommonResult<()> {
            self.calls.push(TransportCall::SetReadTimeout(timeout));
            Ok(())
        }
    }
}
