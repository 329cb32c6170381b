//! Transfer sequencer
//!
//! Drives one complete update:
//!
//! | Step | Status  | Exchange                                  |
//! |------|---------|-------------------------------------------|
//! | 1    | Busy    | `OtaInit`, `OtaInitNew`                   |
//! | 2    | Busy    | resume check against the device offset    |
//! | 3    | Write   | per object: create, stream, acknowledge   |
//! | 4    | Verify  | `FwUpgrade` with whole-image checksum     |
//! | 5    | Restart | `McuReset`, no acknowledgment             |
//!
//! The image size and version are validated before step 1, so framing
//! errors never reach the device.

use rfota_hid_common::{DumpingTransport, OtaTransport};
use rfota_hid_pxi_protocol::{frame, object_count, split_objects};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::{OtaConfig, duration_ms};
use crate::error::{OtaError, OtaResult};
use crate::firmware::FirmwareSource;
use crate::flow::write_object;
use crate::negotiation::{DeviceFirmwareInfo, fw_get_info, ota_init, ota_init_new};
use crate::observer::{DeviceStatus, UpdateEvent, UpdateObserver};
use crate::resume::resolve_resume;
use crate::upgrade::{fw_upgrade, mcu_reset};

/// Summary of a completed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Objects in the image
    pub objects_total: usize,
    /// Objects written during this run
    pub objects_written: usize,
    /// Object index the transfer resumed from, if any
    pub resumed_from: Option<u16>,
    /// Checksum committed with `FwUpgrade`
    pub image_checksum: u16,
    /// Image size in bytes
    pub image_size: u32,
    /// Wall time of the transfer
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

/// OTA updater bound to one device transport
///
/// Holding the transport by value and taking `&mut self` for every
/// operation keeps a single transfer in flight per device.
#[derive(Debug)]
pub struct OtaUpdater<T> {
    transport: T,
    config: OtaConfig,
}

impl<T: OtaTransport> OtaUpdater<T> {
    /// Create an updater over `transport`.
    pub fn new(transport: T, config: OtaConfig) -> Self {
        Self { transport, config }
    }

    /// Active configuration.
    pub fn config(&self) -> &OtaConfig {
        &self.config
    }

    /// Borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Release the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Enter OTA mode and read the running firmware's version and checksum.
    pub fn setup(&mut self) -> OtaResult<DeviceFirmwareInfo> {
        let info = if self.config.verbose {
            let mut transport = DumpingTransport::new(&mut self.transport);
            ota_init(&mut transport)?;
            fw_get_info(&mut transport)?
        } else {
            ota_init(&mut self.transport)?;
            fw_get_info(&mut self.transport)?
        };
        info!(
            "device firmware {} (checksum {:#06x})",
            info.version, info.checksum
        );
        Ok(info)
    }

    /// Transfer `firmware`, commit it and reboot the device.
    ///
    /// Emits `Busy`, `Write`, `Verify` and `Restart` status events in that
    /// order and one progress event per object written.
    pub fn write_firmware<F>(
        &mut self,
        firmware: &F,
        observer: &mut dyn UpdateObserver,
    ) -> OtaResult<UpdateReport>
    where
        F: FirmwareSource + ?Sized,
    {
        if self.config.verbose {
            let mut transport = DumpingTransport::new(&mut self.transport);
            run_transfer(&mut transport, &self.config, firmware, observer)
        } else {
            run_transfer(&mut self.transport, &self.config, firmware, observer)
        }
    }
}

fn run_transfer<X, F>(
    transport: &mut X,
    config: &OtaConfig,
    firmware: &F,
    observer: &mut dyn UpdateObserver,
) -> OtaResult<UpdateReport>
where
    X: OtaTransport + ?Sized,
    F: FirmwareSource + ?Sized,
{
    let image = firmware.image_bytes();
    let version = firmware.version();
    let image_size = frame::validate_image_len(image.len())?;
    frame::check_version(version)?;

    let started = Instant::now();
    let objects_total = object_count(image.len());
    info!(
        "Starting OTA transfer: {image_size} bytes, {objects_total} objects, version {version}"
    );

    observer.on_event(UpdateEvent::Status(DeviceStatus::Busy));
    if let Some(timeout) = config.ack_timeout {
        transport
            .set_read_timeout(Some(timeout))
            .map_err(|e| OtaError::transport("failed to set acknowledgment timeout", e))?;
    }
    ota_init(transport)?;
    let mut session = ota_init_new(transport, image_size, config.ota_target, config.settle_delay)?;

    if let Some(mismatch) = resolve_resume(&mut session, image) {
        observer.on_event(UpdateEvent::ResumeRejected(mismatch));
    }
    let start = usize::from(session.offset);
    let resumed_from = (start > 0).then_some(session.offset);
    if let Some(offset) = resumed_from {
        info!("Resuming OTA transfer at object {offset}/{objects_total}");
    }

    observer.on_event(UpdateEvent::Status(DeviceStatus::Write));
    for object in split_objects(image).skip(start) {
        write_object(transport, &mut session, &object)?;
        let completed = object.index.saturating_add(1);
        debug!(
            "object {completed}/{objects_total} written, checksum {:#06x}",
            session.checksum
        );
        observer.on_event(UpdateEvent::Progress {
            completed,
            total: objects_total,
        });
    }

    observer.on_event(UpdateEvent::Status(DeviceStatus::Verify));
    let image_checksum = fw_upgrade(transport, image, version)?;

    observer.on_event(UpdateEvent::Status(DeviceStatus::Restart));
    mcu_reset(transport)?;

    let report = UpdateReport {
        objects_total,
        objects_written: objects_total.saturating_sub(start),
        resumed_from,
        image_checksum,
        image_size,
        elapsed: started.elapsed(),
    };
    info!(
        "OTA transfer complete: {} objects written in {:?}",
        report.objects_written, report.elapsed
    );
    Ok(report)
}
