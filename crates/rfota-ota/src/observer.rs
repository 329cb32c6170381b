//! Progress and status reporting

use serde::{Deserialize, Serialize};
use std::sync::mpsc;
use tracing::trace;

use crate::error::ResumeMismatch;

/// Device status reported while a transfer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceStatus {
    /// Negotiating with the device
    Busy,
    /// Streaming objects
    Write,
    /// Committing the upgrade
    Verify,
    /// Rebooting into the new image
    Restart,
}

/// Event emitted by the transfer engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    /// Device status changed
    Status(DeviceStatus),
    /// An object was written
    Progress {
        /// Objects completed, including those resumed past
        completed: usize,
        /// Objects in the image
        total: usize,
    },
    /// The device-side partial transfer was discarded
    ResumeRejected(ResumeMismatch),
}

/// Receiver of transfer events
pub trait UpdateObserver {
    /// Handle one event. Called synchronously from the transfer loop.
    fn on_event(&mut self, event: UpdateEvent);
}

impl<F> UpdateObserver for F
where
    F: FnMut(UpdateEvent),
{
    fn on_event(&mut self, event: UpdateEvent) {
        self(event);
    }
}

impl UpdateObserver for mpsc::Sender<UpdateEvent> {
    fn on_event(&mut self, event: UpdateEvent) {
        if self.send(event).is_err() {
            trace!("update event receiver dropped");
        }
    }
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl UpdateObserver for NullObserver {
    fn on_event(&mut self, _event: UpdateEvent) {}
}
