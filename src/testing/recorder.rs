//! Frame sinks that remember what they were given.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::net::{FrameReceiver, FrameTransmitter};
use crate::protocol::ptp::PtpTimestamp;
use crate::protocol::tag::Frame;
use crate::types::PortAddress;

/// A frame seen by [`RecordingTransmitter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmitted {
    /// Interface that queued the frame
    pub owner: PortAddress,
    /// Frame bytes
    pub bytes: Vec<u8>,
    /// Timestamp attached on release
    pub hw_timestamp: Option<PtpTimestamp>,
}

/// Transmitter recording every frame it is handed.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    frames: Mutex<Vec<Transmitted>>,
    notify: Notify,
}

impl RecordingTransmitter {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames recorded so far.
    #[must_use]
    pub fn frames(&self) -> Vec<Transmitted> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of frames recorded so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Wait until at least `count` frames were recorded.
    ///
    /// Returns `None` if that does not happen within `limit`.
    pub async fn wait_for(&self, count: usize, limit: Duration) -> Option<Vec<Transmitted>> {
        let wait = async {
            loop {
                let notified = self.notify.notified();
                if self.count() >= count {
                    return self.frames();
                }
                notified.await;
            }
        };
        tokio::time::timeout(limit, wait).await.ok()
    }
}

#[async_trait]
impl FrameTransmitter for RecordingTransmitter {
    async fn transmit(&self, frame: Frame, owner: PortAddress) {
        let record = Transmitted {
            owner,
            hw_timestamp: frame.hw_timestamp(),
            bytes: frame.into_bytes().to_vec(),
        };
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        self.notify.notify_waiters();
    }
}

/// A frame seen by [`RecordingReceiver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    /// Ingress port
    pub port: u8,
    /// Chip index
    pub device: u8,
    /// Frame bytes without trailer
    pub bytes: Vec<u8>,
    /// Reconstructed receive timestamp
    pub hw_timestamp: Option<PtpTimestamp>,
    /// Forwarding-offload mark
    pub offload_fwd_mark: bool,
}

/// Receiver recording every frame delivered to it.
#[derive(Debug, Default)]
pub struct RecordingReceiver {
    frames: Mutex<Vec<Delivered>>,
}

impl RecordingReceiver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames delivered so far.
    #[must_use]
    pub fn frames(&self) -> Vec<Delivered> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FrameReceiver for RecordingReceiver {
    fn receive(&self, frame: Frame, port: u8, device: u8) {
        let record = Delivered {
            port,
            device,
            hw_timestamp: frame.hw_timestamp(),
            offload_fwd_mark: frame.offload_fwd_mark(),
            bytes: frame.into_bytes().to_vec(),
        };
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
