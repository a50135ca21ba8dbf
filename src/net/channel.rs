//! Channel-backed frame sinks.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::traits::{FrameReceiver, FrameTransmitter};
use crate::protocol::tag::Frame;
use crate::types::PortAddress;

/// A frame handed to the transmit path.
#[derive(Debug)]
pub struct SentFrame {
    /// The tagged frame
    pub frame: Frame,
    /// Interface that queued it
    pub owner: PortAddress,
}

/// A frame delivered to a port interface.
#[derive(Debug)]
pub struct ReceivedFrame {
    /// The untagged frame
    pub frame: Frame,
    /// Ingress port
    pub port: u8,
    /// Chip index
    pub device: u8,
}

/// Transmitter forwarding frames into an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelTransmitter {
    tx: mpsc::Sender<SentFrame>,
}

impl ChannelTransmitter {
    /// Create a transmitter and the receiving end of its channel.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<SentFrame>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameTransmitter for ChannelTransmitter {
    async fn transmit(&self, frame: Frame, owner: PortAddress) {
        if self.tx.send(SentFrame { frame, owner }).await.is_err() {
            tracing::debug!(%owner, "transmit channel closed, frame dropped");
        }
    }
}

/// Receiver forwarding frames into an unbounded mpsc channel.
///
/// Receive delivery is synchronous, so the channel never applies
/// backpressure.
#[derive(Debug, Clone)]
pub struct ChannelReceiver {
    tx: mpsc::UnboundedSender<ReceivedFrame>,
}

impl ChannelReceiver {
    /// Create a receiver and the receiving end of its channel.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ReceivedFrame>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FrameReceiver for ChannelReceiver {
    fn receive(&self, frame: Frame, port: u8, device: u8) {
        if self
            .tx
            .send(ReceivedFrame {
                frame,
                port,
                device,
            })
            .is_err()
        {
            tracing::debug!(port, device, "receive channel closed, frame dropped");
        }
    }
}
