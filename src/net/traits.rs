//! Frame sink traits

use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::tag::Frame;
use crate::types::PortAddress;

/// Host-side transmit path (the master interface's queue).
///
/// Released two-step frames are handed over from the dispatcher's worker
/// tasks, so implementations must be shareable across tasks.
#[async_trait]
pub trait FrameTransmitter: Send + Sync {
    /// Send a frame that was queued on behalf of `owner`.
    async fn transmit(&self, frame: Frame, owner: PortAddress);
}

/// Delivery of untagged frames to the per-port interface.
pub trait FrameReceiver: Send + Sync {
    /// Hand over a frame received on `port` of chip `device`.
    fn receive(&self, frame: Frame, port: u8, device: u8);
}

/// Transmitter shared between a device and its dispatcher.
pub type SharedTransmitter = Arc<dyn FrameTransmitter>;

/// Receiver shared with a device.
pub type SharedReceiver = Arc<dyn FrameReceiver>;
