use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::device::TagDevice;
use crate::dispatch::DispatchOutcome;
use crate::error::Result;
use crate::protocol::tag::{Frame, TxParams};
use crate::types::PortAddress;

/// What happened to a frame handed to [`PortAttachment::transmit`].
#[derive(Debug)]
pub enum TxVerdict {
    /// Tagged and ready to be sent by the caller.
    Ready(Frame),
    /// Tagged and queued; the device's transmitter sends it once its
    /// two-step clone is resolved.
    Deferred,
}

/// Host-side view of one switch port.
///
/// Dropping the attachment detaches the port.
#[derive(Debug)]
pub struct PortAttachment {
    device: Arc<TagDevice>,
    address: PortAddress,
    id: u64,
    detached: CancellationToken,
}

impl PortAttachment {
    pub(super) fn new(
        device: Arc<TagDevice>,
        address: PortAddress,
        id: u64,
        detached: CancellationToken,
    ) -> Self {
        Self {
            device,
            address,
            id,
            detached,
        }
    }

    /// Port this attachment stands for.
    #[must_use]
    pub fn address(&self) -> PortAddress {
        self.address
    }

    /// Device the port belongs to.
    #[must_use]
    pub fn device(&self) -> &Arc<TagDevice> {
        &self.device
    }

    /// Tag a frame for this port.
    ///
    /// Link-local destinations set the override flag so the switch forwards
    /// them regardless of port state. A rejected frame is dropped.
    pub fn transmit(&self, frame: Frame, priority: u8) -> Result<TxVerdict> {
        let params = TxParams::new(self.address.port)
            .chip(self.address.chip)
            .priority(priority)
            .link_local(frame.is_link_local_destination())
            .hwts_enabled(self.device.hwts_enabled());

        let frame = self
            .device
            .variant()
            .encode(frame, &params)
            .inspect_err(|err| tracing::warn!(port = %self.address, %err, "dropping frame"))?;

        match self.device.dispatch(frame, self.address, &self.detached)? {
            DispatchOutcome::Immediate(frame) => Ok(TxVerdict::Ready(frame)),
            DispatchOutcome::Deferred => Ok(TxVerdict::Deferred),
        }
    }

    /// Detach the port, discarding its deferred frames.
    ///
    /// Returns the number of queued frames discarded.
    pub fn detach(self) -> usize {
        self.device.release(self.address, self.id)
    }
}

impl Drop for PortAttachment {
    fn drop(&mut self) {
        self.device.release(self.address, self.id);
    }
}
