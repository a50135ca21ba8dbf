use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio_util::sync::CancellationToken;

use super::attachment::PortAttachment;
use crate::dispatch::{DeferredDispatcher, DispatchOutcome};
use crate::error::{Result, TailTagError};
use crate::net::{SharedReceiver, SharedTransmitter};
use crate::protocol::ptp::{PtpMessageClass, ReferenceClock, SharedReferenceClock};
use crate::protocol::tag::{Decoded, Frame, TagVariant};
use crate::types::{DeviceConfig, PortAddress};

#[derive(Debug)]
struct Registration {
    id: u64,
    detached: CancellationToken,
}

/// One host interface speaking a tail-tag format with the switch.
pub struct TagDevice {
    config: DeviceConfig,
    hwts_enabled: AtomicBool,
    clock: SharedReferenceClock,
    ports: RwLock<HashMap<PortAddress, Registration>>,
    next_id: AtomicU64,
    dispatcher: Option<DeferredDispatcher>,
    receiver: SharedReceiver,
}

impl std::fmt::Debug for TagDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagDevice")
            .field("variant", &self.config.variant)
            .field("hwts_enabled", &self.hwts_enabled())
            .field("ports", &self.attached_ports())
            .finish_non_exhaustive()
    }
}

impl TagDevice {
    /// Create a device.
    ///
    /// Formats with two-step support start a deferred dispatcher, which
    /// requires a tokio runtime; released frames go to `transmitter`.
    /// Untagged receive frames go to `receiver`.
    #[must_use]
    pub fn new(
        config: DeviceConfig,
        transmitter: SharedTransmitter,
        receiver: SharedReceiver,
    ) -> Arc<Self> {
        Self::with_clock(config, transmitter, receiver, ReferenceClock::shared())
    }

    /// Create a device that reconstructs timestamps against `clock`.
    #[must_use]
    pub fn with_clock(
        config: DeviceConfig,
        transmitter: SharedTransmitter,
        receiver: SharedReceiver,
        clock: SharedReferenceClock,
    ) -> Arc<Self> {
        let dispatcher = config
            .variant
            .supports_two_step()
            .then(|| DeferredDispatcher::start(transmitter, &config));

        tracing::debug!(
            variant = %config.variant,
            hwts = config.hwts_enabled,
            deferred = dispatcher.is_some(),
            "tag device created"
        );

        Arc::new(Self {
            hwts_enabled: AtomicBool::new(config.hwts_enabled),
            ports: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            config,
            clock,
            dispatcher,
            receiver,
        })
    }

    /// Tag format.
    #[must_use]
    pub fn variant(&self) -> TagVariant {
        self.config.variant
    }

    /// Configuration the device was created with.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Reference clock the PTP subsystem keeps up to date.
    #[must_use]
    pub fn clock(&self) -> SharedReferenceClock {
        Arc::clone(&self.clock)
    }

    /// Whether outgoing frames carry the timestamp placeholder.
    #[must_use]
    pub fn hwts_enabled(&self) -> bool {
        self.hwts_enabled.load(Ordering::Relaxed)
    }

    /// Toggle hardware timestamping.
    pub fn set_hwts_enabled(&self, enabled: bool) {
        self.hwts_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Extra bytes a frame needs at its tail to be tagged.
    #[must_use]
    pub fn needed_tailroom(&self) -> usize {
        self.config.variant.needed_tailroom()
    }

    /// Expose a switch port to the host.
    pub fn attach(self: &Arc<Self>, address: PortAddress) -> Result<PortAttachment> {
        if !self.variant().is_valid_port(address.chip, address.port) {
            return Err(TailTagError::InvalidPort {
                chip: address.chip,
                port: address.port,
            });
        }

        let detached = CancellationToken::new();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        {
            let mut ports = self.ports.write().unwrap_or_else(PoisonError::into_inner);
            if ports.contains_key(&address) {
                return Err(TailTagError::PortAlreadyAttached {
                    chip: address.chip,
                    port: address.port,
                });
            }
            ports.insert(
                address,
                Registration {
                    id,
                    detached: detached.clone(),
                },
            );
        }

        tracing::debug!(%address, variant = %self.variant(), "port attached");
        Ok(PortAttachment::new(Arc::clone(self), address, id, detached))
    }

    /// Whether `address` has a live attachment.
    #[must_use]
    pub fn is_attached(&self, address: PortAddress) -> bool {
        self.ports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&address)
    }

    /// Attached ports in address order.
    #[must_use]
    pub fn attached_ports(&self) -> Vec<PortAddress> {
        let mut ports: Vec<_> = self
            .ports
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        ports.sort_unstable();
        ports
    }

    /// Frames waiting in the deferred queue for `class`.
    #[must_use]
    pub fn queue_len(&self, class: PtpMessageClass) -> usize {
        self.dispatcher
            .as_ref()
            .map_or(0, |dispatcher| dispatcher.queue_len(class))
    }

    /// Strip the tag from a frame received from the switch.
    ///
    /// Reconstructs the receive timestamp when one is present. A stale
    /// reference clock is logged but does not fail the frame.
    pub fn decode(&self, frame: Frame) -> Result<Decoded> {
        let decoded = self.variant().decode(frame, Some(self.clock.as_ref()))?;

        let source = PortAddress::on_chip(decoded.device, decoded.port);
        if !self.is_attached(source) {
            return Err(TailTagError::UnknownDestination {
                chip: decoded.device,
                port: decoded.port,
            });
        }

        if decoded.frame.hw_timestamp().is_some() {
            if let Err(err) = self.clock.check_fresh(self.config.stale_clock_threshold) {
                tracing::warn!(%source, %err, "reconstructing with stale reference clock");
            }
        }
        Ok(decoded)
    }

    /// Untag a received frame and deliver it to its port's interface.
    ///
    /// Frames that cannot be delivered are dropped and the reason returned.
    pub fn receive(&self, frame: Frame) -> Result<()> {
        match self.decode(frame) {
            Ok(Decoded {
                frame,
                port,
                device,
            }) => {
                self.receiver.receive(frame, port, device);
                Ok(())
            }
            Err(err @ TailTagError::UnknownDestination { .. }) => {
                tracing::trace!(%err, "dropping frame");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(%err, "dropping malformed frame");
                Err(err)
            }
        }
    }

    /// Stop the deferred workers and discard queued frames.
    ///
    /// Returns the number of frames discarded.
    pub async fn shutdown(&self) -> usize {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.shutdown().await,
            None => 0,
        }
    }

    pub(super) fn dispatch(
        &self,
        mut frame: Frame,
        owner: PortAddress,
        detached: &CancellationToken,
    ) -> Result<DispatchOutcome> {
        match &self.dispatcher {
            Some(dispatcher) => dispatcher.dispatch(frame, owner, detached),
            None => {
                if frame.take_ptp_clone().is_some() {
                    tracing::debug!(%owner, "format has no two-step support, clone released");
                }
                Ok(DispatchOutcome::Immediate(frame))
            }
        }
    }

    /// Drop the registration made under `id` and discard its queued frames.
    pub(super) fn release(&self, address: PortAddress, id: u64) -> usize {
        let registration = {
            let mut ports = self.ports.write().unwrap_or_else(PoisonError::into_inner);
            match ports.get(&address) {
                Some(registration) if registration.id == id => ports.remove(&address),
                _ => None,
            }
        };
        let Some(registration) = registration else {
            return 0;
        };

        registration.detached.cancel();
        let drained = self
            .dispatcher
            .as_ref()
            .map_or(0, |dispatcher| dispatcher.drain_owner(address));
        tracing::debug!(%address, drained, "port detached");
        drained
    }
}
