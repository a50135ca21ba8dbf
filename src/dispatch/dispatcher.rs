//! Deferred dispatcher and its class workers.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::queue::{DeferredQueue, QueuedFrame};
use crate::error::Result;
use crate::net::SharedTransmitter;
use crate::protocol::ptp::{CloneOutcome, PtpMessageClass};
use crate::protocol::tag::Frame;
use crate::types::{DeviceConfig, PortAddress};

/// Result of handing a tagged frame to the dispatcher.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Send the frame now.
    Immediate(Frame),
    /// The frame is queued and will be handed to the transmitter later.
    Deferred,
}

/// What a worker did with one queued frame.
enum Release {
    Sent,
    Detached,
    Shutdown,
}

/// Per-class deferred queues and the tasks draining them.
///
/// Must be started inside a tokio runtime.
#[derive(Debug)]
pub struct DeferredDispatcher {
    queues: [Arc<DeferredQueue>; 3],
    shutdown: CancellationToken,
    workers: Mutex<Vec<JoinHandle<usize>>>,
}

impl DeferredDispatcher {
    /// Create the queues and spawn one worker per deferred class.
    #[must_use]
    pub fn start(transmitter: SharedTransmitter, config: &DeviceConfig) -> Self {
        let queues = PtpMessageClass::DEFERRED
            .map(|class| Arc::new(DeferredQueue::new(class, config.queue_capacity_hint)));
        let shutdown = CancellationToken::new();

        let workers = queues
            .iter()
            .map(|queue| {
                let worker = Worker {
                    queue: Arc::clone(queue),
                    transmitter: Arc::clone(&transmitter),
                    timeout: config.tx_timestamp_timeout,
                    shutdown: shutdown.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        tracing::debug!(
            timeout = ?config.tx_timestamp_timeout,
            "deferred dispatcher started"
        );

        Self {
            queues,
            shutdown,
            workers: Mutex::new(workers),
        }
    }

    /// Route a tagged frame.
    ///
    /// Frames without a two-step clone come straight back. A clone of class
    /// [`PtpMessageClass::Other`] is dropped, which counts as discarded, and
    /// the frame comes straight back too. Everything else is queued behind
    /// earlier frames of the same class and released by that class's worker.
    ///
    /// `detached` is the owning attachment's token; cancelling it aborts the
    /// release of any frame queued here.
    pub fn dispatch(
        &self,
        mut frame: Frame,
        owner: PortAddress,
        detached: &CancellationToken,
    ) -> Result<DispatchOutcome> {
        let Some(clone) = frame.take_ptp_clone() else {
            return Ok(DispatchOutcome::Immediate(frame));
        };

        let class = clone.class();
        let Some(queue) = self.queue(class) else {
            drop(clone);
            return Ok(DispatchOutcome::Immediate(frame));
        };

        let depth = queue.push(
            QueuedFrame {
                frame,
                clone,
                owner,
                detached: detached.clone(),
            },
            &self.shutdown,
        )?;
        queue.schedule();

        tracing::debug!(%class, %owner, depth, "frame deferred");
        Ok(DispatchOutcome::Deferred)
    }

    /// Discard every queued frame belonging to `owner`.
    pub fn drain_owner(&self, owner: PortAddress) -> usize {
        let drained: usize = self
            .queues
            .iter()
            .map(|queue| queue.drain_owner(owner))
            .sum();
        if drained > 0 {
            tracing::debug!(%owner, drained, "discarded deferred frames");
        }
        drained
    }

    /// Number of frames waiting in the queue for `class`.
    #[must_use]
    pub fn queue_len(&self, class: PtpMessageClass) -> usize {
        self.queue(class).map_or(0, |queue| queue.len())
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Stop the workers and discard everything still queued.
    ///
    /// Returns the number of frames discarded, including frames a worker was
    /// waiting on. Later calls return 0.
    pub async fn shutdown(&self) -> usize {
        self.shutdown.cancel();

        let workers = std::mem::take(
            &mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let in_flight: usize = futures::future::join_all(workers)
            .await
            .into_iter()
            .map(|joined| joined.unwrap_or_default())
            .sum();

        let queued: usize = self.queues.iter().map(|queue| queue.drain_all()).sum();
        let discarded = in_flight + queued;
        if discarded > 0 {
            tracing::debug!(discarded, "deferred dispatcher shut down");
        }
        discarded
    }

    fn queue(&self, class: PtpMessageClass) -> Option<&DeferredQueue> {
        class.queue_index().map(|index| &*self.queues[index])
    }
}

impl Drop for DeferredDispatcher {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Worker {
    queue: Arc<DeferredQueue>,
    transmitter: SharedTransmitter,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl Worker {
    /// Release frames in queue order until shut down.
    ///
    /// Returns the number of in-flight frames discarded by the shutdown.
    async fn run(self) -> usize {
        loop {
            if self.shutdown.is_cancelled() {
                return 0;
            }

            let Some(entry) = self.queue.pop() else {
                tokio::select! {
                    biased;
                    () = self.shutdown.cancelled() => return 0,
                    () = self.queue.scheduled() => {}
                }
                continue;
            };

            match self.release(entry).await {
                Release::Sent | Release::Detached => {}
                Release::Shutdown => return 1,
            }
        }
    }

    async fn release(&self, entry: QueuedFrame) -> Release {
        let QueuedFrame {
            mut frame,
            clone,
            owner,
            detached,
        } = entry;
        let class = self.queue.class();

        let outcome = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => return Release::Shutdown,
            () = detached.cancelled() => {
                tracing::debug!(%class, %owner, "owner detached, frame discarded");
                return Release::Detached;
            }
            outcome = tokio::time::timeout(self.timeout, clone.wait()) => outcome,
        };

        // On expiry the clone went down with the timed-out wait, so its
        // handle now reports abandoned exactly like an explicit discard.
        match outcome {
            Ok(CloneOutcome::Captured(timestamp)) => frame.set_hw_timestamp(timestamp),
            Ok(CloneOutcome::Discarded) => {}
            Err(_) => tracing::warn!(
                %class,
                %owner,
                timeout = ?self.timeout,
                "no tx timestamp in time, clone discarded"
            ),
        }

        tracing::debug!(%class, %owner, "releasing deferred frame");
        self.transmitter.transmit(frame, owner).await;
        Release::Sent
    }
}
