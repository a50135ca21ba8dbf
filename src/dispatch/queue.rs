use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TailTagError};
use crate::protocol::ptp::{PtpClone, PtpMessageClass};
use crate::protocol::tag::Frame;
use crate::types::PortAddress;

/// A frame parked until its clone is resolved.
#[derive(Debug)]
pub(crate) struct QueuedFrame {
    pub frame: Frame,
    pub clone: PtpClone,
    pub owner: PortAddress,
    /// Cancelled when the owning attachment goes away
    pub detached: CancellationToken,
}

/// FIFO of deferred frames for one message class.
#[derive(Debug)]
pub(crate) struct DeferredQueue {
    class: PtpMessageClass,
    frames: Mutex<VecDeque<QueuedFrame>>,
    wake: Notify,
}

impl DeferredQueue {
    pub fn new(class: PtpMessageClass, capacity: usize) -> Self {
        Self {
            class,
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            wake: Notify::new(),
        }
    }

    pub fn class(&self) -> PtpMessageClass {
        self.class
    }

    /// Append a frame unless `closed` has fired; returns the new depth.
    ///
    /// The check happens under the queue lock so a frame is either rejected
    /// or visible to the final drain.
    pub fn push(&self, entry: QueuedFrame, closed: &CancellationToken) -> Result<usize> {
        let mut frames = self.lock();
        if closed.is_cancelled() {
            return Err(TailTagError::DispatcherClosed);
        }
        frames.push_back(entry);
        Ok(frames.len())
    }

    pub fn pop(&self) -> Option<QueuedFrame> {
        self.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Wake the worker. Wake-ups requested while the worker is busy collapse
    /// into a single pending one.
    pub fn schedule(&self) {
        self.wake.notify_one();
    }

    pub fn scheduled(&self) -> Notified<'_> {
        self.wake.notified()
    }

    /// Discard every frame queued by `owner`.
    pub fn drain_owner(&self, owner: PortAddress) -> usize {
        let mut frames = self.lock();
        let before = frames.len();
        frames.retain(|entry| entry.owner != owner);
        before - frames.len()
    }

    /// Discard everything.
    pub fn drain_all(&self) -> usize {
        let mut frames = self.lock();
        let count = frames.len();
        frames.clear();
        count
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<QueuedFrame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
