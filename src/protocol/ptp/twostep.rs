//! Two-step timestamp clones.
//!
//! When a PTP event frame needs a hardware egress timestamp, the PTP
//! collaborator attaches a [`PtpClone`] to the outgoing frame and keeps the
//! matching [`TxTimestampHandle`]. Once the switch reports the timestamp the
//! handle is completed; if no timestamp can be obtained the handle is
//! discarded. The deferred dispatcher holds the original frame back until
//! one of the two happens.

use tokio::sync::oneshot;

use super::message::PtpMessageClass;
use super::timestamp::PtpTimestamp;

/// What became of a clone's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    /// The hardware timestamp was captured.
    Captured(PtpTimestamp),
    /// The clone was discarded without a timestamp.
    Discarded,
}

/// Clone reference carried by a frame awaiting a two-step timestamp.
#[derive(Debug)]
pub struct PtpClone {
    class: PtpMessageClass,
    timestamp: oneshot::Receiver<PtpTimestamp>,
}

impl PtpClone {
    /// Create a clone and the handle used to complete it.
    #[must_use]
    pub fn pair(class: PtpMessageClass) -> (Self, TxTimestampHandle) {
        let (sender, timestamp) = oneshot::channel();
        (Self { class, timestamp }, TxTimestampHandle { class, sender })
    }

    /// Message class cached when the clone was created.
    #[must_use]
    pub fn class(&self) -> PtpMessageClass {
        self.class
    }

    /// Wait until the handle is completed or dropped.
    pub async fn wait(self) -> CloneOutcome {
        match self.timestamp.await {
            Ok(ts) => CloneOutcome::Captured(ts),
            Err(_) => CloneOutcome::Discarded,
        }
    }

    /// Outcome if it is already known.
    pub fn try_outcome(&mut self) -> Option<CloneOutcome> {
        match self.timestamp.try_recv() {
            Ok(ts) => Some(CloneOutcome::Captured(ts)),
            Err(oneshot::error::TryRecvError::Closed) => Some(CloneOutcome::Discarded),
            Err(oneshot::error::TryRecvError::Empty) => None,
        }
    }
}

/// Completion side of a [`PtpClone`], held by the PTP collaborator.
#[derive(Debug)]
pub struct TxTimestampHandle {
    class: PtpMessageClass,
    sender: oneshot::Sender<PtpTimestamp>,
}

impl TxTimestampHandle {
    /// Message class of the clone.
    #[must_use]
    pub fn class(&self) -> PtpMessageClass {
        self.class
    }

    /// Report the captured egress timestamp.
    ///
    /// Returns `false` if the frame no longer waits for it (already released
    /// or dropped).
    pub fn complete(self, timestamp: PtpTimestamp) -> bool {
        self.sender.send(timestamp).is_ok()
    }

    /// Give up on the timestamp; the frame is released without it.
    pub fn discard(self) {}

    /// Whether the frame side has gone away.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.sender.is_closed()
    }
}
