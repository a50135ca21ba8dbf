//! Precision Time Protocol (PTP, IEEE 1588) support for tail tags.
//!
//! The switch reports hardware receive timestamps inside the tail tag in a
//! truncated 32-bit form, and stamps a clone of outgoing event messages for
//! two-step operation.
//!
//! ## Timestamp flow
//!
//! ```text
//! PTP subsystem --update()--> ReferenceClock
//!                                  |
//! rx frame --[ts32|tag]--> decode --reconstruct()--> full PtpTimestamp
//!
//! PTP subsystem --attach_ptp_clone()--> tx frame --> deferred queue
//!            \--TxTimestampHandle::complete()------------^ release
//! ```

pub mod clock;
pub mod message;
pub mod timestamp;
pub mod twostep;

#[cfg(test)]
mod tests;

// Re-exports for convenient access.
pub use clock::{ReferenceClock, SharedReferenceClock, reconstruct};
pub use message::{PtpMessageClass, PtpMessageType, classify_ptp};
pub use timestamp::{PartialTimestamp, PtpTimestamp};
pub use twostep::{CloneOutcome, PtpClone, TxTimestampHandle};
