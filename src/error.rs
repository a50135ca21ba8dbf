use std::time::Duration;

use thiserror::Error;

/// Errors raised by the tail-tag layer.
///
/// Every variant is scoped to a single frame: the frame is dropped and the
/// device, its queues and later frames are unaffected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TailTagError {
    // ===== Transmit path =====
    /// A partially computed checksum could not be finalized before tagging
    #[error("checksum finalization failed: start {start} + offset {offset} outside {len}-byte frame")]
    ChecksumFinalizationFailed {
        /// Offset where summing starts
        start: usize,
        /// Offset of the checksum field relative to `start`
        offset: usize,
        /// Frame length at the time of finalization
        len: usize,
    },

    /// Frame is too short to carry an Ethernet header
    #[error("truncated frame: {len} bytes is shorter than an Ethernet header")]
    TruncatedFrame {
        /// Frame length
        len: usize,
    },

    /// Port address is outside the range the tag format can express
    #[error("invalid port {port} on chip {chip} for this tag format")]
    InvalidPort {
        /// Chip index
        chip: u8,
        /// Port index on that chip
        port: u8,
    },

    /// The deferred dispatcher has been shut down
    #[error("deferred dispatcher closed")]
    DispatcherClosed,

    // ===== Receive path =====
    /// Decoded port does not belong to an attached interface
    #[error("no interface attached at chip {chip} port {port}")]
    UnknownDestination {
        /// Decoded chip (device) index
        chip: u8,
        /// Decoded port index
        port: u8,
    },

    /// Removing the trailer would leave less than an Ethernet header
    #[error("frame underflow: {len} bytes, trailer needs {needed}")]
    UnderflowTrim {
        /// Frame length including trailer
        len: usize,
        /// Minimum length needed to strip the trailer
        needed: usize,
    },

    /// The reference clock has not been refreshed recently
    ///
    /// Never returned from decode; reconstruction proceeds with the stale
    /// sample and this error is only logged.
    #[error("reference clock snapshot is {age:?} old")]
    StaleClockSnapshot {
        /// Time since the last update
        age: Duration,
    },

    // ===== Setup =====
    /// Port is already attached
    #[error("port {port} on chip {chip} already attached")]
    PortAlreadyAttached {
        /// Chip index
        chip: u8,
        /// Port index
        port: u8,
    },

    /// Tag format name was not recognised
    #[error("unknown tag format: {0}")]
    UnknownVariant(String),
}

impl TailTagError {
    /// Whether the error only costs the frame it was raised for
    #[must_use]
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            Self::ChecksumFinalizationFailed { .. }
                | Self::TruncatedFrame { .. }
                | Self::UnknownDestination { .. }
                | Self::UnderflowTrim { .. }
                | Self::StaleClockSnapshot { .. }
        )
    }

    /// Whether the error happened on the receive path
    #[must_use]
    pub fn is_receive_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDestination { .. } | Self::UnderflowTrim { .. }
        )
    }
}

/// Result type alias for tail-tag operations
pub type Result<T> = std::result::Result<T, TailTagError>;
