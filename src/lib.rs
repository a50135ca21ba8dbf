//! # ksz-tailtag
//!
//! Tail-tag protocol layer for Microchip KSZ and LAN937x Ethernet switches.
//!
//! ## Features
//!
//! - Tag encoding and decoding for five tag formats (KSZ8795, KSZ9477,
//!   KSZ9893, LAN937x and cascaded LAN937x)
//! - Transport checksum finalization before tagging
//! - Reconstruction of the truncated PTP receive timestamps the switch
//!   reports in the tag
//! - Deferred transmission of two-step PTP event messages
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use ksz_tailtag::testing::{RecordingReceiver, RecordingTransmitter, test_frame};
//! use ksz_tailtag::{DeviceConfig, PortAddress, TagDevice, TagVariant, TxVerdict};
//!
//! # async fn example() -> Result<(), ksz_tailtag::TailTagError> {
//! let device = TagDevice::new(
//!     DeviceConfig::for_variant(TagVariant::Extended),
//!     Arc::new(RecordingTransmitter::new()),
//!     Arc::new(RecordingReceiver::new()),
//! );
//! let port = device.attach(PortAddress::new(1))?;
//!
//! if let TxVerdict::Ready(frame) = port.transmit(test_frame(46), 0)? {
//!     // Hand the tagged frame to the host interface...
//!     # drop(frame);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Device**: `TagDevice` and `PortAttachment` - attach ports, transmit
//!   and receive
//! - **Dispatch**: `DeferredDispatcher` - per-class queues for two-step frames
//! - **Protocol**: tag codec and PTP timestamp handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod dispatch;
pub mod net;
pub mod protocol;
pub mod switch;


// Re-exports
pub use dispatch::{DeferredDispatcher, DispatchOutcome};
pub use error::{Result, TailTagError};
pub use net::{FrameReceiver, FrameTransmitter};
pub use protocol::ptp::{
    PartialTimestamp, PtpMessageClass, PtpTimestamp, ReferenceClock, TxTimestampHandle,
};
pub use protocol::tag::{Frame, TagVariant, TxParams};
pub use switch::{PortAttachment, TagDevice, TxVerdict};
pub use types::{DeviceConfig, PortAddress};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        DeviceConfig, Frame, FrameReceiver, FrameTransmitter, PortAddress, PortAttachment,
        PtpMessageClass, PtpTimestamp, TagDevice, TagVariant, TailTagError, TxVerdict,
    };
}
