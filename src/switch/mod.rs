//! Tagging device and its port attachments.
//!
//! A [`TagDevice`] stands for one host interface connected to the switch's
//! CPU port. Each switch port that is exposed to the host gets a
//! [`PortAttachment`], through which its frames are tagged on the way out.
//! Received frames are untagged by the device and delivered to the
//! attachment's interface through the [`FrameReceiver`](crate::net::FrameReceiver).

mod attachment;
mod device;

#[cfg(test)]
mod tests;

pub use attachment::{PortAttachment, TxVerdict};
pub use device::TagDevice;
