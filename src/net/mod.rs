//! Interfaces to the network stack around the tagger.
//!
//! The tagger sits between the per-port interfaces and the host port facing
//! the switch. Tagged frames leave through a [`FrameTransmitter`]; untagged
//! receive frames are handed to a [`FrameReceiver`].

mod channel;
mod traits;


pub use channel::{ChannelReceiver, ChannelTransmitter, ReceivedFrame, SentFrame};
pub use traits::{FrameReceiver, FrameTransmitter, SharedReceiver, SharedTransmitter};
