//! Tail-tag formats used by KSZ and LAN937x switches.
//!
//! A tail tag is metadata the host appends after the payload of every frame
//! it sends to the switch (and the switch appends to every frame it sends
//! back), right before the FCS. The Ethernet header stays untouched.

pub mod checksum;
pub mod codec;
pub mod frame;
pub mod variant;

#[cfg(test)]
mod tests;

pub use checksum::internet_checksum;
pub use codec::{Decoded, RxTag, TailTag, TxParams};
pub use frame::{ChecksumState, ETH_HLEN, Frame};
pub use variant::{FieldSpec, PTP_TIMESTAMP_LEN, TagLayout, TagVariant};
