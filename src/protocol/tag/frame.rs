//! Ethernet frame buffer with tail-tag metadata.

use bytes::{BufMut, BytesMut};

use crate::protocol::ptp::{PtpClone, PtpMessageClass, PtpTimestamp, TxTimestampHandle};

/// Length of an Ethernet header (destination, source, EtherType).
pub const ETH_HLEN: usize = 14;

/// Checksum state of the frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumState {
    /// Nothing left to compute.
    #[default]
    Complete,
    /// A transport checksum still has to be folded in before the frame
    /// leaves the host.
    ///
    /// The field at `start + offset` holds the pseudo-header seed; the sum
    /// covers everything from `start` to the end of the payload.
    Partial {
        /// Offset where summing starts
        start: usize,
        /// Offset of the 16-bit checksum field relative to `start`
        offset: usize,
    },
}

/// One Ethernet frame, without FCS.
///
/// The tag codec appends to and trims from the tail and reads the MAC header
/// at the head; everything in between is opaque payload.
#[derive(Debug, Default)]
pub struct Frame {
    data: BytesMut,
    checksum: ChecksumState,
    hw_timestamp: Option<PtpTimestamp>,
    ptp_clone: Option<PtpClone>,
    offload_fwd_mark: bool,
}

impl Frame {
    /// Wrap a frame buffer.
    #[must_use]
    pub fn new(data: impl Into<BytesMut>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Copy a frame out of a slice.
    #[must_use]
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(BytesMut::from(data))
    }

    /// Mark a transport checksum as still to be computed.
    #[must_use]
    pub fn with_partial_checksum(mut self, start: usize, offset: usize) -> Self {
        self.checksum = ChecksumState::Partial { start, offset };
        self
    }

    /// Frame length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the frame is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Frame bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable frame bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Take the buffer, dropping metadata.
    #[must_use]
    pub fn into_bytes(self) -> BytesMut {
        self.data
    }

    /// Destination MAC address.
    #[must_use]
    pub fn destination(&self) -> Option<[u8; 6]> {
        self.data.get(..6)?.try_into().ok()
    }

    /// Whether the destination is an IEEE 802.1 link-local address
    /// (`01:80:C2:00:00:00` to `01:80:C2:00:00:0F`).
    #[must_use]
    pub fn is_link_local_destination(&self) -> bool {
        self.destination()
            .is_some_and(|da| da[..5] == [0x01, 0x80, 0xC2, 0x00, 0x00] && da[5] & 0xF0 == 0)
    }

    /// Current checksum state.
    #[must_use]
    pub fn checksum_state(&self) -> ChecksumState {
        self.checksum
    }

    pub(crate) fn set_checksum_state(&mut self, state: ChecksumState) {
        self.checksum = state;
    }

    /// Hardware timestamp: reconstructed receive time, or the captured
    /// egress time of a released two-step frame.
    #[must_use]
    pub fn hw_timestamp(&self) -> Option<PtpTimestamp> {
        self.hw_timestamp
    }

    /// Set the hardware timestamp.
    pub fn set_hw_timestamp(&mut self, timestamp: PtpTimestamp) {
        self.hw_timestamp = Some(timestamp);
    }

    /// Attach a two-step clone labelled with `class`.
    ///
    /// The returned handle reports the egress timestamp once the switch has
    /// captured it. Any previously attached clone is released.
    pub fn attach_ptp_clone(&mut self, class: PtpMessageClass) -> TxTimestampHandle {
        let (clone, handle) = PtpClone::pair(class);
        self.ptp_clone = Some(clone);
        handle
    }

    /// Attached two-step clone, if any.
    #[must_use]
    pub fn ptp_clone(&self) -> Option<&PtpClone> {
        self.ptp_clone.as_ref()
    }

    /// Detach the two-step clone.
    pub fn take_ptp_clone(&mut self) -> Option<PtpClone> {
        self.ptp_clone.take()
    }

    /// Whether the switch already forwarded this frame in hardware.
    #[must_use]
    pub fn offload_fwd_mark(&self) -> bool {
        self.offload_fwd_mark
    }

    pub(crate) fn set_offload_fwd_mark(&mut self) {
        self.offload_fwd_mark = true;
    }

    pub(crate) fn put_slice(&mut self, bytes: &[u8]) {
        self.data.put_slice(bytes);
    }

    pub(crate) fn put_zeroes(&mut self, count: usize) {
        self.data.put_bytes(0, count);
    }

    /// Last `count` bytes, if present.
    pub(crate) fn tail(&self, count: usize) -> Option<&[u8]> {
        let start = self.data.len().checked_sub(count)?;
        Some(&self.data[start..])
    }

    pub(crate) fn trim(&mut self, count: usize) {
        let len = self.data.len().saturating_sub(count);
        self.data.truncate(len);
    }
}

impl From<Vec<u8>> for Frame {
    fn from(data: Vec<u8>) -> Self {
        Self::new(BytesMut::from(&data[..]))
    }
}
