//! Tail-tag encoding and decoding.
//!
//! All five formats share one code path driven by their [`TagLayout`]:
//! the transmit tag is an integer assembled from the layout's bit positions
//! and written big-endian, the receive tag is a single byte.

use byteorder::{BigEndian, ByteOrder};

use super::checksum;
use super::frame::{ETH_HLEN, Frame};
use super::variant::{PTP_TIMESTAMP_LEN, TagLayout, TagVariant};
use crate::error::{Result, TailTagError};
use crate::protocol::ptp::{PartialTimestamp, ReferenceClock};

/// Per-frame transmit parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxParams {
    /// Egress port on the chip
    pub port: u8,
    /// Chip index (cascade only)
    pub chip: u8,
    /// Traffic class, three bits
    pub priority: u8,
    /// Destination is an IEEE 802.1 link-local address
    pub link_local: bool,
    /// Let the switch pick the port by address lookup
    pub lookup: bool,
    /// Hardware timestamping is enabled on the device
    pub hwts_enabled: bool,
}

impl TxParams {
    /// Parameters for `port` on chip 0.
    #[must_use]
    pub fn new(port: u8) -> Self {
        Self {
            port,
            ..Self::default()
        }
    }

    /// Set the chip index.
    #[must_use]
    pub fn chip(mut self, chip: u8) -> Self {
        self.chip = chip;
        self
    }

    /// Set the traffic class.
    #[must_use]
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Set the link-local override.
    #[must_use]
    pub fn link_local(mut self, link_local: bool) -> Self {
        self.link_local = link_local;
        self
    }

    /// Request address lookup.
    #[must_use]
    pub fn lookup(mut self, lookup: bool) -> Self {
        self.lookup = lookup;
        self
    }

    /// Enable the timestamp placeholder.
    #[must_use]
    pub fn hwts_enabled(mut self, enabled: bool) -> Self {
        self.hwts_enabled = enabled;
        self
    }
}

/// Fields read from a receive tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxTag {
    /// Zero-based ingress port
    pub port: u8,
    /// Chip the frame came from
    pub device: u8,
    /// A timestamp block precedes the tag byte
    pub ptp_present: bool,
    /// Bytes to strip
    pub trailer_len: usize,
}

/// A frame with its tag removed.
#[derive(Debug)]
pub struct Decoded {
    /// Frame without trailer
    pub frame: Frame,
    /// Zero-based ingress port
    pub port: u8,
    /// Chip index
    pub device: u8,
}

/// Capabilities shared by every tag format.
pub trait TailTag {
    /// Bytes the transmit tag occupies.
    fn trailer_len(&self) -> usize;

    /// Assemble the transmit tag value.
    fn tag_value(&self, params: &TxParams) -> Result<u32>;

    /// Append the transmit tag.
    fn encode_tag(&self, frame: &mut Frame, params: &TxParams) -> Result<()>;

    /// Read the receive tag at the end of `frame` without modifying it.
    fn parse_tag(&self, frame: &Frame) -> Result<RxTag>;
}

impl TailTag for TagVariant {
    fn trailer_len(&self) -> usize {
        self.tx_len()
    }

    fn tag_value(&self, params: &TxParams) -> Result<u32> {
        if !self.is_valid_port(params.chip, params.port) {
            return Err(TailTagError::InvalidPort {
                chip: params.chip,
                port: params.port,
            });
        }

        let layout: &TagLayout = self.layout();
        let shift = u32::from(params.port) + u32::from(layout.tx_port_bits) * u32::from(params.chip);
        let mut value = 1u32 << shift;

        if params.link_local {
            value |= 1 << layout.override_bit;
        }
        if params.lookup {
            value |= 1 << layout.lookup_bit;
        }
        if let Some(priority) = layout.priority {
            value |= priority.place(u32::from(params.priority));
        }
        if let Some(valid) = layout.valid_bit {
            value |= 1 << valid;
        }
        Ok(value)
    }

    fn encode_tag(&self, frame: &mut Frame, params: &TxParams) -> Result<()> {
        let value = self.tag_value(params)?;
        let len = self.tx_len();
        let mut buf = [0u8; 4];
        BigEndian::write_uint(&mut buf, u64::from(value), len);
        frame.put_slice(&buf[..len]);
        Ok(())
    }

    fn parse_tag(&self, frame: &Frame) -> Result<RxTag> {
        let layout = self.layout();
        let Some(&tag) = frame.as_bytes().last() else {
            return Err(TailTagError::UnderflowTrim {
                len: 0,
                needed: layout.rx_len + ETH_HLEN,
            });
        };

        let ptp_present = layout.rx_ptp_bit.is_some_and(|bit| tag & bit != 0);
        let device = layout
            .rx_cascade_bit
            .map_or(0, |bit| u8::from(tag & bit != 0));
        let trailer_len = self.rx_len(ptp_present);

        let needed = trailer_len + ETH_HLEN;
        if frame.len() < needed {
            return Err(TailTagError::UnderflowTrim {
                len: frame.len(),
                needed,
            });
        }

        Ok(RxTag {
            port: tag & layout.rx_port_mask,
            device,
            ptp_present,
            trailer_len,
        })
    }
}

impl TagVariant {
    /// Tag a frame for transmission.
    ///
    /// Completes any pending checksum, appends the zeroed timestamp
    /// placeholder when hardware timestamping is on and the format has one,
    /// then appends the tag.
    pub fn encode(self, mut frame: Frame, params: &TxParams) -> Result<Frame> {
        if frame.len() < ETH_HLEN {
            return Err(TailTagError::TruncatedFrame { len: frame.len() });
        }
        checksum::finalize(&mut frame)?;

        if params.hwts_enabled && self.supports_two_step() {
            frame.put_zeroes(PTP_TIMESTAMP_LEN);
        }
        self.encode_tag(&mut frame, params)?;

        tracing::trace!(
            variant = %self,
            port = params.port,
            chip = params.chip,
            len = frame.len(),
            "tagged frame"
        );
        Ok(frame)
    }

    /// Strip the tag from a received frame.
    ///
    /// When the tag announces a timestamp and a reference clock is given, the
    /// reconstructed receive time is stored on the frame.
    pub fn decode(self, mut frame: Frame, clock: Option<&ReferenceClock>) -> Result<Decoded> {
        let tag = self.parse_tag(&frame)?;

        if tag.ptp_present {
            if let Some(clock) = clock {
                let trailer = frame.tail(tag.trailer_len).ok_or(TailTagError::UnderflowTrim {
                    len: frame.len(),
                    needed: tag.trailer_len + ETH_HLEN,
                })?;
                let raw = BigEndian::read_u32(&trailer[..PTP_TIMESTAMP_LEN]);
                frame.set_hw_timestamp(clock.reconstruct(PartialTimestamp::from_raw(raw)));
            }
        }

        frame.trim(tag.trailer_len);
        frame.set_offload_fwd_mark();

        tracing::trace!(
            variant = %self,
            port = tag.port,
            device = tag.device,
            ptp = tag.ptp_present,
            "untagged frame"
        );
        Ok(Decoded {
            frame,
            port: tag.port,
            device: tag.device,
        })
    }
}
