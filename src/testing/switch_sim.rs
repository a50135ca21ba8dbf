//! Simulated switch side of the host port.
//!
//! Turns frames tagged for transmission into the frames the switch would
//! hand back, so both halves of the codec can be exercised together.

use bytes::BufMut;

use crate::protocol::ptp::PartialTimestamp;
use crate::protocol::tag::{Frame, PTP_TIMESTAMP_LEN, TagVariant};

/// Receive cascade bit of the extended formats.
const RX_CASCADE: u8 = 0x40;
/// Receive timestamp-present bit.
const RX_PTP: u8 = 0x80;

/// Build a frame as the switch sends it: `body`, an optional timestamp
/// block and the one-byte receive tag.
#[must_use]
pub fn switch_rx_frame(
    body: &[u8],
    port: u8,
    device: u8,
    timestamp: Option<PartialTimestamp>,
) -> Frame {
    let mut buf = bytes::BytesMut::from(body);
    let mut tag = port & 0x07;
    if device != 0 {
        tag |= RX_CASCADE;
    }
    if let Some(timestamp) = timestamp {
        buf.put_u32(timestamp.to_raw());
        tag |= RX_PTP;
    }
    buf.put_u8(tag);
    Frame::new(buf)
}

/// Forward a transmit-tagged frame through the simulated switch.
///
/// Strips the transmit tag (and the placeholder when `hwts` was on), reads
/// the addressed port and returns the frame as it comes back from that port.
/// `timestamp` is attached when the format can report one. Returns `None`
/// if the tag does not address exactly one port.
#[must_use]
pub fn switch_loopback(
    variant: TagVariant,
    frame: &Frame,
    hwts: bool,
    timestamp: Option<PartialTimestamp>,
) -> Option<Frame> {
    let layout = variant.layout();
    let bytes = frame.as_bytes();
    let tag_start = bytes.len().checked_sub(layout.tx_len)?;

    let value = bytes[tag_start..]
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
    let port_field_bits = u32::from(layout.tx_port_bits) * u32::from(layout.chips);
    let ports = value & ((1u32 << port_field_bits) - 1);
    if ports.count_ones() != 1 {
        return None;
    }
    let bit = ports.trailing_zeros();
    let chip = u8::try_from(bit / u32::from(layout.tx_port_bits)).ok()?;
    let port = u8::try_from(bit % u32::from(layout.tx_port_bits)).ok()?;

    let placeholder = if hwts && variant.supports_two_step() {
        PTP_TIMESTAMP_LEN
    } else {
        0
    };
    let body_end = tag_start.checked_sub(placeholder)?;
    let timestamp = timestamp.filter(|_| layout.rx_ptp_bit.is_some());

    Some(switch_rx_frame(&bytes[..body_end], port, chip, timestamp))
}
