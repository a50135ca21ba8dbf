//! Testing utilities: frame builders, a simulated switch and recording sinks.

pub mod recorder;
pub mod switch_sim;

use bytes::{BufMut, BytesMut};

use crate::protocol::ptp::PtpMessageType;
use crate::protocol::tag::{ETH_HLEN, Frame};

pub use recorder::{Delivered, RecordingReceiver, RecordingTransmitter, Transmitted};
pub use switch_sim::{switch_loopback, switch_rx_frame};

/// Unicast destination used by [`test_frame`].
pub const TEST_DESTINATION: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
/// Source address of every built frame.
pub const TEST_SOURCE: [u8; 6] = [0x02, 0x00, 0x00, 0x00, 0x00, 0x02];
/// Link-local destination used by [`link_local_frame`] (LLDP).
pub const LINK_LOCAL_DESTINATION: [u8; 6] = [0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E];
/// Multicast destination for PTP over Ethernet.
pub const PTP_DESTINATION: [u8; 6] = [0x01, 0x1B, 0x19, 0x00, 0x00, 0x00];

const ETH_P_IP: u16 = 0x0800;
const ETH_P_LLDP: u16 = 0x88CC;
const ETH_P_1588: u16 = 0x88F7;
const PTP_HEADER_LEN: usize = 34;

fn build(destination: [u8; 6], ethertype: u16, payload: &[u8]) -> Frame {
    let mut buf = BytesMut::with_capacity(ETH_HLEN + payload.len());
    buf.put_slice(&destination);
    buf.put_slice(&TEST_SOURCE);
    buf.put_u16(ethertype);
    buf.put_slice(payload);
    Frame::new(buf)
}

/// Counting byte pattern of `len` bytes.
#[must_use]
pub fn payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).unwrap_or_default())
        .collect()
}

/// Unicast IPv4 frame with `payload_len` bytes after the MAC header.
#[must_use]
pub fn test_frame(payload_len: usize) -> Frame {
    build(TEST_DESTINATION, ETH_P_IP, &payload(payload_len))
}

/// LLDP frame to a link-local address.
#[must_use]
pub fn link_local_frame(payload_len: usize) -> Frame {
    build(LINK_LOCAL_DESTINATION, ETH_P_LLDP, &payload(payload_len))
}

/// PTPv2 over Ethernet frame with a bare header of the given type.
#[must_use]
pub fn ptp_frame(message_type: PtpMessageType) -> Frame {
    let mut header = [0u8; PTP_HEADER_LEN];
    header[0] = message_type as u8;
    header[1] = 2;
    let message_length = u16::try_from(PTP_HEADER_LEN).unwrap_or(u16::MAX);
    header[2..4].copy_from_slice(&message_length.to_be_bytes());
    build(PTP_DESTINATION, ETH_P_1588, &header)
}
