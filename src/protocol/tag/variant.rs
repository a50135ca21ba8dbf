//! Tail-tag formats and their bit layouts.
//!
//! ```text
//! Host -> switch (transmit), tag written big-endian before the FCS:
//! DA(6)|SA(6)|....|Data(n)|[ts placeholder(4)]|tag(tx_len)|FCS(4)
//!
//! Switch -> host (receive), one tag byte before the FCS:
//! DA(6)|SA(6)|....|Data(n)|[ptp ts(4)]|tag0(1)|FCS(4)
//!   tag0 bits 0-2: zero-based source port
//!   tag0 bit 6:    cascade chip (extended formats)
//!   tag0 bit 7:    PTP timestamp present (all but ksz8795)
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TailTagError;

/// Size of the PTP timestamp block that may precede the tag.
pub const PTP_TIMESTAMP_LEN: usize = 4;

/// Position and width of a multi-bit field inside the transmit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Bit offset of the least significant bit
    pub shift: u32,
    /// Width in bits
    pub width: u32,
}

impl FieldSpec {
    /// Place `value` in the field, dropping bits that do not fit.
    #[must_use]
    pub fn place(&self, value: u32) -> u32 {
        (value & ((1 << self.width) - 1)) << self.shift
    }
}

/// Static description of one tag format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagLayout {
    /// Bytes appended on transmit (excluding the timestamp placeholder)
    pub tx_len: usize,
    /// Bytes stripped on receive when no timestamp is present
    pub rx_len: usize,
    /// Port mask bits per chip on transmit
    pub tx_port_bits: u8,
    /// Number of chained chips the transmit port field addresses
    pub chips: u8,
    /// Override bit: forward regardless of port state (link-local traffic)
    pub override_bit: u32,
    /// Lookup bit: forward by address lookup instead of the port mask
    pub lookup_bit: u32,
    /// Valid bit the CPU must set for the switch to honour the tag
    pub valid_bit: Option<u32>,
    /// Priority field
    pub priority: Option<FieldSpec>,
    /// Mask of the source port in the receive tag byte
    pub rx_port_mask: u8,
    /// Receive tag bit announcing a timestamp block
    pub rx_ptp_bit: Option<u8>,
    /// Receive tag bit selecting the second chip of a cascade
    pub rx_cascade_bit: Option<u8>,
    /// Whether the format supports the transmit timestamp placeholder and
    /// deferred two-step transmission
    pub two_step: bool,
}

const BASIC8: TagLayout = TagLayout {
    tx_len: 1,
    rx_len: 1,
    tx_port_bits: 6,
    chips: 1,
    override_bit: 6,
    lookup_bit: 7,
    valid_bit: None,
    priority: None,
    rx_port_mask: 0x07,
    rx_ptp_bit: None,
    rx_cascade_bit: None,
    two_step: false,
};

const BASIC9477: TagLayout = TagLayout {
    tx_len: 2,
    rx_len: 1,
    tx_port_bits: 8,
    chips: 1,
    override_bit: 9,
    lookup_bit: 10,
    valid_bit: None,
    priority: None,
    rx_port_mask: 0x07,
    rx_ptp_bit: Some(0x80),
    rx_cascade_bit: None,
    two_step: false,
};

const BASIC9893: TagLayout = TagLayout {
    tx_len: 1,
    rx_len: 1,
    tx_port_bits: 5,
    chips: 1,
    override_bit: 5,
    lookup_bit: 6,
    valid_bit: None,
    priority: None,
    rx_port_mask: 0x07,
    rx_ptp_bit: Some(0x80),
    rx_cascade_bit: None,
    two_step: false,
};

const EXTENDED: TagLayout = TagLayout {
    tx_len: 2,
    rx_len: 1,
    tx_port_bits: 8,
    chips: 1,
    override_bit: 11,
    lookup_bit: 12,
    valid_bit: Some(13),
    priority: Some(FieldSpec { shift: 8, width: 3 }),
    rx_port_mask: 0x07,
    rx_ptp_bit: Some(0x80),
    rx_cascade_bit: Some(0x40),
    two_step: true,
};

// Same flags as EXTENDED, one byte higher to make room for the second chip.
const EXTENDED_CASCADE: TagLayout = TagLayout {
    tx_len: 3,
    rx_len: 1,
    tx_port_bits: 8,
    chips: 2,
    override_bit: 19,
    lookup_bit: 20,
    valid_bit: Some(21),
    priority: Some(FieldSpec {
        shift: 16,
        width: 3,
    }),
    rx_port_mask: 0x07,
    rx_ptp_bit: Some(0x80),
    rx_cascade_bit: Some(0x40),
    two_step: true,
};

/// Supported tail-tag formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagVariant {
    /// KSZ8795 family: one-byte port mask
    #[serde(rename = "ksz8795")]
    Basic8,
    /// KSZ9477 family: two-byte transmit tag
    #[serde(rename = "ksz9477")]
    Basic9477,
    /// KSZ9893 family: one-byte transmit tag
    #[serde(rename = "ksz9893")]
    Basic9893,
    /// LAN937x: priority, valid bit and PTP support
    #[serde(rename = "lan937x")]
    Extended,
    /// Two cascaded LAN937x chips behind one host port
    #[serde(rename = "lan937x_cascade")]
    ExtendedCascade,
}

impl TagVariant {
    /// All formats.
    pub const ALL: [Self; 5] = [
        Self::Basic8,
        Self::Basic9477,
        Self::Basic9893,
        Self::Extended,
        Self::ExtendedCascade,
    ];

    /// Bit layout of this format.
    #[must_use]
    pub const fn layout(self) -> &'static TagLayout {
        match self {
            Self::Basic8 => &BASIC8,
            Self::Basic9477 => &BASIC9477,
            Self::Basic9893 => &BASIC9893,
            Self::Extended => &EXTENDED,
            Self::ExtendedCascade => &EXTENDED_CASCADE,
        }
    }

    /// Protocol name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic8 => "ksz8795",
            Self::Basic9477 => "ksz9477",
            Self::Basic9893 => "ksz9893",
            Self::Extended => "lan937x",
            Self::ExtendedCascade => "lan937x_cascade",
        }
    }

    /// Bytes appended by the tag itself on transmit.
    #[must_use]
    pub const fn tx_len(self) -> usize {
        self.layout().tx_len
    }

    /// Bytes stripped on receive.
    #[must_use]
    pub const fn rx_len(self, ptp_present: bool) -> usize {
        if ptp_present {
            self.layout().rx_len + PTP_TIMESTAMP_LEN
        } else {
            self.layout().rx_len
        }
    }

    /// Worst-case bytes appended on transmit, including the placeholder.
    #[must_use]
    pub const fn needed_tailroom(self) -> usize {
        if self.layout().two_step {
            self.tx_len() + PTP_TIMESTAMP_LEN
        } else {
            self.tx_len()
        }
    }

    /// Whether frames can carry a two-step clone through the deferred queues.
    #[must_use]
    pub const fn supports_two_step(self) -> bool {
        self.layout().two_step
    }

    /// Whether the receive tag carries a cascade chip bit.
    #[must_use]
    pub const fn is_extended(self) -> bool {
        self.layout().rx_cascade_bit.is_some()
    }

    /// Number of chips addressable through one host port.
    #[must_use]
    pub const fn chips(self) -> u8 {
        self.layout().chips
    }

    /// Ports per chip that both directions of the tag can express.
    #[must_use]
    pub const fn ports_per_chip(self) -> u8 {
        let layout = self.layout();
        let rx_ports = layout.rx_port_mask + 1;
        if layout.tx_port_bits < rx_ports {
            layout.tx_port_bits
        } else {
            rx_ports
        }
    }

    /// Whether `(chip, port)` can be addressed by this format.
    #[must_use]
    pub const fn is_valid_port(self, chip: u8, port: u8) -> bool {
        chip < self.chips() && port < self.ports_per_chip()
    }
}

impl std::fmt::Display for TagVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TagVariant {
    type Err = TailTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TailTagError::UnknownVariant(s.to_string()))
    }
}
