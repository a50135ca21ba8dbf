//! PTP message types and frame classification.
//!
//! Only the header fields needed to decide how a frame is transmitted are
//! parsed here: the message type nibble and the version. Frames are matched
//! on Layer 2 (EtherType `0x88F7`) and on UDP over IPv4/IPv6 (ports 319 and
//! 320), with or without a single 802.1Q tag.

/// PTP message type identifiers (IEEE 1588 Section 13.3.2.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PtpMessageType {
    /// Sync, carries T1.
    Sync = 0x00,
    /// Delay request.
    DelayReq = 0x01,
    /// Peer delay request.
    PdelayReq = 0x02,
    /// Peer delay response.
    PdelayResp = 0x03,
    /// Follow-up, carries precise T1.
    FollowUp = 0x08,
    /// Delay response.
    DelayResp = 0x09,
    /// Peer delay response follow-up.
    PdelayRespFollowUp = 0x0A,
    /// Announce.
    Announce = 0x0B,
    /// Signaling.
    Signaling = 0x0C,
    /// Management.
    Management = 0x0D,
}

impl PtpMessageType {
    /// Parse from the lower 4 bits of a byte.
    #[must_use]
    pub fn from_nibble(value: u8) -> Option<Self> {
        match value & 0x0F {
            0x00 => Some(Self::Sync),
            0x01 => Some(Self::DelayReq),
            0x02 => Some(Self::PdelayReq),
            0x03 => Some(Self::PdelayResp),
            0x08 => Some(Self::FollowUp),
            0x09 => Some(Self::DelayResp),
            0x0A => Some(Self::PdelayRespFollowUp),
            0x0B => Some(Self::Announce),
            0x0C => Some(Self::Signaling),
            0x0D => Some(Self::Management),
            _ => None,
        }
    }

    /// Whether this message type is an event message (requires timestamping).
    #[must_use]
    pub fn is_event(&self) -> bool {
        (*self as u8) < 0x08
    }
}

impl std::fmt::Display for PtpMessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sync => "Sync",
            Self::DelayReq => "Delay_Req",
            Self::PdelayReq => "Pdelay_Req",
            Self::PdelayResp => "Pdelay_Resp",
            Self::FollowUp => "Follow_Up",
            Self::DelayResp => "Delay_Resp",
            Self::PdelayRespFollowUp => "Pdelay_Resp_Follow_Up",
            Self::Announce => "Announce",
            Self::Signaling => "Signaling",
            Self::Management => "Management",
        };
        f.write_str(name)
    }
}

/// How a two-step clone is handled on transmit.
///
/// Sync, `Pdelay_Req` and `Pdelay_Resp` each get their own deferred queue;
/// everything else is sent straight away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PtpMessageClass {
    /// Sync messages.
    Sync,
    /// Peer delay requests.
    PdelayReq,
    /// Peer delay responses.
    PdelayResp,
    /// Anything else.
    Other,
}

impl PtpMessageClass {
    /// Classes that are released through a deferred queue, in queue order.
    pub const DEFERRED: [Self; 3] = [Self::Sync, Self::PdelayReq, Self::PdelayResp];

    /// Whether frames of this class wait for their clone's timestamp.
    #[must_use]
    pub fn is_deferred(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Index of the deferred queue for this class.
    #[must_use]
    pub(crate) fn queue_index(self) -> Option<usize> {
        match self {
            Self::Sync => Some(0),
            Self::PdelayReq => Some(1),
            Self::PdelayResp => Some(2),
            Self::Other => None,
        }
    }
}

impl From<PtpMessageType> for PtpMessageClass {
    fn from(message_type: PtpMessageType) -> Self {
        match message_type {
            PtpMessageType::Sync => Self::Sync,
            PtpMessageType::PdelayReq => Self::PdelayReq,
            PtpMessageType::PdelayResp => Self::PdelayResp,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for PtpMessageClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Sync => "sync",
            Self::PdelayReq => "pdelay_req",
            Self::PdelayResp => "pdelay_resp",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

const ETHERTYPE_VLAN: u16 = 0x8100;
const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_IPV6: u16 = 0x86DD;
const ETHERTYPE_PTP: u16 = 0x88F7;

const IPPROTO_UDP: u8 = 17;
const PTP_EVENT_PORT: u16 = 319;
const PTP_GENERAL_PORT: u16 = 320;

const PTP_VERSION_2: u8 = 2;

fn be16(frame: &[u8], at: usize) -> Option<u16> {
    let bytes = frame.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Locate the PTP header inside an Ethernet frame and return its type.
///
/// Returns `None` for anything that is not PTP version 2.
#[must_use]
pub fn classify_ptp(frame: &[u8]) -> Option<PtpMessageType> {
    let mut offset = 12;
    let mut ethertype = be16(frame, offset)?;
    if ethertype == ETHERTYPE_VLAN {
        offset += 4;
        ethertype = be16(frame, offset)?;
    }
    offset += 2;

    let ptp_offset = match ethertype {
        ETHERTYPE_PTP => offset,
        ETHERTYPE_IPV4 => {
            let ip = frame.get(offset..)?;
            let ihl = usize::from(*ip.first()? & 0x0F) * 4;
            if ihl < 20 || *ip.get(9)? != IPPROTO_UDP {
                return None;
            }
            udp_payload(frame, offset + ihl)?
        }
        ETHERTYPE_IPV6 => {
            if *frame.get(offset + 6)? != IPPROTO_UDP {
                return None;
            }
            udp_payload(frame, offset + 40)?
        }
        _ => return None,
    };

    let header = frame.get(ptp_offset..ptp_offset + 2)?;
    if header[1] & 0x0F != PTP_VERSION_2 {
        return None;
    }
    PtpMessageType::from_nibble(header[0])
}

fn udp_payload(frame: &[u8], udp_offset: usize) -> Option<usize> {
    let dst_port = be16(frame, udp_offset + 2)?;
    if dst_port == PTP_EVENT_PORT || dst_port == PTP_GENERAL_PORT {
        Some(udp_offset + 8)
    } else {
        None
    }
}
