//! Transport checksum finalization.
//!
//! Frames handed over with a partial checksum carry the pseudo-header sum in
//! the checksum field. The switch inserts the tag after the payload, so the
//! checksum must be completed in software before tagging.

use super::frame::{ChecksumState, Frame};
use crate::error::{Result, TailTagError};

/// Checksum value sent instead of zero, which means "no checksum" for UDP.
const CSUM_MANGLED_0: u16 = 0xFFFF;

/// One's-complement sum of `data` as big-endian 16-bit words.
fn ones_complement_sum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    let mut sum: u32 = chunks
        .by_ref()
        .map(|word| u32::from(u16::from_be_bytes([word[0], word[1]])))
        .fold(0, u32::wrapping_add);
    if let [last] = chunks.remainder() {
        sum = sum.wrapping_add(u32::from(*last) << 8);
    }
    sum
}

fn fold(mut sum: u32) -> u16 {
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    u16::try_from(sum).unwrap_or(u16::MAX)
}

/// Internet checksum (RFC 1071) over `data`.
#[must_use]
pub fn internet_checksum(data: &[u8]) -> u16 {
    !fold(ones_complement_sum(data))
}

/// Complete a partial checksum in place.
///
/// Frames without a pending checksum are left untouched.
pub fn finalize(frame: &mut Frame) -> Result<()> {
    let ChecksumState::Partial { start, offset } = frame.checksum_state() else {
        return Ok(());
    };

    let len = frame.len();
    let field = start
        .checked_add(offset)
        .filter(|field| field.checked_add(2).is_some_and(|end| end <= len) && start <= len)
        .ok_or(TailTagError::ChecksumFinalizationFailed { start, offset, len })?;

    let bytes = frame.as_bytes_mut();
    let csum = match internet_checksum(&bytes[start..]) {
        0 => CSUM_MANGLED_0,
        csum => csum,
    };
    bytes[field..field + 2].copy_from_slice(&csum.to_be_bytes());

    frame.set_checksum_state(ChecksumState::Complete);
    Ok(())
}
