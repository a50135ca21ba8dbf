//! PTP timestamp representation.
//!
//! Full timestamps carry 64-bit seconds and 32-bit nanoseconds. The switch
//! hardware only has room for 32 bits in the tail tag, so it sends a
//! truncated [`PartialTimestamp`]: the two low bits of the seconds counter in
//! bits 31-30 and the nanoseconds in bits 29-0.

use std::time::Duration;

/// Full-resolution PTP timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PtpTimestamp {
    /// Seconds since the PTP epoch.
    pub seconds: u64,
    /// Nanoseconds within the current second (`0..999_999_999`).
    pub nanoseconds: u32,
}

impl PtpTimestamp {
    /// Nanoseconds in one second.
    pub const NANOS_PER_SEC: u32 = 1_000_000_000;

    /// Zero timestamp.
    pub const ZERO: Self = Self {
        seconds: 0,
        nanoseconds: 0,
    };

    /// Create a new timestamp, clamping nanoseconds to valid range.
    #[must_use]
    pub fn new(seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds: nanoseconds.min(Self::NANOS_PER_SEC - 1),
        }
    }

    /// Convert to total nanoseconds since epoch.
    #[must_use]
    pub fn to_nanos(&self) -> i128 {
        i128::from(self.seconds) * i128::from(Self::NANOS_PER_SEC) + i128::from(self.nanoseconds)
    }

    /// Create from total nanoseconds since epoch.
    ///
    /// Returns `None` for negative values or when seconds overflow `u64`.
    #[must_use]
    pub fn from_nanos(nanos: i128) -> Option<Self> {
        if nanos < 0 {
            return None;
        }
        let per_sec = i128::from(Self::NANOS_PER_SEC);
        let seconds = u64::try_from(nanos / per_sec).ok()?;
        let nanoseconds = u32::try_from(nanos % per_sec).ok()?;
        Some(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Signed difference in nanoseconds: `self - other`.
    #[must_use]
    pub fn diff_nanos(&self, other: &Self) -> i128 {
        self.to_nanos() - other.to_nanos()
    }

    /// Signed difference in whole seconds, rounded towards negative
    /// infinity so the remaining nanoseconds are never negative.
    #[must_use]
    pub fn diff_seconds_floor(&self, other: &Self) -> i128 {
        self.diff_nanos(other)
            .div_euclid(i128::from(Self::NANOS_PER_SEC))
    }

    /// Shift by a signed number of whole seconds.
    ///
    /// Returns `None` if the result would precede the epoch or overflow.
    #[must_use]
    pub fn checked_add_seconds(&self, seconds: i64) -> Option<Self> {
        let shifted = self.seconds.checked_add_signed(seconds)?;
        Some(Self {
            seconds: shifted,
            nanoseconds: self.nanoseconds,
        })
    }

    /// The truncated form the switch would carry for this time.
    #[must_use]
    pub fn truncate(&self) -> PartialTimestamp {
        let low_bits = self.seconds & PartialTimestamp::SECONDS_MASK;
        PartialTimestamp::new(u8::try_from(low_bits).unwrap_or_default(), self.nanoseconds)
    }

    /// Convert to a `Duration` since the epoch.
    #[must_use]
    pub fn to_duration(&self) -> Duration {
        Duration::new(self.seconds, self.nanoseconds)
    }
}

impl std::fmt::Display for PtpTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

impl From<Duration> for PtpTimestamp {
    fn from(d: Duration) -> Self {
        Self {
            seconds: d.as_secs(),
            nanoseconds: d.subsec_nanos(),
        }
    }
}

impl From<PtpTimestamp> for Duration {
    fn from(ts: PtpTimestamp) -> Self {
        ts.to_duration()
    }
}

/// Truncated timestamp carried in the 4-byte tail-tag block.
///
/// Seconds are only known modulo [`PartialTimestamp::MODULUS`]; the full
/// value is recovered with [`reconstruct`](super::clock::reconstruct).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PartialTimestamp {
    /// Low two bits of the seconds counter.
    pub seconds: u8,
    /// Nanoseconds within the second.
    pub nanoseconds: u32,
}

impl PartialTimestamp {
    /// Seconds wrap period.
    pub const MODULUS: u64 = 4;

    /// Mask selecting the carried second bits.
    pub const SECONDS_MASK: u64 = Self::MODULUS - 1;

    /// `SECONDS_MASK` as a byte mask.
    const SECONDS_BITS: u8 = 0b11;

    /// Bit position of the seconds field in the raw word.
    const SECONDS_SHIFT: u32 = 30;

    /// Mask of the nanoseconds field in the raw word.
    const NANOS_MASK: u32 = (1 << Self::SECONDS_SHIFT) - 1;

    /// Create a partial timestamp, masking seconds to two bits and clamping
    /// nanoseconds.
    #[must_use]
    pub fn new(seconds: u8, nanoseconds: u32) -> Self {
        Self {
            seconds: seconds & Self::SECONDS_BITS,
            nanoseconds: nanoseconds.min(PtpTimestamp::NANOS_PER_SEC - 1),
        }
    }

    /// Decode the raw big-endian word read from the frame.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        let seconds = u8::try_from(raw >> Self::SECONDS_SHIFT).unwrap_or_default();
        Self::new(seconds, raw & Self::NANOS_MASK)
    }

    /// Encode to the raw word layout.
    #[must_use]
    pub fn to_raw(&self) -> u32 {
        (u32::from(self.seconds) << Self::SECONDS_SHIFT) | (self.nanoseconds & Self::NANOS_MASK)
    }
}

impl std::fmt::Display for PartialTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:09} (mod 4)", self.seconds, self.nanoseconds)
    }
}
