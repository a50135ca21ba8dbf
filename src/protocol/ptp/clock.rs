//! Reference clock and timestamp reconstruction.
//!
//! The PTP subsystem periodically publishes the switch's current time into a
//! [`ReferenceClock`]. Receive-path decoding takes a snapshot of that sample
//! and uses it to expand the truncated timestamps carried in tail tags.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use super::timestamp::{PartialTimestamp, PtpTimestamp};
use crate::error::TailTagError;

/// Largest whole-second distance between the reference and a reconstructed
/// timestamp before it is moved into the neighbouring window.
const MAX_SKEW_SECONDS: i128 = 2;

/// Expand a truncated timestamp using a reference sample.
///
/// The candidate shares the reference's 4-second window. The difference to
/// the reference is taken as whole seconds rounded towards negative infinity:
/// above two the candidate belongs to the previous window, below minus two to
/// the next one. Events from one second before up to (but excluding) two
/// seconds after the reference are recovered exactly.
#[must_use]
pub fn reconstruct(partial: PartialTimestamp, reference: &PtpTimestamp) -> PtpTimestamp {
    let candidate = PtpTimestamp {
        seconds: (reference.seconds & !PartialTimestamp::SECONDS_MASK) | u64::from(partial.seconds),
        nanoseconds: partial.nanoseconds,
    };

    let diff = candidate.diff_seconds_floor(reference);
    let seconds = if diff > MAX_SKEW_SECONDS {
        candidate.seconds.checked_sub(PartialTimestamp::MODULUS)
    } else if diff < -MAX_SKEW_SECONDS {
        candidate.seconds.checked_add(PartialTimestamp::MODULUS)
    } else {
        Some(candidate.seconds)
    };

    // Only fails when the reference sits in the first window after the epoch.
    PtpTimestamp {
        seconds: seconds.unwrap_or(candidate.seconds),
        ..candidate
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    time: PtpTimestamp,
    updated_at: Option<Instant>,
}

/// Latest switch time published by the PTP subsystem.
///
/// One writer updates the sample; readers take a copy under a short read
/// lock so a concurrent update can never be observed half-written.
#[derive(Debug)]
pub struct ReferenceClock {
    sample: RwLock<Sample>,
}

/// Reference clock shared between a device and its PTP collaborator.
pub type SharedReferenceClock = Arc<ReferenceClock>;

impl Default for ReferenceClock {
    fn default() -> Self {
        Self::new(PtpTimestamp::ZERO)
    }
}

impl ReferenceClock {
    /// Create a clock holding an initial sample that counts as never updated.
    #[must_use]
    pub fn new(initial: PtpTimestamp) -> Self {
        Self {
            sample: RwLock::new(Sample {
                time: initial,
                updated_at: None,
            }),
        }
    }

    /// Create a shared clock.
    #[must_use]
    pub fn shared() -> SharedReferenceClock {
        Arc::new(Self::default())
    }

    /// Publish a new sample.
    pub fn update(&self, time: PtpTimestamp) {
        let mut sample = self.sample.write().unwrap_or_else(PoisonError::into_inner);
        *sample = Sample {
            time,
            updated_at: Some(Instant::now()),
        };
    }

    /// Copy of the current sample.
    #[must_use]
    pub fn snapshot(&self) -> PtpTimestamp {
        self.read().time
    }

    /// Time since the last [`update`](Self::update), if any.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        self.read().updated_at.map(|at| at.elapsed())
    }

    /// Check that the sample was refreshed within `threshold`.
    ///
    /// A clock that was never updated passes; there is no better sample to
    /// fall back to.
    pub fn check_fresh(&self, threshold: Duration) -> Result<(), TailTagError> {
        match self.age() {
            Some(age) if age > threshold => Err(TailTagError::StaleClockSnapshot { age }),
            _ => Ok(()),
        }
    }

    /// Expand a truncated timestamp against the current sample.
    #[must_use]
    pub fn reconstruct(&self, partial: PartialTimestamp) -> PtpTimestamp {
        let reference = self.snapshot();
        reconstruct(partial, &reference)
    }

    fn read(&self) -> Sample {
        *self.sample.read().unwrap_or_else(PoisonError::into_inner)
    }
}
