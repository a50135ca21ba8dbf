use crate::protocol::ptp::timestamp::{PartialTimestamp, PtpTimestamp};
use std::time::Duration;

// ===== Construction =====

#[test]
fn test_new_clamps_nanoseconds() {
    let ts = PtpTimestamp::new(10, 2_000_000_000);
    assert_eq!(ts.seconds, 10);
    assert_eq!(ts.nanoseconds, PtpTimestamp::NANOS_PER_SEC - 1);
}

#[test]
fn test_zero_constant() {
    assert_eq!(PtpTimestamp::ZERO.seconds, 0);
    assert_eq!(PtpTimestamp::ZERO.nanoseconds, 0);
}

// ===== Nanosecond conversions =====

#[test]
fn test_to_nanos_combined() {
    let ts = PtpTimestamp::new(3, 250_000_000);
    assert_eq!(ts.to_nanos(), 3_250_000_000);
}

#[test]
fn test_from_nanos_roundtrip() {
    let original = PtpTimestamp::new(1234, 567_890_123);
    assert_eq!(PtpTimestamp::from_nanos(original.to_nanos()), Some(original));
}

#[test]
fn test_from_nanos_negative_is_none() {
    assert_eq!(PtpTimestamp::from_nanos(-1), None);
}

// ===== Differences =====

#[test]
fn test_diff_nanos_signed() {
    let a = PtpTimestamp::new(9, 900_000_000);
    let b = PtpTimestamp::new(12, 0);
    assert_eq!(a.diff_nanos(&b), -2_100_000_000);
    assert_eq!(b.diff_nanos(&a), 2_100_000_000);
}

#[test]
fn test_diff_seconds_floor_rounds_down() {
    let reference = PtpTimestamp::new(10, 500_000_000);
    assert_eq!(PtpTimestamp::new(12, 0).diff_seconds_floor(&reference), 1);
    assert_eq!(PtpTimestamp::new(8, 0).diff_seconds_floor(&reference), -3);
    assert_eq!(PtpTimestamp::new(10, 500_000_000).diff_seconds_floor(&reference), 0);
    assert_eq!(PtpTimestamp::new(10, 499_999_999).diff_seconds_floor(&reference), -1);
}

#[test]
fn test_checked_add_seconds() {
    let ts = PtpTimestamp::new(10, 7);
    assert_eq!(ts.checked_add_seconds(4), Some(PtpTimestamp::new(14, 7)));
    assert_eq!(ts.checked_add_seconds(-4), Some(PtpTimestamp::new(6, 7)));
    assert_eq!(ts.checked_add_seconds(-11), None);
}

// ===== Duration / Display =====

#[test]
fn test_duration_conversion() {
    let ts: PtpTimestamp = Duration::new(5, 42).into();
    assert_eq!(ts, PtpTimestamp::new(5, 42));
    let back: Duration = ts.into();
    assert_eq!(back, Duration::new(5, 42));
}

#[test]
fn test_display() {
    assert_eq!(PtpTimestamp::new(12, 5).to_string(), "12.000000005");
}

// ===== Partial timestamps =====

#[test]
fn test_partial_from_raw() {
    // seconds = 0b10, nanoseconds = 123_456_789
    let raw = (2u32 << 30) | 123_456_789;
    let partial = PartialTimestamp::from_raw(raw);
    assert_eq!(partial.seconds, 2);
    assert_eq!(partial.nanoseconds, 123_456_789);
    assert_eq!(partial.to_raw(), raw);
}

#[test]
fn test_partial_from_raw_clamps_out_of_range_nanos() {
    // 30-bit field can hold up to 1_073_741_823 which is not a valid nanosecond count
    let partial = PartialTimestamp::from_raw(0x3FFF_FFFF);
    assert_eq!(partial.seconds, 0);
    assert_eq!(partial.nanoseconds, PtpTimestamp::NANOS_PER_SEC - 1);
}

#[test]
fn test_partial_new_masks_seconds() {
    let partial = PartialTimestamp::new(7, 0);
    assert_eq!(partial.seconds, 3);
}

#[test]
fn test_truncate_keeps_low_second_bits() {
    let ts = PtpTimestamp::new(1_700_000_001, 999);
    let partial = ts.truncate();
    assert_eq!(partial.seconds, 1);
    assert_eq!(partial.nanoseconds, 999);
}
