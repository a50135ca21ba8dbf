use crate::error::TailTagError;
use crate::protocol::tag::checksum::{finalize, internet_checksum};
use crate::protocol::tag::frame::{ChecksumState, Frame};

#[test]
fn test_internet_checksum_rfc1071_example() {
    // RFC 1071 section 3: sum 0xDDF2, checksum is its complement.
    let data = [0x00, 0x01, 0xF2, 0x03, 0xF4, 0xF5, 0xF6, 0xF7];
    assert_eq!(internet_checksum(&data), !0xDDF2);
}

#[test]
fn test_internet_checksum_odd_length() {
    assert_eq!(internet_checksum(&[0x12]), !0x1200);
    assert_eq!(internet_checksum(&[]), 0xFFFF);
}

#[test]
fn test_internet_checksum_folds_carries() {
    // 0xFFFF + 0x0001 carries into bit 16 and folds back to 0x0001.
    assert_eq!(internet_checksum(&[0xFF, 0xFF, 0x00, 0x01]), !0x0001);
    assert_eq!(internet_checksum(&[0xFF; 64]), 0x0000);
}

#[test]
fn test_finalize_complete_is_noop() {
    let mut frame = Frame::from_slice(&[1, 2, 3, 4]);
    finalize(&mut frame).unwrap();
    assert_eq!(frame.as_bytes(), &[1, 2, 3, 4]);
}

#[test]
fn test_finalize_writes_checksum() {
    // 4-byte header, then a "transport" segment whose checksum field sits
    // at offset 2 and is seeded with zero.
    let mut frame =
        Frame::from_slice(&[0xEE, 0xEE, 0xEE, 0xEE, 0x12, 0x34, 0x00, 0x00, 0x56, 0x78])
            .with_partial_checksum(4, 2);
    finalize(&mut frame).unwrap();

    let bytes = frame.as_bytes();
    let expected = !(0x1234u16 + 0x5678);
    assert_eq!(&bytes[6..8], &expected.to_be_bytes());
    assert_eq!(frame.checksum_state(), ChecksumState::Complete);
    // Summing the finished segment yields zero.
    assert_eq!(internet_checksum(&bytes[4..]), 0);
}

#[test]
fn test_finalize_zero_result_is_mangled() {
    // Sums to 0xFFFF, which complements to zero.
    let mut frame = Frame::from_slice(&[0xFF, 0xFF, 0x00, 0x00]).with_partial_checksum(0, 2);
    finalize(&mut frame).unwrap();
    assert_eq!(&frame.as_bytes()[2..4], &[0xFF, 0xFF]);
}

#[test]
fn test_finalize_out_of_range() {
    let mut frame = Frame::from_slice(&[0; 8]).with_partial_checksum(4, 3);
    assert_eq!(
        finalize(&mut frame).unwrap_err(),
        TailTagError::ChecksumFinalizationFailed {
            start: 4,
            offset: 3,
            len: 8
        }
    );

    let mut frame = Frame::from_slice(&[0; 8]).with_partial_checksum(usize::MAX, 1);
    assert!(matches!(
        finalize(&mut frame),
        Err(TailTagError::ChecksumFinalizationFailed { .. })
    ));
}
