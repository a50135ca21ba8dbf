use proptest::prelude::*;

use crate::protocol::ptp::{PtpTimestamp, ReferenceClock};
use crate::protocol::tag::codec::TxParams;
use crate::protocol::tag::frame::Frame;
use crate::protocol::tag::variant::TagVariant;
use crate::testing::{switch_loopback, test_frame};

fn variant() -> impl Strategy<Value = TagVariant> {
    prop::sample::select(TagVariant::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_decode_any_bytes(
        variant in variant(),
        bytes in proptest::collection::vec(any::<u8>(), 0..80),
    ) {
        // Should not panic, return either Ok or Err
        let clock = ReferenceClock::new(PtpTimestamp::new(100, 0));
        let _ = variant.decode(Frame::from_slice(&bytes), Some(&clock));
    }

    #[test]
    fn test_tag_roundtrip_through_switch(
        variant in variant(),
        chip in 0u8..2,
        port in 0u8..8,
        priority in 0u8..8,
        link_local in any::<bool>(),
        hwts in any::<bool>(),
        payload_len in 0usize..64,
    ) {
        prop_assume!(variant.is_valid_port(chip, port));

        let original = test_frame(payload_len);
        let params = TxParams::new(port)
            .chip(chip)
            .priority(priority)
            .link_local(link_local)
            .hwts_enabled(hwts);
        let tagged = variant
            .encode(Frame::from_slice(original.as_bytes()), &params)
            .expect("encode failed");

        let placeholder = if hwts && variant.supports_two_step() { 4 } else { 0 };
        prop_assert_eq!(tagged.len(), original.len() + placeholder + variant.tx_len());

        let rx = switch_loopback(variant, &tagged, hwts, None).expect("single port");
        let decoded = variant.decode(rx, None).expect("decode failed");
        prop_assert_eq!(decoded.port, port);
        prop_assert_eq!(decoded.device, chip);
        prop_assert_eq!(decoded.frame.as_bytes(), original.as_bytes());
    }

    #[test]
    fn test_timestamp_roundtrip_through_switch(
        ref_seconds in 4u64..1_000_000_000,
        ref_nanos in 0u32..1_000_000_000,
        delta_nanos in -1_000_000_000i64..2_000_000_000,
        port in 0u8..8,
    ) {
        let reference = PtpTimestamp::new(ref_seconds, ref_nanos);
        let event = PtpTimestamp::from_nanos(reference.to_nanos() + i128::from(delta_nanos))
            .expect("event after epoch");
        let clock = ReferenceClock::new(reference);

        let tagged = TagVariant::Extended
            .encode(test_frame(46), &TxParams::new(port))
            .expect("encode failed");
        let rx = switch_loopback(TagVariant::Extended, &tagged, false, Some(event.truncate()))
            .expect("single port");
        let decoded = TagVariant::Extended.decode(rx, Some(&clock)).expect("decode failed");

        prop_assert_eq!(decoded.frame.hw_timestamp(), Some(event));
        prop_assert_eq!(decoded.frame.len(), 60);
    }
}
