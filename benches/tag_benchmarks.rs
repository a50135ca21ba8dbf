use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ksz_tailtag::protocol::ptp::{PartialTimestamp, PtpTimestamp, ReferenceClock, reconstruct};
use ksz_tailtag::protocol::tag::{Frame, TagVariant, TxParams};
use ksz_tailtag::testing::{switch_rx_frame, test_frame};

fn encode_benchmark(c: &mut Criterion) {
    let template = test_frame(1486);
    let params = TxParams::new(3).priority(5).hwts_enabled(true);

    for variant in [TagVariant::Basic9477, TagVariant::ExtendedCascade] {
        c.bench_function(&format!("tag_encode_{variant}"), |b| {
            b.iter(|| {
                let frame = Frame::from_slice(template.as_bytes());
                variant.encode(black_box(frame), &params).unwrap()
            });
        });
    }

    let partial = test_frame(1486).with_partial_checksum(34, 6);
    c.bench_function("tag_encode_with_checksum", |b| {
        b.iter(|| {
            let frame = Frame::from_slice(partial.as_bytes()).with_partial_checksum(34, 6);
            TagVariant::Extended.encode(black_box(frame), &params).unwrap()
        });
    });
}

fn decode_benchmark(c: &mut Criterion) {
    let clock = ReferenceClock::new(PtpTimestamp::new(1_700_000_000, 0));
    let body = test_frame(1486);
    let tagged = switch_rx_frame(body.as_bytes(), 4, 1, Some(PartialTimestamp::new(3, 999)));

    c.bench_function("tag_decode_with_timestamp", |b| {
        b.iter(|| {
            let frame = Frame::from_slice(tagged.as_bytes());
            TagVariant::ExtendedCascade
                .decode(black_box(frame), Some(&clock))
                .unwrap()
        });
    });
}

fn reconstruct_benchmark(c: &mut Criterion) {
    let reference = PtpTimestamp::new(1_700_000_001, 500_000_000);
    let partial = PtpTimestamp::new(1_699_999_999, 750_000_000).truncate();

    c.bench_function("ptp_reconstruct", |b| {
        b.iter(|| reconstruct(black_box(partial), black_box(&reference)));
    });
}

criterion_group!(
    benches,
    encode_benchmark,
    decode_benchmark,
    reconstruct_benchmark
);
criterion_main!(benches);
