use std::sync::Arc;

use crate::error::TailTagError;
use crate::protocol::ptp::{PartialTimestamp, PtpTimestamp};
use crate::protocol::tag::TagVariant;
use crate::switch::TagDevice;
use crate::testing::{RecordingReceiver, RecordingTransmitter, payload, switch_rx_frame};
use crate::types::{DeviceConfig, PortAddress};

fn new_device(variant: TagVariant) -> (Arc<TagDevice>, Arc<RecordingReceiver>) {
    let receiver = Arc::new(RecordingReceiver::new());
    let device = TagDevice::new(
        DeviceConfig::for_variant(variant),
        Arc::new(RecordingTransmitter::new()),
        receiver.clone(),
    );
    (device, receiver)
}

fn body() -> Vec<u8> {
    payload(60)
}

#[test]
fn test_attach_validates_port() {
    let (device, _) = new_device(TagVariant::Basic9893);

    assert!(device.attach(PortAddress::new(4)).is_ok());
    assert_eq!(
        device.attach(PortAddress::new(5)).unwrap_err(),
        TailTagError::InvalidPort { chip: 0, port: 5 }
    );
    assert_eq!(
        device.attach(PortAddress::on_chip(1, 0)).unwrap_err(),
        TailTagError::InvalidPort { chip: 1, port: 0 }
    );
}

#[test]
fn test_attach_twice_rejected() {
    let (device, _) = new_device(TagVariant::Basic8);

    let _first = device.attach(PortAddress::new(1)).unwrap();
    assert_eq!(
        device.attach(PortAddress::new(1)).unwrap_err(),
        TailTagError::PortAlreadyAttached { chip: 0, port: 1 }
    );
}

#[test]
fn test_drop_detaches() {
    let (device, _) = new_device(TagVariant::Basic9477);

    let attachment = device.attach(PortAddress::new(3)).unwrap();
    assert_eq!(device.attached_ports(), vec![PortAddress::new(3)]);
    drop(attachment);
    assert!(device.attached_ports().is_empty());

    // The address can be reused.
    let again = device.attach(PortAddress::new(3)).unwrap();
    assert_eq!(again.detach(), 0);
    assert!(!device.is_attached(PortAddress::new(3)));
}

#[test]
fn test_receive_delivers_to_attached_port() {
    let (device, receiver) = new_device(TagVariant::Basic9477);
    let _port = device.attach(PortAddress::new(2)).unwrap();

    device
        .receive(switch_rx_frame(&body(), 2, 0, None))
        .unwrap();

    let frames = receiver.frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].port, 2);
    assert_eq!(frames[0].device, 0);
    assert_eq!(frames[0].bytes, body());
    assert!(frames[0].offload_fwd_mark);
    assert_eq!(frames[0].hw_timestamp, None);
}

#[test]
fn test_receive_unknown_destination() {
    let (device, receiver) = new_device(TagVariant::Basic9477);
    let _port = device.attach(PortAddress::new(2)).unwrap();

    let err = device
        .receive(switch_rx_frame(&body(), 3, 0, None))
        .unwrap_err();
    assert_eq!(err, TailTagError::UnknownDestination { chip: 0, port: 3 });
    assert!(receiver.frames().is_empty());
}

#[tokio::test]
async fn test_receive_cascade_bit_on_single_chip() {
    let (device, receiver) = new_device(TagVariant::Extended);
    let _port = device.attach(PortAddress::new(1)).unwrap();

    let err = device
        .receive(switch_rx_frame(&body(), 1, 1, None))
        .unwrap_err();
    assert_eq!(err, TailTagError::UnknownDestination { chip: 1, port: 1 });
    assert!(receiver.frames().is_empty());
}

#[tokio::test]
async fn test_receive_cascade_second_chip() {
    let (device, receiver) = new_device(TagVariant::ExtendedCascade);
    let _port = device.attach(PortAddress::on_chip(1, 6)).unwrap();

    device
        .receive(switch_rx_frame(&body(), 6, 1, None))
        .unwrap();
    let frames = receiver.frames();
    assert_eq!((frames[0].device, frames[0].port), (1, 6));
}

#[tokio::test]
async fn test_receive_reconstructs_timestamp() {
    let (device, receiver) = new_device(TagVariant::Extended);
    let _port = device.attach(PortAddress::new(0)).unwrap();
    device.clock().update(PtpTimestamp::new(1_000, 500));

    // 1_000 is 0 mod 4; the event happened 0.25 s before the reference.
    let partial = PtpTimestamp::new(999, 750_000_000).truncate();
    device
        .receive(switch_rx_frame(&body(), 0, 0, Some(partial)))
        .unwrap();

    let frames = receiver.frames();
    assert_eq!(frames[0].bytes, body());
    assert_eq!(
        frames[0].hw_timestamp,
        Some(PtpTimestamp::new(999, 750_000_000))
    );
}

#[tokio::test]
async fn test_receive_short_frame_underflow() {
    let (device, receiver) = new_device(TagVariant::Extended);
    let _port = device.attach(PortAddress::new(0)).unwrap();

    let err = device
        .receive(switch_rx_frame(&[0; 10], 0, 0, Some(PartialTimestamp::new(0, 0))))
        .unwrap_err();
    assert_eq!(err, TailTagError::UnderflowTrim { len: 15, needed: 19 });
    assert!(receiver.frames().is_empty());
}

#[test]
fn test_underflow_checked_before_destination() {
    let (device, _) = new_device(TagVariant::Basic8);

    let err = device.receive(switch_rx_frame(&[0; 4], 5, 0, None)).unwrap_err();
    assert!(matches!(err, TailTagError::UnderflowTrim { .. }));
}

#[test]
fn test_hwts_toggle() {
    let (device, _) = new_device(TagVariant::Basic8);
    assert!(!device.hwts_enabled());
    device.set_hwts_enabled(true);
    assert!(device.hwts_enabled());
}

#[tokio::test]
async fn test_shutdown_without_queued_frames() {
    let (device, _) = new_device(TagVariant::Extended);
    assert_eq!(device.shutdown().await, 0);

    let (device, _) = new_device(TagVariant::Basic8);
    assert_eq!(device.shutdown().await, 0);
}

#[test]
fn test_needed_tailroom() {
    let (device, _) = new_device(TagVariant::Basic9477);
    assert_eq!(device.needed_tailroom(), 2);
}
