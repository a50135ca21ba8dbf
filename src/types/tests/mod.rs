use super::*;
use crate::protocol::tag::TagVariant;
use std::time::Duration;

// --- config.rs tests ---

#[test]
fn test_config_defaults() {
    let config = DeviceConfig::default();

    assert_eq!(config.variant, TagVariant::Extended);
    assert!(!config.hwts_enabled);
    assert_eq!(config.tx_timestamp_timeout, Duration::from_millis(100));
    assert_eq!(config.stale_clock_threshold, Duration::from_secs(2));
    assert_eq!(config.queue_capacity_hint, 16);
}

#[test]
fn test_config_builder() {
    let config = DeviceConfig::builder()
        .variant(TagVariant::ExtendedCascade)
        .hwts_enabled(true)
        .tx_timestamp_timeout(Duration::from_millis(250))
        .stale_clock_threshold(Duration::from_secs(1))
        .queue_capacity_hint(4)
        .build();

    assert_eq!(config.variant, TagVariant::ExtendedCascade);
    assert!(config.hwts_enabled);
    assert_eq!(config.tx_timestamp_timeout, Duration::from_millis(250));
    assert_eq!(config.stale_clock_threshold, Duration::from_secs(1));
    assert_eq!(config.queue_capacity_hint, 4);
}

#[test]
fn test_config_for_variant() {
    let config = DeviceConfig::for_variant(TagVariant::Basic9893);
    assert_eq!(config.variant, TagVariant::Basic9893);
    assert_eq!(config.tx_timestamp_timeout, Duration::from_millis(100));
}

#[test]
fn test_config_serde_roundtrip() {
    let config = DeviceConfig::builder()
        .variant(TagVariant::Basic9477)
        .hwts_enabled(true)
        .build();

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"ksz9477\""));
    let back: DeviceConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_config_deserialize_partial_uses_defaults() {
    let config: DeviceConfig = serde_json::from_str(r#"{"variant":"lan937x_cascade"}"#).unwrap();
    assert_eq!(config.variant, TagVariant::ExtendedCascade);
    assert_eq!(config.queue_capacity_hint, 16);
}

// --- port.rs tests ---

#[test]
fn test_port_address_display_and_order() {
    let a = PortAddress::new(3);
    let b = PortAddress::on_chip(1, 0);
    assert_eq!(a.to_string(), "0/3");
    assert_eq!(b.to_string(), "1/0");
    assert!(a < b);
}
