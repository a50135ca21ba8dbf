use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::tag::TagVariant;

/// Configuration of one tagging device (one host interface facing a switch)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Tag format spoken by the switch (default: `lan937x`)
    pub variant: TagVariant,

    /// Append the transmit timestamp placeholder (default: false)
    pub hwts_enabled: bool,

    /// How long a deferred frame waits for its clone's timestamp (default:
    /// 100ms)
    ///
    /// Expiry counts as a discard of the clone: the frame is sent without a
    /// hardware timestamp and a later `TxTimestampHandle::complete` returns
    /// `false`.
    pub tx_timestamp_timeout: Duration,

    /// Age after which the reference clock is reported as stale
    /// (default: 2 seconds)
    pub stale_clock_threshold: Duration,

    /// Initial capacity of each deferred queue (default: 16)
    pub queue_capacity_hint: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            variant: TagVariant::Extended,
            hwts_enabled: false,
            tx_timestamp_timeout: Duration::from_millis(100),
            stale_clock_threshold: Duration::from_secs(2),
            queue_capacity_hint: 16,
        }
    }
}

impl DeviceConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> DeviceConfigBuilder {
        DeviceConfigBuilder::default()
    }

    /// Default config for a tag format
    #[must_use]
    pub fn for_variant(variant: TagVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }
}

/// Builder for `DeviceConfig`
#[derive(Debug, Clone, Default)]
pub struct DeviceConfigBuilder {
    config: DeviceConfig,
}

impl DeviceConfigBuilder {
    /// Set tag format
    #[must_use]
    pub fn variant(mut self, variant: TagVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Enable hardware timestamping
    #[must_use]
    pub fn hwts_enabled(mut self, enable: bool) -> Self {
        self.config.hwts_enabled = enable;
        self
    }

    /// Set clone timestamp timeout
    #[must_use]
    pub fn tx_timestamp_timeout(mut self, timeout: Duration) -> Self {
        self.config.tx_timestamp_timeout = timeout;
        self
    }

    /// Set stale clock threshold
    #[must_use]
    pub fn stale_clock_threshold(mut self, threshold: Duration) -> Self {
        self.config.stale_clock_threshold = threshold;
        self
    }

    /// Set initial queue capacity
    #[must_use]
    pub fn queue_capacity_hint(mut self, capacity: usize) -> Self {
        self.config.queue_capacity_hint = capacity;
        self
    }

    /// Build the config
    #[must_use]
    pub fn build(self) -> DeviceConfig {
        self.config
    }
}
