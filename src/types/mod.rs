//! Core types module

mod config;
mod port;

#[cfg(test)]
mod tests;

pub use config::{DeviceConfig, DeviceConfigBuilder};
pub use port::PortAddress;
