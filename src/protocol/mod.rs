//! Protocol module

pub mod ptp;
pub mod tag;
