/// Address of a switch port reachable through the host interface.
///
/// `chip` is only non-zero behind a cascade of two switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PortAddress {
    /// Chip index
    pub chip: u8,
    /// Zero-based port on that chip
    pub port: u8,
}

impl PortAddress {
    /// Port on the first chip
    #[must_use]
    pub const fn new(port: u8) -> Self {
        Self { chip: 0, port }
    }

    /// Port on a specific chip
    #[must_use]
    pub const fn on_chip(chip: u8, port: u8) -> Self {
        Self { chip, port }
    }
}

impl std::fmt::Display for PortAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chip, self.port)
    }
}
