//! Per-instance driver configuration.

/// Options recognised by every driver constructor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Device address passed to every bus transaction.
    pub address: u8,
    /// Emit per-transaction trace lines (requires the `defmt` feature).
    pub diagnostic_log: bool,
}

impl Config {
    pub const fn new(address: u8) -> Self {
        Self {
            address,
            diagnostic_log: false,
        }
    }

    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub const fn with_diagnostic_log(mut self, enabled: bool) -> Self {
        self.diagnostic_log = enabled;
        self
    }
}
