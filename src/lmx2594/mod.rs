//! TI LMX2594 15 GHz wideband PLL synthesizer with integrated VCO.

mod driver;
pub mod pll;
pub mod registers;

pub use driver::{DEFAULT_ADDRESS, DEFAULT_REFERENCE_HZ, Lmx2594, OUTPUT_POWER_MAX, RESET_SETTLE_MS};
