//! Silicon Labs Si570/Si571 I2C programmable oscillator.

pub mod divider;
mod driver;
pub mod registers;

pub use driver::{DEFAULT_ADDRESS, DEFAULT_XTAL_HZ, Si57x};
