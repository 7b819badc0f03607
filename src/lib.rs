//! Register-level drivers for frequency synthesizers.
//!
//! * [`Lmx2594`]: TI LMX2594 wideband PLL, 113 × 16-bit registers over SPI.
//! * [`Si57x`]: Silicon Labs Si570/Si571 programmable oscillator over I2C.
//!
//! Drivers talk to hardware through [`RegisterBus`], implemented for
//! `embedded-hal` I2C and SPI devices and for a plain pair of closures
//! returning fault codes. Every operation returns `Result`; [`Raise`] turns a
//! result into a panic for callers that treat bus faults as fatal.

#![no_std]

mod fmt;

pub mod bus;
pub mod config;
pub mod data_types;
pub mod error;
pub mod lmx2594;
pub mod registers;
pub mod si57x;

pub use bus::{FnBus, I2cBus, RegisterBus, SpiBus};
pub use config::Config;
pub use data_types::{Dividers, FrequencyPlan, Output, OutputSource, Rfreq};
pub use error::{Error, Raise};
pub use lmx2594::Lmx2594;
pub use si57x::Si57x;
