//! User-facing data types for the synthesizer drivers.

use crate::lmx2594::registers::{ChDiv, MashOrder};

/// LMX2594 RF output selector.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Output {
    /// RFOUTA.
    A,
    /// RFOUTB.
    B,
}

/// Signal routed to an LMX2594 output.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputSource {
    /// VCO fed straight through.
    Vco,
    /// VCO divided by the channel divider.
    ChannelDivider(ChDiv),
}

impl OutputSource {
    pub fn divider(self) -> u16 {
        match self {
            OutputSource::Vco => 1,
            OutputSource::ChannelDivider(div) => div.divider(),
        }
    }
}

/// LMX2594 register values realising one output frequency.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyPlan {
    pub vco_hz: f64,
    pub source: OutputSource,
    /// Integer feedback divider (PLL_N, 19 bits).
    pub n: u32,
    /// Fractional numerator (PLL_NUM).
    pub num: u32,
    /// Fractional denominator (PLL_DEN).
    pub den: u32,
    pub mash_order: MashOrder,
}

/// Si57x divider parameters for one output frequency.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dividers {
    /// High-speed divider (4, 5, 6, 7, 9 or 11).
    pub hs_div: u8,
    /// Output divider N1 (1 or an even value up to 128).
    pub n1: u8,
}

impl Dividers {
    pub fn product(self) -> u32 {
        self.hs_div as u32 * self.n1 as u32
    }
}

/// Si57x reference multiplier RFREQ as stored on the chip: 10 integer bits and
/// a 28-bit fraction.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rfreq {
    pub integer: u16,
    pub fraction: u32,
}

impl Rfreq {
    /// Fixed-point scale of the fraction.
    pub const FRACTION_SCALE: f64 = (1u32 << 28) as f64;
    /// Largest integer part (10 bits).
    pub const INTEGER_MAX: u16 = (1 << 10) - 1;

    /// Convert a ratio, truncating the fraction. `None` when the integer part
    /// does not fit or the ratio is negative.
    pub fn from_ratio(ratio: f64) -> Option<Self> {
        if !(ratio >= 0.0) || ratio >= (Self::INTEGER_MAX as f64 + 1.0) {
            return None;
        }
        let integer = ratio as u16;
        let fraction = ((ratio - integer as f64) * Self::FRACTION_SCALE) as u32;
        Some(Self { integer, fraction })
    }

    pub fn ratio(self) -> f64 {
        self.integer as f64 + self.fraction as f64 / Self::FRACTION_SCALE
    }
}
