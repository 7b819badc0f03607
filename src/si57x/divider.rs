//! Si57x frequency arithmetic.
//!
//! f_out = f_xtal · RFREQ / (HS_DIV · N1), with the DCO (f_out · HS_DIV · N1)
//! kept between 4.85 and 5.67 GHz.

use crate::data_types::{Dividers, Rfreq};
use crate::error::Error;
use crate::si57x::registers::FrequencyBlock;

pub const DCO_MIN_HZ: f64 = 4.85e9;
pub const DCO_MAX_HZ: f64 = 5.67e9;
/// Lowest supported output; smaller requests are raised to it.
pub const OUT_MIN_HZ: f64 = 10.0e6;
pub const HS_DIVS: [u8; 6] = [4, 5, 6, 7, 9, 11];
pub const N1_MAX: u8 = 128;

fn dco_in_band(dco_hz: f64) -> bool {
    (DCO_MIN_HZ..=DCO_MAX_HZ).contains(&dco_hz)
}

/// Pick HS_DIV and N1 for `hz`. NaN has no dividers.
///
/// Above 1212.5 MHz the only option is 4 × 1, above 970 MHz it is 5 × 1.
/// Below that every even N1 is tried against every HS_DIV and the pair whose
/// DCO is highest without leaving the band wins; on a tie the first pair found
/// (smallest N1, then smallest HS_DIV) is kept.
pub fn find_dividers(hz: f64) -> Option<Dividers> {
    if hz.is_nan() {
        return None;
    }
    let hz = hz.max(OUT_MIN_HZ);
    let fixed = if hz >= 1212.5e6 {
        Some(Dividers { hs_div: 4, n1: 1 })
    } else if hz >= 970.0e6 {
        Some(Dividers { hs_div: 5, n1: 1 })
    } else {
        None
    };
    if let Some(dividers) = fixed {
        return dco_in_band(hz * dividers.product() as f64).then_some(dividers);
    }

    let mut best: Option<(Dividers, f64)> = None;
    for n1 in (2..=N1_MAX).step_by(2) {
        for &hs_div in HS_DIVS.iter() {
            let candidate = Dividers { hs_div, n1 };
            let dco_hz = hz * candidate.product() as f64;
            if !dco_in_band(dco_hz) {
                continue;
            }
            if best.is_none_or(|(_, best_hz)| dco_hz > best_hz) {
                best = Some((candidate, dco_hz));
            }
        }
    }
    best.map(|(dividers, _)| dividers)
}

/// Register block producing `hz` from a crystal at `xtal_hz`.
pub fn encode_frequency<E>(hz: f64, xtal_hz: f64) -> Result<FrequencyBlock, Error<E>> {
    if hz.is_nan() {
        return Err(Error::OutOfRange);
    }
    if !(xtal_hz > 0.0) {
        return Err(Error::InvalidConfig);
    }
    let hz = hz.max(OUT_MIN_HZ);
    let dividers = find_dividers(hz).ok_or(Error::UnsolvableDivider)?;
    let rfreq = Rfreq::from_ratio(hz * dividers.product() as f64 / xtal_hz).ok_or(Error::OutOfRange)?;
    Ok(FrequencyBlock::new(dividers.hs_div - 4, dividers.n1 - 1, rfreq))
}

/// Output frequency described by `block` with a crystal at `xtal_hz`.
pub fn decode_frequency(block: &FrequencyBlock, xtal_hz: f64) -> f64 {
    xtal_hz / (block.hs_div() as f64 * block.n1() as f64) * block.rfreq().ratio()
}

/// Crystal frequency implied by a measured output and the programmed block.
/// `None` when RFREQ is zero.
pub fn xtal_from_measurement(measured_hz: f64, block: &FrequencyBlock) -> Option<f64> {
    let rfreq = block.rfreq().ratio();
    if rfreq == 0.0 {
        return None;
    }
    Some(measured_hz / rfreq * block.hs_div() as f64 * block.n1() as f64)
}
