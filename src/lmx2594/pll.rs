//! Output frequency planning for the LMX2594.
//!
//! f_out = f_pd · (N + NUM/DEN) / CHDIV, with f_pd derived from the reference
//! path (OSC_2X, MULT, PLL_R_PRE, PLL_R) and the VCO kept inside its band.

use crate::data_types::{FrequencyPlan, OutputSource};
use crate::error::Error;
use crate::lmx2594::registers::{ChDiv, MashOrder};

/// VCO band.
pub const VCO_MIN_HZ: f64 = 7.5e9;
pub const VCO_MAX_HZ: f64 = 15.0e9;

/// Output range.
pub const OUT_MIN_HZ: f64 = 10.0e6;
pub const OUT_MAX_HZ: f64 = 15.0e9;

/// Fractional denominator used for every plan.
pub const FRAC_DEN: u32 = u32::MAX;

/// Largest PLL_N value (19-bit field).
pub const N_MAX: u32 = (1 << 19) - 1;

/// Phase detector frequency for the given reference path, or `None` when a
/// divider or the multiplier is zero.
pub fn phase_detector_hz(osc_hz: f64, doubler: bool, mult: u16, pll_r_pre: u16, pll_r: u16) -> Option<f64> {
    if mult == 0 || pll_r_pre == 0 || pll_r == 0 || !(osc_hz > 0.0) {
        return None;
    }
    let doubler = if doubler { 2.0 } else { 1.0 };
    Some(osc_hz * doubler * mult as f64 / (pll_r_pre as f64 * pll_r as f64))
}

/// Route a target frequency: straight from the VCO when it is in band, else
/// through the smallest channel divider that lands the VCO in band.
pub fn select_source(output_hz: f64) -> Option<(OutputSource, f64)> {
    if output_hz >= VCO_MIN_HZ && output_hz <= VCO_MAX_HZ {
        return Some((OutputSource::Vco, output_hz));
    }
    ChDiv::ALL.iter().find_map(|&div| {
        let vco_hz = output_hz * div.divider() as f64;
        (vco_hz >= VCO_MIN_HZ && vco_hz <= VCO_MAX_HZ).then_some((OutputSource::ChannelDivider(div), vco_hz))
    })
}

/// Compute the divider words for `output_hz` with phase detector `pfd_hz`.
///
/// The fractional numerator is truncated, so the programmed frequency is never
/// above the request.
pub fn plan<E>(output_hz: f64, pfd_hz: f64) -> Result<FrequencyPlan, Error<E>> {
    if !(output_hz >= OUT_MIN_HZ && output_hz <= OUT_MAX_HZ) {
        return Err(Error::OutOfRange);
    }
    if !(pfd_hz > 0.0) {
        return Err(Error::InvalidConfig);
    }
    let (source, vco_hz) = select_source(output_hz).ok_or(Error::UnsolvableDivider)?;

    let n_total = vco_hz / pfd_hz;
    if n_total > N_MAX as f64 {
        return Err(Error::UnsolvableDivider);
    }
    let n = n_total as u32;
    let num = ((n_total - n as f64) * FRAC_DEN as f64) as u32;
    let mash_order = if num == 0 { MashOrder::Integer } else { MashOrder::Third };
    if n < mash_order.min_n() {
        return Err(Error::UnsolvableDivider);
    }

    Ok(FrequencyPlan {
        vco_hz,
        source,
        n,
        num,
        den: FRAC_DEN,
        mash_order,
    })
}

/// Output frequency produced by the given divider words.
pub fn output_hz(pfd_hz: f64, n: u32, num: u32, den: u32, source: OutputSource) -> f64 {
    let frac = if den == 0 { 0.0 } else { num as f64 / den as f64 };
    pfd_hz * (n as f64 + frac) / source.divider() as f64
}
