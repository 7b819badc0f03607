//! Si57x register map.
//!
//! The output frequency lives in six byte registers starting at 7. Parts with
//! the 7 ppm option read the same block from 13, so writes go to both copies.

use crate::data_types::Rfreq;
use crate::registers::{Field, SplitField};

/// First frequency register.
pub const FREQ_START: u8 = 7;
/// Start of the mirrored frequency block.
pub const FREQ_MIRROR_START: u8 = 13;
/// Bytes in one frequency block.
pub const FREQ_BLOCK_LEN: usize = 6;
/// Registers written by a frequency change (both blocks).
pub const FREQ_REGISTERS: usize = 2 * FREQ_BLOCK_LEN;

pub mod addr {
    /// High-speed divider and N1 high bits.
    pub const HS_N1: u8 = 7;
    /// N1 low bits and RFREQ[37:32].
    pub const N1_RFREQ: u8 = 8;
    pub const RESET_FREEZE_MEMCTRL: u8 = 135;
    pub const FREEZE_DCO: u8 = 137;
}

pub mod field {
    use crate::registers::Field;

    pub const HS_DIV: Field = Field::new(7, 5, 3);
    pub const N1_6_2: Field = Field::new(7, 0, 5);
    pub const N1_1_0: Field = Field::new(8, 6, 2);
    pub const RFREQ_9_4: Field = Field::new(8, 0, 6);
    pub const RFREQ_3_0: Field = Field::new(9, 4, 4);
    pub const RFREQ_FRAC_27_24: Field = Field::new(9, 0, 4);
    pub const RFREQ_FRAC_23_16: Field = Field::new(10, 0, 8);
    pub const RFREQ_FRAC_15_8: Field = Field::new(11, 0, 8);
    pub const RFREQ_FRAC_7_0: Field = Field::new(12, 0, 8);
}

pub const N1: SplitField = SplitField::new(field::N1_6_2, field::N1_1_0);
pub const RFREQ_INTEGER: SplitField = SplitField::new(field::RFREQ_9_4, field::RFREQ_3_0);

const RFREQ_FRACTION: [Field; 4] = [
    field::RFREQ_FRAC_27_24,
    field::RFREQ_FRAC_23_16,
    field::RFREQ_FRAC_15_8,
    field::RFREQ_FRAC_7_0,
];

bitflags::bitflags! {
    /// Register 135 command bits. Every bit self-clears once the action completes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Control: u8 {
        /// Reset all registers to their NVM values.
        const RST_REG  = 1 << 7;
        /// Latch the new frequency registers.
        const NEW_FREQ = 1 << 6;
        /// Hold the M control word.
        const FREEZE_M = 1 << 5;
        /// Freeze the voltage-controlled oscillator.
        const FREEZE_VCADC = 1 << 4;
        /// Reload the frequency block from NVM.
        const RECALL   = 1 << 0;
    }

    /// Register 137 bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DcoControl: u8 {
        /// Hold the DCO while the frequency block is rewritten.
        const FREEZE_DCO = 1 << 4;
    }
}

/// Contents of registers 7..=12.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FrequencyBlock(pub [u8; FREQ_BLOCK_LEN]);

impl FrequencyBlock {
    /// Pack register codes: `hs_div_code = HS_DIV - 4`, `n1_code = N1 - 1`.
    pub fn new(hs_div_code: u8, n1_code: u8, rfreq: Rfreq) -> Self {
        let mut block = Self::default();
        block.set(field::HS_DIV, hs_div_code as u16);
        block.set_split(N1, n1_code as u32);
        block.set_split(RFREQ_INTEGER, rfreq.integer as u32);
        for (idx, f) in RFREQ_FRACTION.iter().enumerate() {
            let shift = 8 * (3 - idx as u32);
            block.set(*f, (rfreq.fraction >> shift) as u16);
        }
        block
    }

    pub fn hs_div_code(&self) -> u8 {
        self.get(field::HS_DIV) as u8
    }

    pub fn n1_code(&self) -> u8 {
        N1.join(self.get(N1.high), self.get(N1.low)) as u8
    }

    pub fn rfreq(&self) -> Rfreq {
        let integer = RFREQ_INTEGER.join(self.get(RFREQ_INTEGER.high), self.get(RFREQ_INTEGER.low)) as u16;
        let fraction = RFREQ_FRACTION
            .iter()
            .fold(0u32, |acc, f| (acc << f.width) | self.get(*f) as u32);
        Rfreq { integer, fraction }
    }

    /// HS_DIV value: `code + 4`.
    pub fn hs_div(&self) -> u8 {
        self.hs_div_code() + 4
    }

    /// N1 value. Code 0 means divide by one; other codes round down to even.
    pub fn n1(&self) -> u8 {
        match self.n1_code() {
            0 => 1,
            code => (code + 1) & !1,
        }
    }

    fn index(field: Field) -> usize {
        (field.register - FREQ_START) as usize
    }

    fn get(&self, field: Field) -> u16 {
        field.extract(self.0[Self::index(field)] as u16)
    }

    fn set(&mut self, field: Field, value: u16) {
        let idx = Self::index(field);
        self.0[idx] = field.insert(self.0[idx] as u16, value) as u8;
    }

    fn set_split(&mut self, split: SplitField, value: u32) {
        let (high, low) = split.split(value);
        self.set(split.high, high);
        self.set(split.low, low);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_datasheet_layout() {
        // HS_DIV = 7, N1 = 8, RFREQ = 0x2BC011EB8 / 2^28
        let rfreq = Rfreq {
            integer: 0x02B,
            fraction: 0xC011EB8,
        };
        let block = FrequencyBlock::new(3, 7, rfreq);
        assert_eq!(block.0, [0x61, 0xC2, 0xBC, 0x01, 0x1E, 0xB8]);
        assert_eq!(block.hs_div(), 7);
        assert_eq!(block.n1(), 8);
        assert_eq!(block.rfreq(), rfreq);
    }

    #[test]
    fn n1_code_zero_is_divide_by_one() {
        let block = FrequencyBlock::new(0, 0, Rfreq::default());
        assert_eq!(block.n1(), 1);
        assert_eq!(block.hs_div(), 4);
    }
}
