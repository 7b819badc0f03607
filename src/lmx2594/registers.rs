//! LMX2594 register map (SNAS696C, revised April 2019).
//!
//! 113 registers of 16 bits. Field positions and reset values follow the
//! datasheet register tables; bits not named here are reserved and must be
//! written with the values from [`DEFAULTS`].

use crate::registers::{RegisterRange, SplitField, field_values};

/// Number of registers in the bank (R0..=R112).
pub const REGISTER_COUNT: usize = 113;

/// General configuration registers.
pub const RANGE_COMMON: RegisterRange = RegisterRange::new(0, 78);
/// Frequency ramping configuration.
pub const RANGE_RAMPING: RegisterRange = RegisterRange::new(79, 106);
/// Status registers filled in by the device; never part of a bank write.
pub const RANGE_READBACK: RegisterRange = RegisterRange::new(107, 112);

/// Register addresses touched directly by the driver.
pub mod addr {
    /// Reset, power-down, calibration trigger.
    pub const R0: u8 = 0;
    /// CHDIV buffer enable (SEG1_EN).
    pub const R31: u8 = 31;
    /// PLL_N[18:16].
    pub const R34: u8 = 34;
    /// PLL_N[15:0].
    pub const R36: u8 = 36;
    pub const R38: u8 = 38;
    pub const R39: u8 = 39;
    pub const R42: u8 = 42;
    pub const R43: u8 = 43;
    /// MASH order, output power-down, OUTA power.
    pub const R44: u8 = 44;
    /// OUTB power, OUTA mux.
    pub const R45: u8 = 45;
    /// OUTB mux.
    pub const R46: u8 = 46;
    /// Channel divider.
    pub const R75: u8 = 75;
}

/// Named fields, `Field::new(register, shift, width)`.
pub mod field {
    use crate::registers::Field;

    pub const POWERDOWN: Field = Field::new(0, 0, 1);
    pub const RESET: Field = Field::new(0, 1, 1);
    pub const MUXOUT_LD_SEL: Field = Field::new(0, 2, 1);
    pub const FCAL_EN: Field = Field::new(0, 3, 1);
    pub const FCAL_LPFD_ADJ: Field = Field::new(0, 5, 2);
    pub const FCAL_HPFD_ADJ: Field = Field::new(0, 7, 2);
    pub const OUT_MUTE: Field = Field::new(0, 9, 1);
    pub const VCO_PHASE_SYNC: Field = Field::new(0, 14, 1);
    pub const RAMP_EN: Field = Field::new(0, 15, 1);

    pub const CAL_CLK_DIV: Field = Field::new(1, 0, 3);
    pub const OUT_FORCE: Field = Field::new(7, 14, 1);
    pub const VCO_CAPCTRL_FORCE: Field = Field::new(8, 11, 1);
    pub const VCO_DACISET_FORCE: Field = Field::new(8, 14, 1);
    pub const OSC_2X: Field = Field::new(9, 12, 1);
    pub const MULT: Field = Field::new(10, 7, 5);
    pub const PLL_R: Field = Field::new(11, 4, 8);
    pub const PLL_R_PRE: Field = Field::new(12, 0, 12);
    pub const CPG: Field = Field::new(14, 4, 3);
    pub const VCO_DACISET: Field = Field::new(16, 0, 9);
    pub const VCO_DACISET_STRT: Field = Field::new(17, 0, 9);
    pub const VCO_CAPCTRL: Field = Field::new(19, 0, 8);
    pub const VCO_SEL_FORCE: Field = Field::new(20, 10, 1);
    pub const VCO_SEL: Field = Field::new(20, 11, 3);
    pub const SEG1_EN: Field = Field::new(31, 14, 1);

    pub const PLL_N_18_16: Field = Field::new(34, 0, 3);
    pub const PLL_N_15_0: Field = Field::new(36, 0, 16);
    pub const PFD_DLY_SEL: Field = Field::new(37, 8, 6);
    pub const MASH_SEED_EN: Field = Field::new(37, 15, 1);
    pub const PLL_DEN_31_16: Field = Field::new(38, 0, 16);
    pub const PLL_DEN_15_0: Field = Field::new(39, 0, 16);
    pub const MASH_SEED_31_16: Field = Field::new(40, 0, 16);
    pub const MASH_SEED_15_0: Field = Field::new(41, 0, 16);
    pub const PLL_NUM_31_16: Field = Field::new(42, 0, 16);
    pub const PLL_NUM_15_0: Field = Field::new(43, 0, 16);

    pub const MASH_ORDER: Field = Field::new(44, 0, 3);
    pub const MASH_RESET_N: Field = Field::new(44, 5, 1);
    pub const OUTA_PD: Field = Field::new(44, 6, 1);
    pub const OUTB_PD: Field = Field::new(44, 7, 1);
    pub const OUTA_PWR: Field = Field::new(44, 8, 6);
    pub const OUTB_PWR: Field = Field::new(45, 0, 6);
    pub const OUT_ISET: Field = Field::new(45, 9, 2);
    pub const OUTA_MUX: Field = Field::new(45, 11, 2);
    pub const OUTB_MUX: Field = Field::new(46, 0, 2);

    pub const INPIN_FMT: Field = Field::new(58, 9, 3);
    pub const INPIN_LVL: Field = Field::new(58, 12, 2);
    pub const INPIN_HYST: Field = Field::new(58, 14, 1);
    pub const INPIN_IGNORE: Field = Field::new(58, 15, 1);
    pub const LD_TYPE: Field = Field::new(59, 0, 1);
    pub const LD_DLY: Field = Field::new(60, 0, 16);
    pub const MASH_RST_COUNT_31_16: Field = Field::new(69, 0, 16);
    pub const MASH_RST_COUNT_15_0: Field = Field::new(70, 0, 16);

    pub const SYSREF_REPEAT: Field = Field::new(71, 2, 1);
    pub const SYSREF_EN: Field = Field::new(71, 3, 1);
    pub const SYSREF_PULSE: Field = Field::new(71, 4, 1);
    pub const SYSREF_DIV_PRE: Field = Field::new(71, 5, 3);
    pub const SYSREF_DIV: Field = Field::new(72, 0, 11);
    pub const JESD_DAC1_CTRL: Field = Field::new(73, 0, 6);
    pub const JESD_DAC2_CTRL: Field = Field::new(73, 6, 6);
    pub const JESD_DAC3_CTRL: Field = Field::new(74, 0, 6);
    pub const JESD_DAC4_CTRL: Field = Field::new(74, 6, 6);
    pub const SYSREF_PULSE_CNT: Field = Field::new(74, 12, 4);
    pub const CHDIV: Field = Field::new(75, 6, 5);

    pub const VCO_CAPCTRL_STRT: Field = Field::new(78, 1, 8);
    pub const QUICK_RECAL_EN: Field = Field::new(78, 9, 1);
    pub const RAMP_THRESH_32: Field = Field::new(78, 11, 1);
    pub const RAMP_THRESH_31_16: Field = Field::new(79, 0, 16);
    pub const RAMP_THRESH_15_0: Field = Field::new(80, 0, 16);
    pub const RAMP_LIMIT_HIGH_32: Field = Field::new(81, 0, 1);
    pub const RAMP_LIMIT_HIGH_31_16: Field = Field::new(82, 0, 16);
    pub const RAMP_LIMIT_HIGH_15_0: Field = Field::new(83, 0, 16);
    pub const RAMP_LIMIT_LOW_32: Field = Field::new(84, 0, 1);
    pub const RAMP_LIMIT_LOW_31_16: Field = Field::new(85, 0, 16);
    pub const RAMP_LIMIT_LOW_15_0: Field = Field::new(86, 0, 16);
    pub const RAMP_BURST_COUNT: Field = Field::new(96, 2, 13);
    pub const RAMP_BURST_EN: Field = Field::new(96, 15, 1);
    pub const RAMP_BURST_TRIG: Field = Field::new(97, 0, 2);
    pub const RAMP_TRIGA: Field = Field::new(97, 3, 4);
    pub const RAMP_TRIGB: Field = Field::new(97, 7, 4);
    pub const RAMP0_RST: Field = Field::new(97, 15, 1);
    pub const RAMP0_DLY: Field = Field::new(98, 0, 1);
    pub const RAMP0_INC_29_16: Field = Field::new(98, 2, 14);
    pub const RAMP0_INC_15_0: Field = Field::new(99, 0, 16);
    pub const RAMP0_LEN: Field = Field::new(100, 0, 16);
    pub const RAMP0_NEXT_TRIG: Field = Field::new(101, 0, 2);
    pub const RAMP0_NEXT: Field = Field::new(101, 4, 1);
    pub const RAMP1_RST: Field = Field::new(101, 5, 1);
    pub const RAMP1_DLY: Field = Field::new(101, 6, 1);
    pub const RAMP1_INC_29_16: Field = Field::new(102, 0, 14);
    pub const RAMP1_INC_15_0: Field = Field::new(103, 0, 16);
    pub const RAMP1_LEN: Field = Field::new(104, 0, 16);
    pub const RAMP1_NEXT_TRIG: Field = Field::new(105, 0, 2);
    pub const RAMP1_NEXT: Field = Field::new(105, 4, 1);
    pub const RAMP_MANUAL: Field = Field::new(105, 5, 1);
    pub const RAMP_DLY_CNT: Field = Field::new(105, 6, 10);
    pub const RAMP_SCALE_COUNT: Field = Field::new(106, 0, 3);
    pub const RAMP_TRIG_CAL: Field = Field::new(106, 4, 1);

    pub const RB_VCO_SEL: Field = Field::new(110, 5, 3);
    pub const RB_LD_VTUNE: Field = Field::new(110, 9, 2);
    pub const RB_VCO_CAPCTRL: Field = Field::new(111, 0, 8);
    pub const RB_VCO_DACISET: Field = Field::new(112, 0, 9);
}

field_values! {
    /// MUXOUT pin function. Register reads need `Readback`.
    pub enum MuxoutLdSel {
        Readback = 0,
        LockDetect = 1,
    }
}

field_values! {
    /// FCAL_HPFD_ADJ: phase detector frequency above which calibration is adjusted.
    pub enum FcalHpfdAdj {
        Below100MHz = 0,
        From100To150MHz = 1,
        From150To200MHz = 2,
        Above200MHz = 3,
    }
}

field_values! {
    pub enum FcalLpfdAdj {
        Above10MHz = 0,
        From5To10MHz = 1,
        From2p5To5MHz = 2,
        Below2p5MHz = 3,
    }
}

field_values! {
    pub enum CalClkDiv {
        Div1 = 0,
        Div2 = 1,
        Div4 = 2,
        Div8 = 3,
    }
}

field_values! {
    /// Reference path multiplier.
    pub enum Mult {
        Bypass = 1,
        X3 = 3,
        X4 = 4,
        X5 = 5,
        X6 = 6,
        X7 = 7,
    }
}

impl Mult {
    pub fn factor(self) -> u16 {
        self as u16
    }
}

field_values! {
    /// Charge pump gain.
    pub enum Cpg {
        Off = 0,
        Ma6 = 1,
        Ma12 = 3,
        Ma3 = 4,
        Ma9 = 5,
        Ma15 = 7,
    }
}

field_values! {
    pub enum VcoSel {
        NotUsed = 0,
        Vco1 = 1,
        Vco2 = 2,
        Vco3 = 3,
        Vco4 = 4,
        Vco5 = 5,
        Vco6 = 6,
        Vco7 = 7,
    }
}

field_values! {
    /// Sigma-delta modulator order.
    pub enum MashOrder {
        Integer = 0,
        First = 1,
        Second = 2,
        Third = 3,
        Fourth = 4,
    }
}

impl MashOrder {
    /// Smallest N divider the modulator tolerates (VCO up to 12.5 GHz).
    pub fn min_n(self) -> u32 {
        match self {
            MashOrder::Integer | MashOrder::First => 28,
            MashOrder::Second => 32,
            MashOrder::Third => 36,
            MashOrder::Fourth => 44,
        }
    }
}

field_values! {
    pub enum OutIset {
        BoostMax = 0,
        Boost1 = 1,
        Boost2 = 2,
        BoostOff = 3,
    }
}

field_values! {
    pub enum OutAMux {
        ChannelDivider = 0,
        Vco = 1,
        HighZ = 3,
    }
}

field_values! {
    pub enum OutBMux {
        ChannelDivider = 0,
        Vco = 1,
        Sysref = 2,
        HighZ = 3,
    }
}

field_values! {
    pub enum InpinFmt {
        SyncSysRefReqCmos = 0,
        SyncLvdsSysRefReqCmos = 1,
        SyncCmosSysRefReqLvds = 2,
        SyncSysRefReqLvds = 3,
    }
}

field_values! {
    pub enum InpinLvl {
        Div4 = 0,
        Div1 = 1,
        Div2 = 2,
    }
}

field_values! {
    pub enum LdType {
        VcoStatus = 0,
        VcoVtuneStatus = 1,
    }
}

field_values! {
    pub enum SysrefDivPre {
        Div1 = 1,
        Div2 = 2,
        Div4 = 4,
    }
}

field_values! {
    pub enum RampTrig {
        Disabled = 0,
        ClkRisingEdge = 1,
        DirRisingEdge = 2,
        AlwaysTriggered = 4,
        ClkFallingEdge = 9,
        DirFallingEdge = 10,
    }
}

field_values! {
    pub enum RampBurstTrig {
        RampTransition = 0,
        TriggerA = 1,
        TriggerB = 2,
    }
}

field_values! {
    /// Channel divider setting.
    pub enum ChDiv {
        Div2 = 0,
        Div4 = 1,
        Div6 = 2,
        Div8 = 3,
        Div12 = 4,
        Div16 = 5,
        Div24 = 6,
        Div32 = 7,
        Div48 = 8,
        Div64 = 9,
        Div72 = 10,
        Div96 = 11,
        Div128 = 12,
        Div192 = 13,
        Div256 = 14,
        Div384 = 15,
        Div512 = 16,
        Div768 = 17,
    }
}

impl ChDiv {
    /// All settings in ascending divider order.
    pub const ALL: [ChDiv; 18] = [
        ChDiv::Div2,
        ChDiv::Div4,
        ChDiv::Div6,
        ChDiv::Div8,
        ChDiv::Div12,
        ChDiv::Div16,
        ChDiv::Div24,
        ChDiv::Div32,
        ChDiv::Div48,
        ChDiv::Div64,
        ChDiv::Div72,
        ChDiv::Div96,
        ChDiv::Div128,
        ChDiv::Div192,
        ChDiv::Div256,
        ChDiv::Div384,
        ChDiv::Div512,
        ChDiv::Div768,
    ];

    pub fn divider(self) -> u16 {
        match self {
            ChDiv::Div2 => 2,
            ChDiv::Div4 => 4,
            ChDiv::Div6 => 6,
            ChDiv::Div8 => 8,
            ChDiv::Div12 => 12,
            ChDiv::Div16 => 16,
            ChDiv::Div24 => 24,
            ChDiv::Div32 => 32,
            ChDiv::Div48 => 48,
            ChDiv::Div64 => 64,
            ChDiv::Div72 => 72,
            ChDiv::Div96 => 96,
            ChDiv::Div128 => 128,
            ChDiv::Div192 => 192,
            ChDiv::Div256 => 256,
            ChDiv::Div384 => 384,
            ChDiv::Div512 => 512,
            ChDiv::Div768 => 768,
        }
    }
}

/// SYSREF_DIV code for a SYSREF divider (4..=4098, even), clamped to the field.
pub fn sysref_div_code(div: u16) -> u16 {
    const MIN_DIV: u16 = 4;
    const MAX_DIV: u16 = 4098;
    let div = div.clamp(MIN_DIV, MAX_DIV);
    (div - MIN_DIV) / 2
}

/// Power-on register values.
pub static DEFAULTS: [u16; REGISTER_COUNT] = [
    0x2410, 0x080B, 0x0500, 0x0642, 0x0043, 0x00C8, 0xC802, 0x00B2, // R0-R7
    0x2000, 0x0604, 0x10D8, 0x0018, 0x5001, 0x4000, 0x1E70, 0x064F, // R8-R15
    0x0080, 0x00FA, 0x0064, 0x27B7, 0xF848, 0x0401, 0x0001, 0x007C, // R16-R23
    0x071A, 0x0C2B, 0x0DB0, 0x0002, 0x0488, 0x318C, 0x318C, 0x03EC, // R24-R31
    0x0393, 0x1E21, 0x0000, 0x0004, 0x0064, 0x0004, 0x0000, 0x0000, // R32-R39
    0x0000, 0x0000, 0x0000, 0x0000, 0x1FA0, 0xC8C0, 0x07FD, 0x0300, // R40-R47
    0x0300, 0x4180, 0x0000, 0x0080, 0x0820, 0x0000, 0x0000, 0x0000, // R48-R55
    0x0000, 0x0020, 0x8001, 0x0001, 0x0000, 0x00A8, 0x0322, 0x0000, // R56-R63
    0x1388, 0x0000, 0x01F4, 0x0000, 0x03E8, 0x0000, 0x0000, 0x0081, // R64-R71
    0x0000, 0x003F, 0x0000, 0x0800, 0x000C, 0x0000, 0x0001, 0x0000, // R72-R79
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // R80-R87
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // R88-R95
    0x0000, 0x0800, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // R96-R103
    0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, // R104-R111
    0x0000, // R112
];

/// PLL_N, 19 bits across R34 and R36.
pub const PLL_N: SplitField = SplitField::new(field::PLL_N_18_16, field::PLL_N_15_0);
/// PLL_DEN, 32 bits across R38 and R39.
pub const PLL_DEN: SplitField = SplitField::new(field::PLL_DEN_31_16, field::PLL_DEN_15_0);
/// PLL_NUM, 32 bits across R42 and R43.
pub const PLL_NUM: SplitField = SplitField::new(field::PLL_NUM_31_16, field::PLL_NUM_15_0);
/// MASH_SEED, 32 bits across R40 and R41.
pub const MASH_SEED: SplitField = SplitField::new(field::MASH_SEED_31_16, field::MASH_SEED_15_0);
