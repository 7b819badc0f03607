//! LMX2594 driver.
//!
//! The driver keeps a shadow copy of all 113 registers. Setters change fields
//! in the shadow and then write the affected registers; getters for state the
//! device owns read the register first.

use embedded_hal::delay::DelayNs;

use crate::bus::RegisterBus;
use crate::config::Config;
use crate::data_types::{FrequencyPlan, Output, OutputSource};
use crate::error::Error;
use crate::fmt::trace;
use crate::lmx2594::pll;
use crate::lmx2594::registers::{
    DEFAULTS, Mult, OutAMux, OutBMux, PLL_DEN, PLL_N, PLL_NUM, RANGE_READBACK, REGISTER_COUNT, addr, field,
};
use crate::registers::{Field, RegisterBank, RegisterRange, SplitField};

/// SPI parts have no bus address; chip select picks the device.
pub const DEFAULT_ADDRESS: u8 = 0;
/// Reference oscillator on the TI evaluation module.
pub const DEFAULT_REFERENCE_HZ: f64 = 100.0e6;
/// Largest OUTx_PWR setting.
pub const OUTPUT_POWER_MAX: u8 = 63;
/// Settle time between the bank write-back and VCO calibration.
pub const RESET_SETTLE_MS: u32 = 10;

pub struct Lmx2594<BUS> {
    bus: BUS,
    config: Config,
    reference_hz: f64,
    regs: RegisterBank<REGISTER_COUNT>,
}

impl<BUS> Lmx2594<BUS> {
    /// Create a driver whose shadow registers hold the power-on defaults.
    pub fn new(bus: BUS) -> Self {
        Self::with_config(bus, Config::new(DEFAULT_ADDRESS))
    }

    pub fn with_config(bus: BUS, config: Config) -> Self {
        Self {
            bus,
            config,
            reference_hz: DEFAULT_REFERENCE_HZ,
            regs: RegisterBank::new(&DEFAULTS),
        }
    }

    pub fn address(&self) -> u8 {
        self.config.address
    }

    pub fn set_address(&mut self, address: u8) {
        self.config.address = address;
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_diagnostic_log(&mut self, enabled: bool) {
        self.config.diagnostic_log = enabled;
    }

    /// Release the bus.
    pub fn free(self) -> BUS {
        self.bus
    }

    /// Swap in another bus, returning the previous one.
    pub fn replace_bus(&mut self, bus: BUS) -> BUS {
        core::mem::replace(&mut self.bus, bus)
    }

    /// Reference oscillator frequency at the OSCin pins.
    pub fn reference_hz(&self) -> f64 {
        self.reference_hz
    }

    pub fn set_reference_hz(&mut self, hz: f64) {
        self.reference_hz = hz;
    }

    pub fn registers(&self) -> &RegisterBank<REGISTER_COUNT> {
        &self.regs
    }

    /// Shadow field value; no bus access.
    pub fn field(&self, field: Field) -> u16 {
        self.regs.field(field)
    }

    /// Change a shadow field; the register is written on the next [`commit`](Self::commit).
    pub fn set_field(&mut self, field: Field, value: u16) -> bool {
        self.regs.set_field(field, value)
    }

    /// Phase detector frequency implied by the shadow reference-path fields.
    pub fn phase_detector_hz(&self) -> Option<f64> {
        let mult = self.regs.field_value::<Mult>(field::MULT).value?;
        pll::phase_detector_hz(
            self.reference_hz,
            self.regs.flag(field::OSC_2X),
            mult.factor(),
            self.regs.field(field::PLL_R_PRE),
            self.regs.field(field::PLL_R),
        )
    }
}

impl<BUS> Lmx2594<BUS>
where
    BUS: RegisterBus<Value = u16>,
{
    /// Write the shadow value of one register.
    pub fn write_register(&mut self, reg: u8) -> Result<(), Error<BUS::Error>> {
        let value = self.regs.raw(reg).ok_or(Error::OutOfRange)?;
        trace!(
            self.config.diagnostic_log,
            "[LMX2594] <W> DEV:{=u8} REG:{=u8} VAL:{=u16:#x}",
            self.config.address,
            reg,
            value
        );
        self.bus
            .write_register(self.config.address, reg, value)
            .map_err(Error::Transport)?;
        self.regs.sync(reg, value);
        Ok(())
    }

    /// Read one register from the device into the shadow bank.
    ///
    /// Staged changes are committed first so a read never discards them.
    pub fn read_register(&mut self, reg: u8) -> Result<u16, Error<BUS::Error>> {
        if self.regs.raw(reg).is_none() {
            return Err(Error::OutOfRange);
        }
        if self.regs.dirty().is_dirty() {
            self.commit()?;
        }
        let value = self
            .bus
            .read_register(self.config.address, reg)
            .map_err(Error::Transport)?;
        trace!(
            self.config.diagnostic_log,
            "[LMX2594] <R> DEV:{=u8} REG:{=u8} VAL:{=u16:#x}",
            self.config.address,
            reg,
            value
        );
        self.regs.sync(reg, value);
        Ok(value)
    }

    /// Write every dirty register, highest address first.
    pub fn commit(&mut self) -> Result<(), Error<BUS::Error>> {
        while let Some(reg) = self.regs.dirty().next() {
            self.write_register(reg)?;
        }
        Ok(())
    }

    /// Write the whole shadow bank from R112 down to R1, skipping read-back registers.
    pub fn write_all(&mut self) -> Result<(), Error<BUS::Error>> {
        for reg in (1..REGISTER_COUNT as u8).rev() {
            if RANGE_READBACK.contains(reg) {
                continue;
            }
            self.write_register(reg)?;
        }
        Ok(())
    }

    /// Refresh a range of shadow registers from the device.
    pub fn read_range(&mut self, range: RegisterRange) -> Result<(), Error<BUS::Error>> {
        for reg in range.addresses() {
            self.read_register(reg)?;
        }
        Ok(())
    }

    /// Restore the default table, pulse RESET, write the bank to the device,
    /// wait for it to settle, then start a VCO calibration.
    ///
    /// A fault aborts the sequence and leaves the remaining registers dirty;
    /// call `reset` again to reach a known state.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<BUS::Error>> {
        trace!(self.config.diagnostic_log, "[LMX2594] reset");
        self.regs.load_defaults();
        // Read-back registers are never written.
        for reg in RANGE_READBACK.addresses() {
            self.regs.dirty_mut().clear(reg);
        }
        self.regs.set_flag(field::RESET, true);
        self.write_register(addr::R0)?;
        self.regs.set_flag(field::RESET, false);
        self.write_register(addr::R0)?;
        self.write_all()?;
        delay.delay_ms(RESET_SETTLE_MS);
        self.calibrate_vco()
    }

    /// Set FCAL_EN and write R0, starting a VCO calibration.
    pub fn calibrate_vco(&mut self) -> Result<(), Error<BUS::Error>> {
        self.regs.set_flag(field::FCAL_EN, true);
        self.write_register(addr::R0)
    }

    pub fn set_output_enabled(&mut self, output: Output, enabled: bool) -> Result<(), Error<BUS::Error>> {
        trace!(self.config.diagnostic_log, "[LMX2594] set_output_enabled {} {}", output, enabled);
        self.regs.set_flag(power_down_field(output), !enabled);
        self.write_register(addr::R44)
    }

    pub fn is_output_enabled(&mut self, output: Output) -> Result<bool, Error<BUS::Error>> {
        self.read_register(addr::R44)?;
        Ok(!self.regs.flag(power_down_field(output)))
    }

    /// Set output power (0..=63); larger values are clamped to 63.
    pub fn set_output_power(&mut self, output: Output, power: u8) -> Result<(), Error<BUS::Error>> {
        let power = power.min(OUTPUT_POWER_MAX);
        trace!(self.config.diagnostic_log, "[LMX2594] set_output_power {} {=u8}", output, power);
        let field = power_field(output);
        self.regs.set_field(field, power as u16);
        self.write_register(field.register)
    }

    pub fn output_power(&mut self, output: Output) -> Result<u8, Error<BUS::Error>> {
        let field = power_field(output);
        self.read_register(field.register)?;
        Ok(self.regs.field(field) as u8)
    }

    /// Program `output` to `hz`.
    ///
    /// Both outputs share the VCO, so an output already routed through the
    /// channel divider follows the new VCO frequency. If no plan exists the
    /// shadow bank is left untouched.
    pub fn set_output_frequency(&mut self, output: Output, hz: f64) -> Result<FrequencyPlan, Error<BUS::Error>> {
        trace!(self.config.diagnostic_log, "[LMX2594] set_output_frequency {} {}", output, hz);
        let pfd_hz = self.phase_detector_hz().ok_or(Error::InvalidConfig)?;
        let plan = pll::plan::<BUS::Error>(hz, pfd_hz)?;

        if let OutputSource::ChannelDivider(div) = plan.source {
            self.regs.set_flag(field::SEG1_EN, div.divider() > 2);
            self.regs.set_field_value(field::CHDIV, div);
        }
        self.set_split(PLL_N, plan.n);
        self.set_split(PLL_DEN, plan.den);
        self.set_split(PLL_NUM, plan.num);
        self.regs.set_field_value(field::MASH_ORDER, plan.mash_order);
        match (output, plan.source) {
            (Output::A, OutputSource::Vco) => self.regs.set_field_value(field::OUTA_MUX, OutAMux::Vco),
            (Output::A, OutputSource::ChannelDivider(_)) => {
                self.regs.set_field_value(field::OUTA_MUX, OutAMux::ChannelDivider)
            }
            (Output::B, OutputSource::Vco) => self.regs.set_field_value(field::OUTB_MUX, OutBMux::Vco),
            (Output::B, OutputSource::ChannelDivider(_)) => {
                self.regs.set_field_value(field::OUTB_MUX, OutBMux::ChannelDivider)
            }
        };

        self.commit()?;
        self.calibrate_vco()?;
        Ok(plan)
    }

    /// Read the divider and routing registers back and compute the frequency
    /// at `output`. Fails with `InvalidConfig` when the output is high-Z or
    /// carries SYSREF.
    pub fn output_frequency(&mut self, output: Output) -> Result<f64, Error<BUS::Error>> {
        for reg in [9, 10, 11, 12, addr::R34, addr::R36, addr::R38, addr::R39, addr::R42, addr::R43, addr::R75] {
            self.read_register(reg)?;
        }
        let source = match output {
            Output::A => {
                self.read_register(addr::R45)?;
                match self.regs.field_value::<OutAMux>(field::OUTA_MUX).value {
                    Some(OutAMux::Vco) => OutputSource::Vco,
                    Some(OutAMux::ChannelDivider) => self.channel_divider_source()?,
                    _ => return Err(Error::InvalidConfig),
                }
            }
            Output::B => {
                self.read_register(addr::R46)?;
                match self.regs.field_value::<OutBMux>(field::OUTB_MUX).value {
                    Some(OutBMux::Vco) => OutputSource::Vco,
                    Some(OutBMux::ChannelDivider) => self.channel_divider_source()?,
                    _ => return Err(Error::InvalidConfig),
                }
            }
        };
        let pfd_hz = self.phase_detector_hz().ok_or(Error::InvalidConfig)?;
        let n = self.split(PLL_N);
        let num = self.split(PLL_NUM);
        let den = self.split(PLL_DEN);
        Ok(pll::output_hz(pfd_hz, n, num, den, source))
    }

    fn channel_divider_source(&self) -> Result<OutputSource, Error<BUS::Error>> {
        self.regs
            .field_value(field::CHDIV)
            .value
            .map(OutputSource::ChannelDivider)
            .ok_or(Error::InvalidConfig)
    }
}

impl<BUS> Lmx2594<BUS> {
    fn set_split(&mut self, split: SplitField, value: u32) {
        let (high, low) = split.split(value);
        self.regs.set_field(split.high, high);
        self.regs.set_field(split.low, low);
    }

    fn split(&self, split: SplitField) -> u32 {
        split.join(self.regs.field(split.high), self.regs.field(split.low))
    }
}

fn power_down_field(output: Output) -> Field {
    match output {
        Output::A => field::OUTA_PD,
        Output::B => field::OUTB_PD,
    }
}

fn power_field(output: Output) -> Field {
    match output {
        Output::A => field::OUTA_PWR,
        Output::B => field::OUTB_PWR,
    }
}
