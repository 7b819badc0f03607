//! Si57x driver.
//!
//! The oscillator keeps no shadow bank: each operation writes or reads the
//! registers it needs. The crystal frequency used for conversions is driver
//! state and can be refined with [`Si57x::calibrate_xtal`].

use crate::bus::{I2cBus, RegisterBus};
use crate::config::Config;
use crate::data_types::Dividers;
use crate::error::Error;
use crate::fmt::trace;
use crate::si57x::divider;
use crate::si57x::registers::{
    Control, DcoControl, FREQ_BLOCK_LEN, FREQ_MIRROR_START, FREQ_START, FrequencyBlock, addr,
};

/// Factory I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x55;
/// Nominal crystal frequency.
pub const DEFAULT_XTAL_HZ: f64 = 114.285e6;

/// Si570/Si571 programmable XO/VCXO.
pub struct Si57x<BUS> {
    bus: BUS,
    config: Config,
    xtal_hz: f64,
}

impl<I2C> Si57x<I2cBus<I2C>>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Driver on an I2C bus at the factory address.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cBus::new(i2c))
    }
}

impl<BUS> Si57x<BUS> {
    /// Driver at the factory address with the nominal crystal frequency.
    pub fn new(bus: BUS) -> Self {
        Self::with_config(bus, Config::new(DEFAULT_ADDRESS))
    }

    /// Driver with an explicit address and diagnostic log setting.
    pub fn with_config(bus: BUS, config: Config) -> Self {
        Self {
            bus,
            config,
            xtal_hz: DEFAULT_XTAL_HZ,
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

    /// Crystal frequency used to convert between hertz and register values.
    pub fn xtal_hz(&self) -> f64 {
        self.xtal_hz
    }

    pub fn set_xtal_hz(&mut self, hz: f64) {
        self.xtal_hz = hz;
    }

    /// Dividers the driver would program for `hz`, without touching the device.
    pub fn dividers_for(&self, hz: f64) -> Option<Dividers> {
        divider::find_dividers(hz)
    }
}

impl<BUS> Si57x<BUS>
where
    BUS: RegisterBus<Value = u8>,
{
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<BUS::Error>> {
        trace!(
            self.config.diagnostic_log,
            "[Si57x] <W> DEV:{=u8:#x} REG:{=u8} VAL:{=u8:#x}",
            self.config.address,
            reg,
            value
        );
        self.bus
            .write_register(self.config.address, reg, value)
            .map_err(Error::Transport)
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error<BUS::Error>> {
        let value = self
            .bus
            .read_register(self.config.address, reg)
            .map_err(Error::Transport)?;
        trace!(
            self.config.diagnostic_log,
            "[Si57x] <R> DEV:{=u8:#x} REG:{=u8} VAL:{=u8:#x}",
            self.config.address,
            reg,
            value
        );
        Ok(value)
    }

    /// Reload every register from NVM.
    pub fn reset(&mut self) -> Result<(), Error<BUS::Error>> {
        self.write_reg(addr::RESET_FREEZE_MEMCTRL, Control::RST_REG.bits())
    }

    /// Hold or release the DCO (register 137).
    pub fn freeze_dco(&mut self, frozen: bool) -> Result<(), Error<BUS::Error>> {
        let bits = if frozen { DcoControl::FREEZE_DCO } else { DcoControl::empty() };
        self.write_reg(addr::FREEZE_DCO, bits.bits())
    }

    /// Latch the frequency registers into the DCO.
    pub fn apply_frequency(&mut self) -> Result<(), Error<BUS::Error>> {
        self.write_reg(addr::RESET_FREEZE_MEMCTRL, Control::NEW_FREQ.bits())
    }

    /// Program both frequency blocks for `hz`. Nothing is written when no
    /// divider pair fits; the new value takes effect after [`apply_frequency`](Self::apply_frequency).
    pub fn set_frequency(&mut self, hz: f64) -> Result<FrequencyBlock, Error<BUS::Error>> {
        let block = divider::encode_frequency::<BUS::Error>(hz, self.xtal_hz)?;
        for start in [FREQ_START, FREQ_MIRROR_START] {
            for (offset, &value) in block.0.iter().enumerate() {
                self.write_reg(start + offset as u8, value)?;
            }
        }
        Ok(block)
    }

    /// Read registers 7..=12.
    pub fn read_frequency_block(&mut self) -> Result<FrequencyBlock, Error<BUS::Error>> {
        let mut block = FrequencyBlock::default();
        for offset in 0..FREQ_BLOCK_LEN {
            block.0[offset] = self.read_reg(FREQ_START + offset as u8)?;
        }
        Ok(block)
    }

    /// Output frequency computed from the device's frequency registers.
    pub fn frequency(&mut self) -> Result<f64, Error<BUS::Error>> {
        let block = self.read_frequency_block()?;
        Ok(divider::decode_frequency(&block, self.xtal_hz))
    }

    /// Recompute the crystal frequency from a measured output frequency and
    /// keep it for later conversions. `measured_hz` must be positive.
    pub fn calibrate_xtal(&mut self, measured_hz: f64) -> Result<f64, Error<BUS::Error>> {
        if !(measured_hz > 0.0) {
            return Err(Error::OutOfRange);
        }
        let block = self.read_frequency_block()?;
        let xtal_hz = divider::xtal_from_measurement(measured_hz, &block).ok_or(Error::InvalidConfig)?;
        self.xtal_hz = xtal_hz;
        trace!(self.config.diagnostic_log, "[Si57x] Fxtal = {}", xtal_hz);
        Ok(xtal_hz)
    }
}
