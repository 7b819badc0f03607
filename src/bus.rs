//! Register transports.
//!
//! Drivers never talk to a peripheral directly: every transaction goes through
//! [`RegisterBus`], which moves one register value at a time. Adapters are
//! provided for `embedded-hal` I2C (8-bit registers), `embedded-hal` SPI
//! (LMX-style 24-bit frames carrying 16-bit registers) and a plain pair of
//! functions returning fault codes.

use core::marker::PhantomData;

/// Single-register read/write contract consumed by the drivers.
pub trait RegisterBus {
    /// Register width carried by this bus.
    type Value: Copy;
    /// Fault reported by the transport.
    type Error;

    fn read_register(&mut self, device: u8, register: u8) -> Result<Self::Value, Self::Error>;

    fn write_register(&mut self, device: u8, register: u8, value: Self::Value) -> Result<(), Self::Error>;
}

impl<B: RegisterBus + ?Sized> RegisterBus for &mut B {
    type Value = B::Value;
    type Error = B::Error;

    fn read_register(&mut self, device: u8, register: u8) -> Result<Self::Value, Self::Error> {
        (**self).read_register(device, register)
    }

    fn write_register(&mut self, device: u8, register: u8, value: Self::Value) -> Result<(), Self::Error> {
        (**self).write_register(device, register, value)
    }
}

/// 8-bit register access over an I2C bus: `[reg, value]` writes, `[reg]` + 1 byte reads.
pub struct I2cBus<I2C> {
    i2c: I2C,
}

impl<I2C> I2cBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Release the underlying I2C peripheral.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterBus for I2cBus<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Value = u8;
    type Error = I2C::Error;

    fn read_register(&mut self, device: u8, register: u8) -> Result<u8, I2C::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(device, &[register], &mut buf)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, device: u8, register: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(device, &[register, value])
    }
}

/// Read flag in the first byte of an SPI frame.
pub const SPI_READ: u8 = 0x80;

/// 16-bit register access over SPI using 24-bit frames `[R/W | addr, MSB, LSB]`.
///
/// Chip select identifies the device, so the device address is ignored.
pub struct SpiBus<SPI> {
    spi: SPI,
}

impl<SPI> SpiBus<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the underlying SPI device.
    pub fn free(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterBus for SpiBus<SPI>
where
    SPI: embedded_hal::spi::SpiDevice,
{
    type Value = u16;
    type Error = SPI::Error;

    fn read_register(&mut self, _device: u8, register: u8) -> Result<u16, SPI::Error> {
        let mut frame = [SPI_READ | (register & 0x7F), 0, 0];
        self.spi.transfer_in_place(&mut frame)?;
        Ok(u16::from_be_bytes([frame[1], frame[2]]))
    }

    fn write_register(&mut self, _device: u8, register: u8, value: u16) -> Result<(), SPI::Error> {
        let [hi, lo] = value.to_be_bytes();
        self.spi.write(&[register & 0x7F, hi, lo])
    }
}

/// Transport built from a caller-supplied read/write function pair.
///
/// Both functions return a fault code; anything other than the configured
/// no-fault value (by default `C::default()`, i.e. zero for integers) is
/// surfaced as `Err(code)`.
pub struct FnBus<R, W, V, C> {
    read: R,
    write: W,
    no_fault: C,
    _value: PhantomData<V>,
}

impl<R, W, V, C> FnBus<R, W, V, C>
where
    R: FnMut(u8, u8, &mut V) -> C,
    W: FnMut(u8, u8, V) -> C,
    C: Default,
{
    pub fn new(read: R, write: W) -> Self {
        Self::with_no_fault(read, write, C::default())
    }
}

impl<R, W, V, C> FnBus<R, W, V, C>
where
    R: FnMut(u8, u8, &mut V) -> C,
    W: FnMut(u8, u8, V) -> C,
{
    /// Build a transport whose success sentinel is `no_fault`.
    pub fn with_no_fault(read: R, write: W, no_fault: C) -> Self {
        Self {
            read,
            write,
            no_fault,
            _value: PhantomData,
        }
    }

    /// Swap both functions, keeping the no-fault sentinel.
    pub fn rebind(&mut self, read: R, write: W) {
        self.read = read;
        self.write = write;
    }

    pub fn no_fault(&self) -> &C {
        &self.no_fault
    }
}

impl<R, W, V, C> RegisterBus for FnBus<R, W, V, C>
where
    R: FnMut(u8, u8, &mut V) -> C,
    W: FnMut(u8, u8, V) -> C,
    V: Copy + Default,
    C: PartialEq,
{
    type Value = V;
    type Error = C;

    fn read_register(&mut self, device: u8, register: u8) -> Result<V, C> {
        let mut value = V::default();
        let code = (self.read)(device, register, &mut value);
        if code == self.no_fault {
            Ok(value)
        } else {
            Err(code)
        }
    }

    fn write_register(&mut self, device: u8, register: u8, value: V) -> Result<(), C> {
        let code = (self.write)(device, register, value);
        if code == self.no_fault {
            Ok(())
        } else {
            Err(code)
        }
    }
}
