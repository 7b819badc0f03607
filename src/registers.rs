//! Bit-field register model shared by the chip drivers.
//!
//! A chip's register bank is a fixed array of 16-bit words with a datasheet
//! default table. Named fields are `(register, shift, width)` constants; field
//! writes mask the value to the declared width and never touch neighbouring
//! bits. Every write that changes a word marks its address in a [`DirtySet`] so
//! that a later commit pass can push exactly the changed registers to the bus.

/// A named sub-range of one register.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    pub register: u8,
    pub shift: u8,
    pub width: u8,
}

impl Field {
    pub const fn new(register: u8, shift: u8, width: u8) -> Self {
        assert!(width > 0 && shift as u32 + width as u32 <= 16);
        Self { register, shift, width }
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// Field bits in register position.
    pub const fn mask(&self) -> u16 {
        self.max() << self.shift
    }

    pub const fn extract(&self, raw: u16) -> u16 {
        (raw & self.mask()) >> self.shift
    }

    /// Replace the field inside `raw`. Bits of `value` above the field width
    /// are dropped, matching how the hardware latches the field.
    pub const fn insert(&self, raw: u16, value: u16) -> u16 {
        let shifted = (((value & self.max()) as u32) << self.shift) as u16;
        (raw & !self.mask()) | shifted
    }
}

/// Closed set of named values stored in a field.
pub trait FieldValue: Copy + Sized {
    fn to_bits(self) -> u16;
    fn from_bits(bits: u16) -> Option<Self>;
}

/// Declares a `#[repr(u16)]` enum and its [`FieldValue`] mapping.
macro_rules! field_values {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        #[repr(u16)]
        $vis enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $crate::registers::FieldValue for $name {
            fn to_bits(self) -> u16 {
                self as u16
            }

            fn from_bits(bits: u16) -> Option<Self> {
                match bits {
                    $(b if b == $name::$variant as u16 => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use field_values;

/// Field contents read back from hardware: the raw bits plus the named value
/// when the bits match one. Unknown encodings are kept, not rejected.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Decoded<T> {
    pub raw: u16,
    pub value: Option<T>,
}

impl<T: FieldValue> Decoded<T> {
    pub fn from_raw(raw: u16) -> Self {
        Self {
            raw,
            value: T::from_bits(raw),
        }
    }
}

/// Field pair holding a value wider than one register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SplitField {
    pub high: Field,
    pub low: Field,
}

impl SplitField {
    pub const fn new(high: Field, low: Field) -> Self {
        Self { high, low }
    }

    /// Split `value` into the high and low field contents.
    pub const fn split(&self, value: u32) -> (u16, u16) {
        let low = (value & self.low.max() as u32) as u16;
        let high = ((value >> self.low.width) & self.high.max() as u32) as u16;
        (high, low)
    }

    pub const fn join(&self, high: u16, low: u16) -> u32 {
        ((high as u32) << self.low.width) | low as u32
    }
}

/// Inclusive range of register addresses with a shared meaning.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegisterRange {
    pub start: u8,
    pub end: u8,
}

impl RegisterRange {
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    pub const fn contains(&self, addr: u8) -> bool {
        addr >= self.start && addr <= self.end
    }

    pub fn addresses(&self) -> core::ops::RangeInclusive<u8> {
        self.start..=self.end
    }

    pub const fn len(&self) -> usize {
        (self.end - self.start) as usize + 1
    }
}

/// Registers whose in-memory value has not been written to the device yet.
///
/// Each address appears at most once. [`DirtySet::next`] hands out the highest
/// pending address first, which is the order compound registers must be
/// written in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DirtySet<const N: usize> {
    flags: [bool; N],
}

impl<const N: usize> Default for DirtySet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DirtySet<N> {
    pub const fn new() -> Self {
        Self { flags: [false; N] }
    }

    pub const fn is_valid(&self, addr: u8) -> bool {
        (addr as usize) < N
    }

    /// Mark one address. Returns `false` (and does nothing) if it is out of range.
    pub fn mark(&mut self, addr: u8) -> bool {
        match self.flags.get_mut(addr as usize) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    /// Mark several addresses; valid ones are marked even if some are not.
    pub fn mark_all(&mut self, addrs: &[u8]) -> bool {
        addrs.iter().fold(true, |ok, &addr| self.mark(addr) && ok)
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.iter().any(|&f| f)
    }

    pub fn contains(&self, addr: u8) -> bool {
        self.flags.get(addr as usize).copied().unwrap_or(false)
    }

    /// Highest pending address.
    pub fn next(&self) -> Option<u8> {
        self.flags.iter().rposition(|&f| f).map(|idx| idx as u8)
    }

    pub fn clear(&mut self, addr: u8) -> bool {
        match self.flags.get_mut(addr as usize) {
            Some(flag) => {
                *flag = false;
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.flags = [false; N];
    }

    pub fn len(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.is_dirty()
    }
}

/// In-memory copy of a chip's register bank.
#[derive(Clone, Debug)]
pub struct RegisterBank<const N: usize> {
    values: [u16; N],
    defaults: &'static [u16; N],
    dirty: DirtySet<N>,
}

impl<const N: usize> RegisterBank<N> {
    /// Bank holding the power-on defaults. Nothing is dirty: the device is
    /// assumed to hold the same values after power-up.
    pub fn new(defaults: &'static [u16; N]) -> Self {
        Self {
            values: *defaults,
            defaults,
            dirty: DirtySet::new(),
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn raw(&self, addr: u8) -> Option<u16> {
        self.values.get(addr as usize).copied()
    }

    /// Overwrite a whole register, marking it dirty if the value changes.
    pub fn set_raw(&mut self, addr: u8, value: u16) -> bool {
        match self.values.get_mut(addr as usize) {
            Some(slot) => {
                if *slot != value {
                    *slot = value;
                    self.dirty.mark(addr);
                }
                true
            }
            None => false,
        }
    }

    /// Record a value that is known to be on the device (after a read or a
    /// write): the register is stored and no longer dirty.
    pub fn sync(&mut self, addr: u8, value: u16) -> bool {
        match self.values.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                self.dirty.clear(addr);
                true
            }
            None => false,
        }
    }

    /// Field contents; fields whose register lies outside the bank read as zero.
    pub fn field(&self, field: Field) -> u16 {
        self.raw(field.register).map(|raw| field.extract(raw)).unwrap_or(0)
    }

    pub fn set_field(&mut self, field: Field, value: u16) -> bool {
        match self.raw(field.register) {
            Some(raw) => self.set_raw(field.register, field.insert(raw, value)),
            None => false,
        }
    }

    pub fn flag(&self, field: Field) -> bool {
        self.field(field) != 0
    }

    pub fn set_flag(&mut self, field: Field, enabled: bool) -> bool {
        self.set_field(field, enabled as u16)
    }

    pub fn field_value<T: FieldValue>(&self, field: Field) -> Decoded<T> {
        Decoded::from_raw(self.field(field))
    }

    pub fn set_field_value<T: FieldValue>(&mut self, field: Field, value: T) -> bool {
        self.set_field(field, value.to_bits())
    }

    /// Restore the default table; registers that change are marked dirty.
    pub fn load_defaults(&mut self) {
        let defaults = self.defaults;
        for (addr, &value) in defaults.iter().enumerate() {
            self.set_raw(addr as u8, value);
        }
    }

    pub fn defaults(&self) -> &'static [u16; N] {
        self.defaults
    }

    pub fn values(&self) -> &[u16; N] {
        &self.values
    }

    pub fn dirty(&self) -> &DirtySet<N> {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtySet<N> {
        &mut self.dirty
    }
}
