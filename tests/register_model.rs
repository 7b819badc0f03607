use freqsynth_rs::lmx2594::registers::{
    ChDiv, DEFAULTS, OutAMux, PLL_N, RANGE_READBACK, REGISTER_COUNT, field, sysref_div_code,
};
use freqsynth_rs::registers::{Decoded, DirtySet, Field, RegisterBank};

#[test]
fn field_write_masks_to_width() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    // OUTA_PWR is 6 bits wide; 0xFF keeps only 0x3F.
    assert!(bank.set_field(field::OUTA_PWR, 0xFF));
    assert_eq!(bank.field(field::OUTA_PWR), 0x3F);
    let mask = field::OUTA_PWR.mask();
    assert_eq!(bank.raw(44).unwrap() & !mask, DEFAULTS[44] & !mask);
}

#[test]
fn neighbouring_fields_are_untouched() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    let before_b = bank.flag(field::OUTB_PD);
    let before_pwr = bank.field(field::OUTA_PWR);
    bank.set_flag(field::OUTA_PD, true);
    assert!(bank.flag(field::OUTA_PD));
    assert_eq!(bank.flag(field::OUTB_PD), before_b);
    assert_eq!(bank.field(field::OUTA_PWR), before_pwr);
}

#[test]
fn field_helpers_on_plain_integers() {
    let f = Field::new(0, 4, 3);
    assert_eq!(f.mask(), 0b0111_0000);
    assert_eq!(f.insert(0xFFFF, 0), 0xFF8F);
    assert_eq!(f.extract(0x0050), 5);
}

#[test]
fn unknown_encodings_decode_without_failing() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    bank.set_field(field::OUTA_MUX, 2);
    assert_eq!(
        bank.field_value::<OutAMux>(field::OUTA_MUX),
        Decoded { raw: 2, value: None }
    );
    bank.set_field_value(field::CHDIV, ChDiv::Div12);
    assert_eq!(bank.field_value::<ChDiv>(field::CHDIV).value, Some(ChDiv::Div12));
}

#[test]
fn invalid_addresses_report_false() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    assert_eq!(bank.raw(REGISTER_COUNT as u8), None);
    assert!(!bank.set_raw(200, 1));
    assert!(!bank.set_field(Field::new(150, 0, 1), 1));
    assert_eq!(bank.field(Field::new(150, 0, 1)), 0);
    assert!(!bank.dirty_mut().mark(113));
    assert!(bank.dirty().is_empty());
}

#[test]
fn dirty_set_is_idempotent() {
    let mut dirty = DirtySet::<16>::new();
    assert!(dirty.mark(5));
    assert!(dirty.mark(5));
    assert_eq!(dirty.len(), 1);
    assert_eq!(dirty.next(), Some(5));
    assert!(dirty.clear(5));
    assert!(!dirty.is_dirty());
    assert_eq!(dirty.next(), None);
}

#[test]
fn dirty_set_drains_highest_first() {
    let mut dirty = DirtySet::<113>::new();
    assert!(!dirty.mark_all(&[3, 90, 12, 200]));
    let mut order = Vec::new();
    while let Some(addr) = dirty.next() {
        order.push(addr);
        dirty.clear(addr);
    }
    assert_eq!(order, vec![90, 12, 3]);
}

#[test]
fn unchanged_writes_do_not_mark_dirty() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    assert!(bank.set_raw(44, DEFAULTS[44]));
    assert!(bank.dirty().is_empty());
    bank.set_raw(44, 0);
    assert!(bank.dirty().contains(44));
    bank.load_defaults();
    assert_eq!(bank.values(), &DEFAULTS);
    assert!(bank.dirty().contains(44));
    assert_eq!(bank.dirty().len(), 1);
}

#[test]
fn default_table_matches_power_on_state() {
    assert_eq!(DEFAULTS.len(), 113);
    assert_eq!(DEFAULTS[0], 0x2410);
    assert_eq!(DEFAULTS[44], 0x1FA0);
    assert!(RANGE_READBACK.addresses().all(|addr| DEFAULTS[addr as usize] == 0));
    let bank = RegisterBank::new(&DEFAULTS);
    // OUTA on, OUTB powered down.
    assert!(!bank.flag(field::OUTA_PD));
    assert!(bank.flag(field::OUTB_PD));
}

#[test]
fn wide_values_span_two_registers() {
    let mut bank = RegisterBank::new(&DEFAULTS);
    let (high, low) = PLL_N.split(0x5_1234);
    bank.set_field(PLL_N.high, high);
    bank.set_field(PLL_N.low, low);
    assert_eq!(bank.raw(34).unwrap() & 0x7, 0x5);
    assert_eq!(bank.raw(36), Some(0x1234));
    assert_eq!(PLL_N.join(bank.field(PLL_N.high), bank.field(PLL_N.low)), 0x5_1234);
    assert_eq!(ChDiv::Div768.divider(), 768);
}

#[test]
fn sysref_divider_codes() {
    assert_eq!(sysref_div_code(4), 0);
    assert_eq!(sysref_div_code(10), 3);
    assert_eq!(sysref_div_code(2), 0);
    assert_eq!(sysref_div_code(u16::MAX), 2047);
}
