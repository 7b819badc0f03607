use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTrans};
use freqsynth_rs::lmx2594::registers::{ChDiv, DEFAULTS, MashOrder, RANGE_COMMON, RANGE_RAMPING, REGISTER_COUNT, field};
use freqsynth_rs::lmx2594::{Lmx2594, RESET_SETTLE_MS};
use freqsynth_rs::{Error, FnBus, Output, OutputSource, Raise, RegisterBus, SpiBus};

#[derive(Default)]
struct CountingDelay {
    ns: u64,
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.ns += ns as u64;
    }
}

type Writes = RefCell<Vec<(u8, u16)>>;

/// Records every write; reads return zero.
fn recording_bus(log: &Writes) -> impl RegisterBus<Value = u16, Error = i32> + '_ {
    FnBus::new(
        |_: u8, _: u8, value: &mut u16| -> i32 {
            *value = 0;
            0
        },
        move |_: u8, reg: u8, value: u16| -> i32 {
            log.borrow_mut().push((reg, value));
            0
        },
    )
}

/// Register file that returns whatever was last written.
fn echo_bus(regs: &RefCell<[u16; REGISTER_COUNT]>) -> impl RegisterBus<Value = u16, Error = i32> + '_ {
    FnBus::new(
        move |_: u8, reg: u8, value: &mut u16| -> i32 {
            *value = regs.borrow()[reg as usize];
            0
        },
        move |_: u8, reg: u8, value: u16| -> i32 {
            regs.borrow_mut()[reg as usize] = value;
            0
        },
    )
}

/// Records every write attempt; attempts past `ok_writes` fail with code 7.
fn failing_after(ok_writes: usize, log: &Writes) -> impl RegisterBus<Value = u16, Error = i32> + '_ {
    FnBus::new(
        |_: u8, _: u8, value: &mut u16| -> i32 {
            *value = 0;
            0
        },
        move |_: u8, reg: u8, value: u16| -> i32 {
            let mut log = log.borrow_mut();
            log.push((reg, value));
            if log.len() > ok_writes { 7 } else { 0 }
        },
    )
}

fn faulting_bus() -> impl RegisterBus<Value = u16, Error = i32> {
    FnBus::new(|_: u8, _: u8, _: &mut u16| -> i32 { 5 }, |_: u8, _: u8, _: u16| -> i32 { 5 })
}

#[test]
fn reset_pulses_reset_writes_bank_and_calibrates() {
    let log = Writes::default();
    let mut delay = CountingDelay::default();
    let mut driver = Lmx2594::new(recording_bus(&log));
    driver.reset(&mut delay).unwrap();

    let writes = log.borrow().clone();
    assert_eq!(writes.len(), 2 + 106 + 1);
    assert_eq!(writes[0], (0, DEFAULTS[0] | 0x0002));
    assert_eq!(writes[1], (0, DEFAULTS[0]));
    let expected: Vec<(u8, u16)> = (1..=106u8).rev().map(|reg| (reg, DEFAULTS[reg as usize])).collect();
    assert_eq!(&writes[2..108], expected.as_slice());
    assert_eq!(writes[108], (0, DEFAULTS[0] | 0x0008));
    assert_eq!(delay.ns, RESET_SETTLE_MS as u64 * 1_000_000);
    assert!(driver.registers().dirty().is_empty());
}

#[test]
fn reset_restores_defaults_on_configured_handle() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let mut driver = Lmx2594::new(echo_bus(&regs));
    let mut delay = CountingDelay::default();
    driver.reset(&mut delay).unwrap();
    driver.set_output_enabled(Output::B, true).unwrap();
    driver.set_output_power(Output::A, 5).unwrap();
    driver.set_output_frequency(Output::A, 1.2345e9).unwrap();

    driver.reset(&mut delay).unwrap();
    assert!(driver.is_output_enabled(Output::A).unwrap());
    assert!(!driver.is_output_enabled(Output::B).unwrap());
    assert_eq!(driver.output_power(Output::A).unwrap(), 31);
    assert_eq!(&driver.registers().values()[1..107], &DEFAULTS[1..107]);
    assert_eq!(driver.registers().raw(0), Some(DEFAULTS[0] | 0x0008));
    assert_eq!(&regs.borrow()[1..107], &DEFAULTS[1..107]);
}

#[test]
fn repeated_reset_writes_the_same_sequence() {
    let log = Writes::default();
    let mut delay = CountingDelay::default();
    let mut driver = Lmx2594::new(recording_bus(&log));
    driver.reset(&mut delay).unwrap();
    driver.set_output_power(Output::B, 12).unwrap();
    driver.reset(&mut delay).unwrap();

    let writes = log.borrow();
    assert_eq!(writes.len(), 109 + 1 + 109);
    assert_eq!(writes[109], (45, 0xC8CC));
    // FCAL_EN from the first calibration is not carried into the RESET pulse.
    assert_eq!(writes[110], (0, DEFAULTS[0] | 0x0002));
    assert_eq!(&writes[110..], &writes[..109]);
}

#[test]
fn fault_during_reset_stops_the_sequence() {
    let log = Writes::default();
    let mut delay = CountingDelay::default();
    let mut driver = Lmx2594::new(failing_after(5, &log));
    driver.set_field(field::OUTB_PWR, 9);

    assert_eq!(driver.reset(&mut delay), Err(Error::Transport(7)));
    let writes = log.borrow();
    // RESET pulse, R106..R104, then the failed R103 and nothing after it.
    assert_eq!(writes.len(), 6);
    assert_eq!(writes[5].0, 103);
    assert_eq!(delay.ns, 0);
    assert!(!driver.registers().dirty().contains(104));
    assert!(driver.registers().dirty().contains(45));
    assert_eq!(driver.field(field::OUTB_PWR), 0);
    assert!(!driver.registers().flag(field::RESET));
    assert!(!driver.registers().flag(field::FCAL_EN));
}

#[test]
fn reads_commit_staged_changes_first() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let mut driver = Lmx2594::new(echo_bus(&regs));
    driver.reset(&mut CountingDelay::default()).unwrap();

    driver.set_field(field::OUTA_PWR, 5);
    assert!(driver.registers().dirty().contains(44));
    assert!(driver.is_output_enabled(Output::A).unwrap());
    assert!(driver.registers().dirty().is_empty());
    assert_eq!(driver.field(field::OUTA_PWR), 5);
    assert_eq!(field::OUTA_PWR.extract(regs.borrow()[44]), 5);
}

#[test]
fn after_reset_outa_is_on_and_outb_is_off() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let mut driver = Lmx2594::new(echo_bus(&regs));
    driver.reset(&mut CountingDelay::default()).unwrap();
    assert!(driver.is_output_enabled(Output::A).unwrap());
    assert!(!driver.is_output_enabled(Output::B).unwrap());
}

#[test]
fn output_enable_and_power_write_one_register() {
    let log = Writes::default();
    let mut driver = Lmx2594::new(recording_bus(&log));
    driver.set_output_enabled(Output::B, true).unwrap();
    driver.set_output_power(Output::A, 70).unwrap();
    driver.set_output_power(Output::B, 10).unwrap();
    assert_eq!(
        log.borrow().as_slice(),
        &[(44, 0x1F20), (44, 0x3F20), (45, 0xC8CA)]
    );
    assert_eq!(driver.field(field::OUTA_PWR), 63);
}

#[test]
fn frequency_change_commits_high_registers_first() {
    let log = Writes::default();
    let mut driver = Lmx2594::new(recording_bus(&log));
    let plan = driver.set_output_frequency(Output::B, 2.5e9).unwrap();
    assert_eq!(plan.source, OutputSource::ChannelDivider(ChDiv::Div4));
    assert_eq!(plan.n, 100);
    assert_eq!(plan.mash_order, MashOrder::Integer);
    assert_eq!(
        log.borrow().as_slice(),
        &[
            (75, 0x0840),
            (46, 0x07FC),
            (39, 0xFFFF),
            (38, 0xFFFF),
            (31, 0x43EC),
            (0, 0x2418),
        ]
    );
    assert!(driver.registers().dirty().is_empty());
}

#[test]
fn unplannable_frequency_leaves_bank_untouched() {
    let log = Writes::default();
    let mut driver = Lmx2594::new(recording_bus(&log));
    assert_eq!(driver.set_output_frequency(Output::A, 1.0e6), Err(Error::OutOfRange));
    assert_eq!(driver.registers().values(), &DEFAULTS);
    assert!(log.borrow().is_empty());
}

#[test]
fn output_frequency_reads_back_programmed_value() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let mut driver = Lmx2594::new(echo_bus(&regs));
    driver.reset(&mut CountingDelay::default()).unwrap();

    driver.set_output_frequency(Output::B, 2.5e9).unwrap();
    assert_eq!(driver.output_frequency(Output::B).unwrap(), 2.5e9);

    let target = 1_234_567_890.0;
    driver.set_output_frequency(Output::A, target).unwrap();
    let back = driver.output_frequency(Output::A).unwrap();
    assert!((back - target).abs() < 1.0);
}

#[test]
fn high_z_output_has_no_frequency() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let mut driver = Lmx2594::new(echo_bus(&regs));
    driver.reset(&mut CountingDelay::default()).unwrap();
    driver.set_field(field::OUTA_MUX, 3);
    driver.commit().unwrap();
    assert_eq!(driver.output_frequency(Output::A), Err(Error::InvalidConfig));
}

#[test]
fn write_all_then_read_back_restores_bank() {
    let regs = RefCell::new([0u16; REGISTER_COUNT]);
    let expected = {
        let mut writer = Lmx2594::new(echo_bus(&regs));
        writer.set_field(field::OUTB_PWR, 17);
        writer.set_field(field::PLL_N_15_0, 0x1234);
        writer.set_field(field::RAMP0_LEN, 0xBEEF);
        writer.write_all().unwrap();
        *writer.registers().values()
    };

    let mut reader = Lmx2594::new(echo_bus(&regs));
    reader.read_range(RANGE_COMMON).unwrap();
    reader.read_range(RANGE_RAMPING).unwrap();
    assert_eq!(&reader.registers().values()[1..107], &expected[1..107]);
    assert!(reader.registers().dirty().is_empty());
}

#[test]
fn transport_fault_is_reported_and_bank_keeps_attempt() {
    let mut driver = Lmx2594::new(faulting_bus());
    let err = driver.set_output_power(Output::A, 20).unwrap_err();
    assert_eq!(err, Error::Transport(5));
    assert_eq!(err.fault_code(), Some(&5));
    assert_eq!(driver.field(field::OUTA_PWR), 20);
    assert!(driver.registers().dirty().contains(44));
}

#[test]
#[should_panic(expected = "register transport error")]
fn raise_panics_on_transport_fault() {
    let mut driver = Lmx2594::new(faulting_bus());
    driver.set_output_enabled(Output::A, false).raise();
}

#[test]
fn custom_no_fault_value() {
    let bus = FnBus::with_no_fault(
        |_: u8, _: u8, value: &mut u16| -> i32 {
            *value = 0x1FA0;
            1
        },
        |_: u8, _: u8, _: u16| -> i32 { 0 },
        1,
    );
    let mut driver = Lmx2594::new(bus);
    assert!(driver.is_output_enabled(Output::A).unwrap());
    assert_eq!(driver.set_output_enabled(Output::A, false), Err(Error::Transport(0)));
}

#[test]
fn spi_frames_follow_lmx_layout() {
    let expectations = [
        SpiTrans::transaction_start(),
        SpiTrans::write_vec(vec![44, 0x1F, 0x20]),
        SpiTrans::transaction_end(),
        SpiTrans::transaction_start(),
        SpiTrans::transfer_in_place(vec![0x80 | 44, 0x00, 0x00], vec![0x00, 0x1F, 0x60]),
        SpiTrans::transaction_end(),
    ];
    let spi = SpiMock::new(&expectations);
    let mut driver = Lmx2594::new(SpiBus::new(spi));
    driver.set_output_enabled(Output::B, true).unwrap();
    // Device reports OUTA powered down.
    assert!(!driver.is_output_enabled(Output::A).unwrap());
    driver.free().free().done();
}
