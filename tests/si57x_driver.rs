use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use freqsynth_rs::Error;
use freqsynth_rs::si57x::divider::{decode_frequency, encode_frequency};
use freqsynth_rs::si57x::registers::FrequencyBlock;
use freqsynth_rs::si57x::{DEFAULT_ADDRESS, DEFAULT_XTAL_HZ, Si57x};

fn read_block(block: &FrequencyBlock) -> Vec<I2cTrans> {
    block
        .0
        .iter()
        .enumerate()
        .map(|(i, &byte)| I2cTrans::write_read(DEFAULT_ADDRESS, vec![7 + i as u8], vec![byte]))
        .collect()
}

#[test]
fn control_commands() {
    let expectations = [
        I2cTrans::write(0x55, vec![135, 0x80]),
        I2cTrans::write(0x55, vec![137, 0x10]),
        I2cTrans::write(0x55, vec![137, 0x00]),
        I2cTrans::write(0x55, vec![135, 0x40]),
    ];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    driver.reset().unwrap();
    driver.freeze_dco(true).unwrap();
    driver.freeze_dco(false).unwrap();
    driver.apply_frequency().unwrap();
    driver.free().free().done();
}

#[test]
fn set_frequency_writes_both_blocks() {
    let block = encode_frequency::<()>(100.0e6, DEFAULT_XTAL_HZ).unwrap();
    let mut expectations = Vec::new();
    for start in [7u8, 13] {
        for (i, &byte) in block.0.iter().enumerate() {
            expectations.push(I2cTrans::write(DEFAULT_ADDRESS, vec![start + i as u8, byte]));
        }
    }
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    assert_eq!(driver.set_frequency(100.0e6).unwrap(), block);
    driver.free().free().done();
}

#[test]
fn unsolvable_frequency_writes_nothing() {
    let expectations: [I2cTrans; 0] = [];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    assert_eq!(driver.set_frequency(2.5e9), Err(Error::UnsolvableDivider));
    driver.free().free().done();
}

#[test]
fn frequency_reads_block_and_decodes() {
    let block = encode_frequency::<()>(156.25e6, DEFAULT_XTAL_HZ).unwrap();
    let mock = I2cMock::new(&read_block(&block));
    let mut driver = Si57x::new_i2c(mock);
    let hz = driver.frequency().unwrap();
    assert!((hz - 156.25e6).abs() < 1.0);
    driver.free().free().done();
}

#[test]
fn calibrate_xtal_updates_reference() {
    let block = encode_frequency::<()>(100.0e6, DEFAULT_XTAL_HZ).unwrap();
    let true_xtal = 114.2849e6;
    let measured = decode_frequency(&block, true_xtal);

    let mock = I2cMock::new(&read_block(&block));
    let mut driver = Si57x::new_i2c(mock);
    let xtal = driver.calibrate_xtal(measured).unwrap();
    assert!(((xtal - true_xtal) / true_xtal).abs() < 1e-6);
    assert_eq!(driver.xtal_hz(), xtal);
    driver.free().free().done();
}

#[test]
fn address_can_be_changed() {
    let expectations = [I2cTrans::write(0x49, vec![135, 0x80])];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    driver.set_address(0x49);
    assert_eq!(driver.address(), 0x49);
    driver.reset().unwrap();
    driver.free().free().done();
}

#[test]
fn bus_fault_stops_frequency_write() {
    let block = encode_frequency::<()>(100.0e6, DEFAULT_XTAL_HZ).unwrap();
    let expectations = [
        I2cTrans::write(DEFAULT_ADDRESS, vec![7, block.0[0]]),
        I2cTrans::write(DEFAULT_ADDRESS, vec![8, block.0[1]]).with_error(ErrorKind::Other),
    ];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    assert_eq!(driver.set_frequency(100.0e6), Err(Error::Transport(ErrorKind::Other)));
    driver.free().free().done();
}

#[test]
fn bus_fault_keeps_crystal_frequency() {
    let expectations = [I2cTrans::write_read(DEFAULT_ADDRESS, vec![7], vec![0x00]).with_error(ErrorKind::Other)];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    assert_eq!(driver.calibrate_xtal(100.0e6), Err(Error::Transport(ErrorKind::Other)));
    assert_eq!(driver.xtal_hz(), DEFAULT_XTAL_HZ);
    driver.free().free().done();
}

#[test]
fn non_positive_measurement_is_rejected() {
    let expectations: [I2cTrans; 0] = [];
    let mock = I2cMock::new(&expectations);
    let mut driver = Si57x::new_i2c(mock);
    assert_eq!(driver.calibrate_xtal(0.0), Err(Error::OutOfRange));
    assert_eq!(driver.calibrate_xtal(-1.0e6), Err(Error::OutOfRange));
    assert_eq!(driver.calibrate_xtal(f64::NAN), Err(Error::OutOfRange));
    assert_eq!(driver.xtal_hz(), DEFAULT_XTAL_HZ);
    driver.free().free().done();
}
