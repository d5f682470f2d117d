//! ADPD410x multimodal optical front-end.
//!
//! Only the sequencer controls needed by the CN0552 board are driven: time-slot period, the
//! number of active time slots and the operating mode. Everything else is reachable through
//! the raw register accessors.

use crate::{Error, Result};
use crate::sys::Driver;
use crate::params::{ClockOption, OpMode, Timeslot};
use crate::regs::adpd410x::{self as regs, SysCtl};

mod iio;

pub use iio::{Accessor, DESCRIPTOR};

/// 7-bit I2C address.
pub const I2C_ADDRESS: u16 = 0x24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitParams {
    pub clk_opt: ClockOption,
    /// Frequency of the external low-frequency oscillator, in Hz. Only used when `clk_opt`
    /// selects an external LFO.
    pub ext_lfo_freq: u32,
}

#[derive(Debug)]
pub struct Device<D: Driver> {
    driver: D,
    params: InitParams,
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
impl Device<crate::sys::imp::I2cDriver> {
    pub fn open(bus_path: &str, slave_addr: u16, params: &InitParams)
            -> Result<Device<crate::sys::imp::I2cDriver>> {
        use crate::sys::imp::{AddressWidth, I2cDriver};
        let driver = I2cDriver::new(bus_path, slave_addr, AddressWidth::U16)?;
        Device::new(driver, params)
    }
}

impl<D: Driver> Device<D> {
    /// Reset the front-end and start its oscillators as selected by `params.clk_opt`.
    pub fn new(driver: D, params: &InitParams) -> Result<Device<D>> {
        let mut device = Device { driver, params: *params };
        device.reset()?;
        let chip_id = device.reg_read(regs::ADDR_CHIP_ID)?;
        log::debug!("chip id {:#06x}", chip_id);
        device.start_clocks()?;
        Ok(device)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn params(&self) -> &InitParams {
        &self.params
    }

    pub fn reset(&mut self) -> Result<()> {
        log::debug!("reset()");
        self.reg_write(regs::ADDR_SYS_CTL, SysCtl::SwReset.bits())?;
        self.driver.delay_ms(1);
        Ok(())
    }

    fn start_clocks(&mut self) -> Result<()> {
        let clk_opt = self.params.clk_opt;
        let mut sys_ctl = SysCtl::empty();
        if clk_opt.external_lfo() {
            sys_ctl.insert(SysCtl::LfoscExt);
        } else {
            sys_ctl.insert(SysCtl::LfoscEn | SysCtl::LfoscSel);
        }
        if clk_opt.external_hfo() {
            sys_ctl.insert(SysCtl::HfoscExt);
        } else {
            sys_ctl.insert(SysCtl::HfoscEn);
        }
        log::debug!("start_clocks({:?}) = {:?}", clk_opt, sys_ctl);
        self.reg_write(regs::ADDR_SYS_CTL, sys_ctl.bits())
    }

    /// Read a 16-bit register.
    pub fn reg_read(&self, addr: u16) -> Result<u16> {
        let mut bytes = [0u8; 2];
        self.driver.read_register(regs::I2C_LONG_ADDRESS | (addr & regs::ADDR_MASK),
                                  &mut bytes[..])?;
        let data = u16::from_be_bytes(bytes);
        log::trace!("reg_read({:#06x}) = {:#06x}", addr, data);
        Ok(data)
    }

    /// Write a 16-bit register.
    pub fn reg_write(&self, addr: u16, data: u16) -> Result<()> {
        log::trace!("reg_write({:#06x}, {:#06x})", addr, data);
        self.driver.write_register(regs::I2C_LONG_ADDRESS | (addr & regs::ADDR_MASK),
                                   &data.to_be_bytes())
    }

    /// Replace the bits of `addr` selected by `mask` with those of `data`.
    pub fn reg_write_mask(&self, addr: u16, data: u16, mask: u16) -> Result<()> {
        let value = self.reg_read(addr)?;
        self.reg_write(addr, (value & !mask) | (data & mask))
    }

    fn read_sys_ctl(&self) -> Result<SysCtl> {
        Ok(SysCtl::from_bits_retain(self.reg_read(regs::ADDR_SYS_CTL)?))
    }

    /// Frequency of the clock that times the sequencer, in Hz.
    pub fn lfo_freq(&self) -> Result<u32> {
        if self.params.clk_opt.external_lfo() {
            return Ok(self.params.ext_lfo_freq)
        }
        if self.read_sys_ctl()?.contains(SysCtl::LfoscSel) {
            Ok(regs::LFOSC_FREQ_1M)
        } else {
            Ok(regs::LFOSC_FREQ_32K)
        }
    }

    /// Program the time-slot period so that the sequence repeats `freq` times per second.
    pub fn set_sampling_freq(&mut self, freq: u32) -> Result<()> {
        log::debug!("set_sampling_freq({})", freq);
        if freq == 0 {
            return Err(Error::invalid("sampling frequency of 0 Hz"))
        }
        let lfo_freq = self.lfo_freq()?;
        let period = lfo_freq / freq;
        if period == 0 {
            return Err(Error::invalid(format!("{} Hz is above the {} Hz oscillator", freq, lfo_freq)))
        }
        self.reg_write(regs::ADDR_TS_FREQ, period as u16)?;
        self.reg_write(regs::ADDR_TS_FREQH, ((period >> 16) & regs::TS_FREQH_MASK) as u16)
    }

    /// Enable time slots A through `timeslot`.
    pub fn set_last_timeslot(&mut self, timeslot: Timeslot) -> Result<()> {
        log::debug!("set_last_timeslot({:?})", timeslot);
        self.reg_write_mask(regs::ADDR_OPMODE,
                            timeslot.code() << regs::OPMODE_TIMESLOT_EN_SHIFT,
                            regs::OPMODE_TIMESLOT_EN_MASK)
    }

    pub fn set_opmode(&mut self, mode: OpMode) -> Result<()> {
        log::debug!("set_opmode({:?})", mode);
        self.reg_write_mask(regs::ADDR_OPMODE, mode.code(), regs::OPMODE_OP_MODE_MASK)
    }

    /// Raw register read for diagnostics.
    pub fn read_register(&mut self, addr: u32) -> Result<u16> {
        self.reg_read(register_address(addr)?)
    }

    /// Raw register write for diagnostics.
    pub fn write_register(&mut self, addr: u32, value: u32) -> Result<()> {
        let value = u16::try_from(value)
            .map_err(|_| Error::invalid(format!("register value {:#x}", value)))?;
        self.reg_write(register_address(addr)?, value)
    }
}

fn register_address(addr: u32) -> Result<u16> {
    match u16::try_from(addr) {
        Ok(addr) if addr <= regs::ADDR_MASK => Ok(addr),
        _ => Err(Error::invalid(format!("register address {:#x}", addr))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sys::mock::{Event, MockDriver};

    fn device(clk_opt: ClockOption) -> Device<MockDriver> {
        let params = InitParams { clk_opt, ext_lfo_freq: 10_000_000 };
        let device = Device::new(MockDriver::new(), &params).unwrap();
        device.driver().clear_events();
        device
    }

    #[test]
    fn test_init_sequence() {
        let driver = MockDriver::new();
        driver.preload(0x8008, &[0x01, 0xc2]);
        let device = Device::new(driver, &InitParams::default()).unwrap();
        assert_eq!(device.driver().events(), [
            Event::Write { addr: 0x800f, data: vec![0x80, 0x00] },
            Event::Delay { ms: 1 },
            Event::Read { addr: 0x8008, len: 2 },
            Event::Write { addr: 0x800f, data: vec![0x00, 0x07] },
        ]);
    }

    #[test]
    fn test_init_external_clocks() {
        let device = device(ClockOption::ExtLfoExtHfo);
        assert_eq!(device.driver().peek(0x800f), [0x00, 0x18]);
    }

    #[test]
    fn test_sampling_freq_internal_lfo() {
        let mut device = device(ClockOption::IntLfoIntHfo);
        device.set_sampling_freq(100).unwrap();
        assert_eq!(device.driver().writes(), [
            (0x800d, vec![0x27, 0x10]),
            (0x800e, vec![0x00, 0x00]),
        ]);
        // 32 kHz oscillator selected
        device.driver().preload(0x800f, &[0x00, 0x06]);
        device.driver().clear_events();
        device.set_sampling_freq(1).unwrap();
        assert_eq!(device.driver().writes(), [
            (0x800d, vec![0x80, 0x00]),
            (0x800e, vec![0x00, 0x00]),
        ]);
    }

    #[test]
    fn test_sampling_freq_external_lfo() {
        let mut device = device(ClockOption::ExtLfoIntHfo);
        device.set_sampling_freq(1).unwrap();
        // 10 MHz = 0x989680; the high register keeps 7 bits
        assert_eq!(device.driver().events(), [
            Event::Write { addr: 0x800d, data: vec![0x96, 0x80] },
            Event::Write { addr: 0x800e, data: vec![0x00, 0x18] },
        ]);
    }

    #[test]
    fn test_sampling_freq_rejects_zero() {
        let mut device = device(ClockOption::IntLfoIntHfo);
        assert!(matches!(device.set_sampling_freq(0), Err(Error::InvalidArgument(_))));
        assert!(matches!(device.set_sampling_freq(2_000_000), Err(Error::InvalidArgument(_))));
        assert!(device.driver().writes().is_empty());
    }

    #[test]
    fn test_opmode_register_fields() {
        let mut device = device(ClockOption::IntLfoIntHfo);
        device.driver().preload(0x8010, &[0x03, 0x01]);
        device.set_last_timeslot(Timeslot::L).unwrap();
        assert_eq!(device.driver().peek(0x8010), [0x0b, 0x01]);
        device.set_opmode(OpMode::Standby).unwrap();
        assert_eq!(device.driver().peek(0x8010), [0x0b, 0x00]);
        device.set_last_timeslot(Timeslot::A).unwrap();
        device.set_opmode(OpMode::Go).unwrap();
        assert_eq!(device.driver().peek(0x8010), [0x00, 0x01]);
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut device = device(ClockOption::IntLfoIntHfo);
        device.driver().fail_next_read(0x8010, libc::EREMOTEIO);
        let error = device.set_opmode(OpMode::Go).unwrap_err();
        assert_eq!(error.errno(), -libc::EREMOTEIO);
        assert!(device.driver().writes().is_empty());
    }

    #[test]
    fn test_debug_register_access() {
        let mut device = device(ClockOption::IntLfoIntHfo);
        device.write_register(0x0120, 0xbeef).unwrap();
        assert_eq!(device.read_register(0x0120).unwrap(), 0xbeef);
        assert!(matches!(device.read_register(0x8000), Err(Error::InvalidArgument(_))));
        assert!(matches!(device.write_register(0x0120, 0x10000), Err(Error::InvalidArgument(_))));
    }
}
