//! AD7746 24-bit capacitance-to-digital converter with voltage and temperature inputs.
//!
//! The converter has a single sigma-delta core shared by two front-ends: the capacitance inputs
//! (CIN1/CIN2, single-ended or differential) and the voltage/temperature inputs. [`Device`]
//! keeps a mirror of the last configuration it programmed, so that switching between channels
//! only touches the registers that actually change.

use crate::{Error, Result};
use crate::sys::Driver;
use crate::config::{CapDacTable, CapSetup, ConvConfig, ExcSetup, InitParams, Setup, VtSetup};
use crate::regs::ad7746::{self as regs, Status};

mod channel;
mod iio;

pub use channel::{zero_centered, scale_temperature, scale_voltage, capdac_offset};
pub use iio::{Accessor, Chan, DESCRIPTOR, CHANNELS};

/// 7-bit I2C address; the AD7746 has no address pins.
pub const I2C_ADDRESS: u16 = 0x48;

/// The mirror of the converter's configuration registers, as last accepted by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub setup: Setup,
    pub capdac: CapDacTable,
    /// Capacitance channel whose CAPDAC codes are currently programmed.
    pub capdac_selected: Option<u16>,
}

#[derive(Debug)]
pub struct Device<D: Driver> {
    driver: D,
    state: State,
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
impl Device<crate::sys::imp::I2cDriver> {
    pub fn open(bus_path: &str, slave_addr: u16, params: &InitParams)
            -> Result<Device<crate::sys::imp::I2cDriver>> {
        use crate::sys::imp::{AddressWidth, I2cDriver};
        let driver = I2cDriver::new(bus_path, slave_addr, AddressWidth::U8)?;
        Device::new(driver, params)
    }
}

impl<D: Driver> Device<D> {
    /// Reset the converter and program it with `params.setup`.
    pub fn new(driver: D, params: &InitParams) -> Result<Device<D>> {
        let mut device = Device {
            driver,
            state: State {
                setup: params.setup,
                capdac: params.capdac,
                capdac_selected: None,
            },
        };
        device.reset()?;
        device.set_cap(params.setup.cap)?;
        device.set_vt(params.setup.vt)?;
        device.set_exc(params.setup.exc)?;
        device.set_config(params.setup.config)?;
        Ok(device)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn reset(&mut self) -> Result<()> {
        log::debug!("reset()");
        self.driver.write_register(regs::CMD_RESET as u16, &[])?;
        // the datasheet asks for 200μs before the next access; the delay primitive is coarser
        self.driver.delay_ms(1);
        self.state.capdac_selected = None;
        Ok(())
    }

    fn read_u8(&self, addr: u8) -> Result<u8> {
        let mut bytes = [0u8; 1];
        self.driver.read_register(addr as u16, &mut bytes[..])?;
        log::trace!("read_u8({:#04x}) = {:#04x}", addr, bytes[0]);
        Ok(bytes[0])
    }

    fn write_u8(&self, addr: u8, data: u8) -> Result<()> {
        log::trace!("write_u8({:#04x}, {:#04x})", addr, data);
        self.driver.write_register(addr as u16, &[data])
    }

    fn read_u24(&self, addr: u8) -> Result<u32> {
        let mut bytes = [0u8; 3];
        self.driver.read_register(addr as u16, &mut bytes[..])?;
        let data = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
        log::trace!("read_u24({:#04x}) = {:#08x}", addr, data);
        Ok(data)
    }

    pub fn read_status(&mut self) -> Result<Status> {
        let value = Status::from_bits_retain(self.read_u8(regs::ADDR_STATUS)?);
        log::debug!("read_status() = {:?}", value);
        Ok(value)
    }

    pub fn set_cap(&mut self, cap: CapSetup) -> Result<()> {
        log::debug!("set_cap({:?})", cap);
        self.write_u8(regs::ADDR_CAP_SETUP, cap.register())?;
        self.state.setup.cap = cap;
        Ok(())
    }

    pub fn set_vt(&mut self, vt: VtSetup) -> Result<()> {
        log::debug!("set_vt({:?})", vt);
        self.write_u8(regs::ADDR_VT_SETUP, vt.register())?;
        self.state.setup.vt = vt;
        Ok(())
    }

    pub fn set_exc(&mut self, exc: ExcSetup) -> Result<()> {
        log::debug!("set_exc({:?})", exc);
        self.write_u8(regs::ADDR_EXC_SETUP, exc.register())?;
        self.state.setup.exc = exc;
        Ok(())
    }

    pub fn set_config(&mut self, config: ConvConfig) -> Result<()> {
        log::debug!("set_config({:?})", config);
        self.write_u8(regs::ADDR_CONFIG, config.register())?;
        self.state.setup.config = config;
        Ok(())
    }

    pub fn set_cap_dac_a(&mut self, enable: bool, code: u8) -> Result<()> {
        log::debug!("set_cap_dac_a({:?}, {:#04x})", enable, code);
        self.write_u8(regs::ADDR_CAPDAC_A, capdac_register(enable, code))
    }

    pub fn set_cap_dac_b(&mut self, enable: bool, code: u8) -> Result<()> {
        log::debug!("set_cap_dac_b({:?}, {:#04x})", enable, code);
        self.write_u8(regs::ADDR_CAPDAC_B, capdac_register(enable, code))
    }

    /// Write the capacitance input setup only if it differs from what was last programmed.
    fn update_cap(&mut self, cap: CapSetup) -> Result<()> {
        if self.state.setup.cap == cap {
            log::trace!("cap setup unchanged");
            return Ok(())
        }
        self.set_cap(cap)
    }

    /// Write the voltage/temperature input setup only if it differs from what was last programmed.
    fn update_vt(&mut self, vt: VtSetup) -> Result<()> {
        if self.state.setup.vt == vt {
            log::trace!("vt setup unchanged");
            return Ok(())
        }
        self.set_vt(vt)
    }

    /// Write the configuration register only if it differs from what was last programmed.
    fn update_config(&mut self, config: ConvConfig) -> Result<()> {
        if self.state.setup.config == config {
            log::trace!("config unchanged");
            return Ok(())
        }
        self.set_config(config)
    }

    /// Program both CAPDACs with the codes for capacitance channel `index`, unless they already
    /// hold them.
    fn select_capdac(&mut self, index: u16) -> Result<()> {
        if self.state.capdac_selected == Some(index) {
            log::trace!("capdac {} already selected", index);
            return Ok(())
        }
        let code_a = self.state.capdac.code(index as usize, false)?;
        let code_b = self.state.capdac.code(index as usize, true)?;
        self.set_cap_dac_a(true, code_a)?;
        self.set_cap_dac_b(true, code_b)?;
        self.state.capdac_selected = Some(index);
        Ok(())
    }

    pub fn get_cap_data(&mut self) -> Result<u32> {
        self.read_u24(regs::ADDR_CAP_DATA_H)
    }

    pub fn get_vt_data(&mut self) -> Result<u32> {
        self.read_u24(regs::ADDR_VT_DATA_H)
    }

    /// Raw register read for diagnostics.
    pub fn read_register(&mut self, addr: u32) -> Result<u8> {
        self.read_u8(register_address(addr)?)
    }

    /// Raw register write for diagnostics. The configuration mirror is not updated.
    pub fn write_register(&mut self, addr: u32, value: u32) -> Result<()> {
        let value = u8::try_from(value)
            .map_err(|_| Error::invalid(format!("register value {:#x}", value)))?;
        self.write_u8(register_address(addr)?, value)
    }
}

fn capdac_register(enable: bool, code: u8) -> u8 {
    (if enable { regs::CAPDAC_DACEN } else { 0 }) | (code & regs::CAPDAC_DACP_MASK)
}

fn register_address(addr: u32) -> Result<u8> {
    match u8::try_from(addr) {
        Ok(addr) if addr <= regs::ADDR_VOLT_GAIN_H + 1 => Ok(addr),
        _ => Err(Error::invalid(format!("register address {:#x}", addr))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sys::mock::{Event, MockDriver};

    fn params() -> InitParams {
        InitParams {
            setup: Setup::default(),
            capdac: CapDacTable { codes: [[0x11, 0x12], [0x21, 0x22]] },
        }
    }

    #[test]
    fn test_init_sequence() {
        let device = Device::new(MockDriver::new(), &params()).unwrap();
        assert_eq!(device.driver().events(), [
            Event::Write { addr: 0xbf, data: vec![] },
            Event::Delay { ms: 1 },
            Event::Write { addr: 0x07, data: vec![0xc1] },
            Event::Write { addr: 0x08, data: vec![0x81] },
            Event::Write { addr: 0x09, data: vec![0x0b] },
            Event::Write { addr: 0x0a, data: vec![0x01] },
        ]);
        assert_eq!(device.state().setup, Setup::default());
        assert_eq!(device.state().capdac_selected, None);
    }

    #[test]
    fn test_init_aborts_on_bus_failure() {
        let driver = MockDriver::new();
        driver.fail_next_write(0x08, libc::ENXIO);
        let error = Device::new(driver, &params()).unwrap_err();
        assert_eq!(error.errno(), -libc::ENXIO);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let mut device = Device::new(MockDriver::new(), &params()).unwrap();
        device.driver().fail_next_write(0x07, libc::EIO);
        let cap = CapSetup { enabled: false, ..CapSetup::default() };
        assert!(device.set_cap(cap).is_err());
        assert_eq!(device.state().setup.cap, CapSetup::default());
    }

    #[test]
    fn test_data_registers_are_big_endian() {
        let mut device = Device::new(MockDriver::new(), &params()).unwrap();
        device.driver().preload(0x01, &[0x81, 0x02, 0x03]);
        device.driver().preload(0x04, &[0x7f, 0xff, 0xfe]);
        assert_eq!(device.get_cap_data().unwrap(), 0x810203);
        assert_eq!(device.get_vt_data().unwrap(), 0x7ffffe);
    }

    #[test]
    fn test_capdac_register_encoding() {
        assert_eq!(capdac_register(true, 0x05), 0x85);
        assert_eq!(capdac_register(true, 0xff), 0xff);
        assert_eq!(capdac_register(false, 0x85), 0x05);
    }

    #[test]
    fn test_debug_register_access() {
        let mut device = Device::new(MockDriver::new(), &params()).unwrap();
        device.driver().preload(0x00, &[0x07]);
        assert_eq!(device.read_register(0x00).unwrap(), 0x07);
        assert_eq!(device.read_status().unwrap(), Status::RdyCap | Status::RdyVt | Status::Rdy);
        device.write_register(0x0d, 0x80).unwrap();
        assert_eq!(device.driver().peek(0x0d), [0x80]);
        assert!(matches!(device.read_register(0x40), Err(Error::InvalidArgument(_))));
        assert!(matches!(device.write_register(0x0d, 0x100), Err(Error::InvalidArgument(_))));
    }
}
