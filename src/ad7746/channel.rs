use crate::{Error, Result};
use crate::sys::Driver;
use crate::config::ConvConfig;
use crate::iio::{Channel, ChannelType};
use crate::params::{Mode, VtSource};
use crate::regs::ad7746 as regs;

use super::Device;

/// Offset represented by one CAPDAC code, in attofarads.
pub const CAPDAC_OFFSET_PER_CODE: i32 = 338646;

/// Convert an offset-binary 24-bit conversion result to a signed value.
pub fn zero_centered(raw: u32) -> i32 {
    (raw & 0xffffff) as i32 - regs::DATA_ZERO_CODE
}

/// Milli-degrees Celsius from a zero-centered temperature conversion.
///
/// The transfer function is `T = ((code / 2048) - 4096) * 1000`, which reduces to
/// `value * 125 / 256` once the code is zero-centered.
pub fn scale_temperature(value: i32) -> i32 {
    value * 125 / 256
}

/// The supply monitor sees VDD through a 1:6 divider.
pub fn scale_voltage(value: i32, source: VtSource) -> i32 {
    match source {
        VtSource::VddMonitor => value * 6,
        _ => value,
    }
}

pub fn capdac_offset(code: u8) -> i32 {
    (code & regs::CAPDAC_DACP_MASK) as i32 * CAPDAC_OFFSET_PER_CODE
}

impl<D: Driver> Device<D> {
    /// Program the converter to sample `channel` and return how long to wait, in milliseconds,
    /// before a conversion result is valid.
    ///
    /// Exactly one front-end is left enabled. Registers that already hold the required value are
    /// not written; in particular, the CAPDACs are only reprogrammed when switching to
    /// a capacitance channel with a different index.
    pub fn select_channel<A>(&mut self, channel: &Channel<A>) -> Result<u32> {
        let mut cap = self.state.setup.cap;
        let mut vt = self.state.setup.vt;
        match channel.ch_type {
            ChannelType::Capacitance => {
                let selector = regs::CapSetup::from_bits_truncate(channel.address as u8);
                cap.enabled = true;
                cap.cin2 = selector.contains(regs::CapSetup::Cin2);
                cap.differential = selector.contains(regs::CapSetup::CapDiff);
                vt.enabled = false;
                self.select_capdac(channel.index)?;
                // disable the other front-end before enabling this one
                self.update_vt(vt)?;
                self.update_cap(cap)?;
            }
            ChannelType::Voltage | ChannelType::Temp => {
                let source = u8::try_from(channel.address)
                    .map_err(|_| Error::invalid(format!("VTMD selector {:#x}", channel.address)))
                    .and_then(VtSource::from_code)?;
                vt.enabled = true;
                vt.source = source;
                cap.enabled = false;
                self.update_cap(cap)?;
                self.update_vt(vt)?;
            }
            other => return Err(Error::invalid(format!("{:?} channel", other))),
        }
        Ok(self.settle_ms())
    }

    /// Settling time of the active filter of whichever front-end is enabled.
    fn settle_ms(&self) -> u32 {
        let setup = &self.state.setup;
        let rate = if setup.cap.enabled {
            setup.config.cap_filter.rate()
        } else {
            setup.config.vt_filter.rate()
        };
        rate.settle_ms as u32
    }

    /// Run a single conversion on `channel` and return the scaled result: milli-degrees Celsius
    /// for temperature channels, signed codes for voltage and capacitance channels.
    pub fn read_raw<A>(&mut self, channel: &Channel<A>) -> Result<i32> {
        let delay_ms = self.select_channel(channel)?;
        self.update_config(ConvConfig { mode: Mode::Single, ..self.state.setup.config })?;
        log::trace!("waiting {} ms for {:?} {} to settle", delay_ms, channel.ch_type, channel.index);
        self.driver.delay_ms(delay_ms);
        match channel.ch_type {
            ChannelType::Temp =>
                Ok(scale_temperature(zero_centered(self.get_vt_data()?))),
            ChannelType::Voltage =>
                Ok(scale_voltage(zero_centered(self.get_vt_data()?), self.state.setup.vt.source)),
            ChannelType::Capacitance =>
                Ok(zero_centered(self.get_cap_data()?)),
            other => Err(Error::invalid(format!("{:?} channel", other))),
        }
    }
}
