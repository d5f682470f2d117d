use crate::{Error, Result};
use crate::sys::Driver;
use crate::config::ConvConfig;
use crate::iio::{Attribute, Channel, ChannelType, DeviceDescriptor, Direction, IioDevice, Shared, Value};
use crate::params::{CapFilter, VtFilter};
use crate::regs::ad7746 as regs;

use super::Device;
use super::channel::capdac_offset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    Raw,
    Scale,
    Offset,
    SamplingFrequency,
}

/// Positions in [`CHANNELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chan {
    Vin,
    VinVdd,
    TempInt,
    TempExt,
    Cin1,
    Cin1Diff,
    Cin2,
    Cin2Diff,
}

static VIN_ATTRS: [Attribute<Accessor>; 3] = [
    Attribute::read_only("raw", Shared::Separate, Accessor::Raw),
    Attribute::read_only("scale", Shared::ByType, Accessor::Scale),
    Attribute::read_write("sampling_frequency", Shared::ByType,
        Accessor::SamplingFrequency, Accessor::SamplingFrequency),
];

static CIN_ATTRS: [Attribute<Accessor>; 6] = [
    Attribute::read_only("raw", Shared::Separate, Accessor::Raw),
    Attribute::read_only("scale", Shared::ByType, Accessor::Scale),
    Attribute::read_only("offset", Shared::Separate, Accessor::Offset),
    Attribute::read_write("sampling_frequency", Shared::ByType,
        Accessor::SamplingFrequency, Accessor::SamplingFrequency),
    Attribute::new("calibscale", Shared::Separate),
    Attribute::new("calibbias", Shared::ByType),
];

static TEMP_ATTRS: [Attribute<Accessor>; 1] = [
    Attribute::read_only("input", Shared::Separate, Accessor::Raw),
];

const fn input(ch_type: ChannelType, index: u16, address: u32,
               attributes: &'static [Attribute<Accessor>]) -> Channel<Accessor> {
    Channel {
        ch_type,
        index,
        index2: None,
        direction: Direction::Input,
        differential: false,
        indexed: true,
        extend_name: None,
        address,
        scan_type: None,
        attributes,
    }
}

const fn differential(index: u16, index2: u16, address: u32) -> Channel<Accessor> {
    Channel {
        index2: Some(index2),
        differential: true,
        ..input(ChannelType::Capacitance, index, address, &CIN_ATTRS)
    }
}

const CIN2: u32 = regs::CapSetup::Cin2.bits() as u32;
const CAPDIFF: u32 = regs::CapSetup::CapDiff.bits() as u32;

pub static CHANNELS: [Channel<Accessor>; 8] = [
    input(ChannelType::Voltage, 0, 0b11, &VIN_ATTRS),
    Channel {
        extend_name: Some("supply"),
        ..input(ChannelType::Voltage, 1, 0b10, &VIN_ATTRS)
    },
    input(ChannelType::Temp, 0, 0b00, &TEMP_ATTRS),
    input(ChannelType::Temp, 1, 0b01, &TEMP_ATTRS),
    input(ChannelType::Capacitance, 0, 0, &CIN_ATTRS),
    differential(0, 2, CAPDIFF),
    input(ChannelType::Capacitance, 1, CIN2, &CIN_ATTRS),
    differential(1, 3, CAPDIFF | CIN2),
];

pub static DESCRIPTOR: DeviceDescriptor<Accessor> = DeviceDescriptor {
    channels: &CHANNELS,
    attributes: &[],
    debug_registers: true,
};

impl<D: Driver> Device<D> {
    fn show_scale(&self, channel: &Channel<Accessor>) -> Result<Value> {
        match channel.ch_type {
            // 8.192 pF / 2^24
            ChannelType::Capacitance => Ok(Value::IntPlusNano(0, 488)),
            // 1170 mV / 2^23
            ChannelType::Voltage => Ok(Value::FractionalLog2(1170, 23)),
            other => Err(Error::invalid(format!("no scale for {:?} channel", other))),
        }
    }

    fn show_offset(&self, channel: &Channel<Accessor>) -> Result<Value> {
        let code = self.state.capdac.code(channel.index as usize, channel.differential)?;
        Ok(Value::Int(capdac_offset(code)))
    }

    fn show_sampling_frequency(&self, channel: &Channel<Accessor>) -> Result<Value> {
        let config = &self.state.setup.config;
        let rate = match channel.ch_type {
            ChannelType::Capacitance => config.cap_filter.rate(),
            ChannelType::Voltage => config.vt_filter.rate(),
            other => return Err(Error::invalid(format!("no filter for {:?} channel", other))),
        };
        Ok(Value::Int(rate.update_rate_hz as i32))
    }

    fn store_sampling_frequency(&mut self, channel: &Channel<Accessor>, text: &str) -> Result<()> {
        let hz = Value::parse_int(text)?;
        let unmatched = || Error::invalid(format!("no {:?} filter runs at {} Hz", channel.ch_type, hz));
        let hz = u32::try_from(hz).map_err(|_| unmatched())?;
        let config = self.state.setup.config;
        let config = match channel.ch_type {
            ChannelType::Capacitance => ConvConfig {
                cap_filter: CapFilter::from_update_rate(hz).ok_or_else(unmatched)?,
                ..config
            },
            ChannelType::Voltage => ConvConfig {
                vt_filter: VtFilter::from_update_rate(hz).ok_or_else(unmatched)?,
                ..config
            },
            other => return Err(Error::invalid(format!("no filter for {:?} channel", other))),
        };
        self.update_config(config)
    }
}

impl<D: Driver> IioDevice for Device<D> {
    type Accessor = Accessor;

    fn descriptor(&self) -> &'static DeviceDescriptor<Accessor> {
        &DESCRIPTOR
    }

    fn show(&mut self, accessor: Accessor, channel: Option<&Channel<Accessor>>) -> Result<Value> {
        let channel = channel.ok_or_else(|| Error::invalid("converter has no device attributes"))?;
        match accessor {
            Accessor::Raw => Ok(Value::Int(self.read_raw(channel)?)),
            Accessor::Scale => self.show_scale(channel),
            Accessor::Offset => self.show_offset(channel),
            Accessor::SamplingFrequency => self.show_sampling_frequency(channel),
        }
    }

    fn store(&mut self, accessor: Accessor, channel: Option<&Channel<Accessor>>, text: &str)
            -> Result<()> {
        let channel = channel.ok_or_else(|| Error::invalid("converter has no device attributes"))?;
        match accessor {
            Accessor::SamplingFrequency => self.store_sampling_frequency(channel, text),
            other => Err(Error::invalid(format!("{:?} is not writable", other))),
        }
    }

    fn debug_reg_read(&mut self, reg: u32) -> Result<u32> {
        Ok(self.read_register(reg)? as u32)
    }

    fn debug_reg_write(&mut self, reg: u32, value: u32) -> Result<()> {
        self.write_register(reg, value)
    }
}
