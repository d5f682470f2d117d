use crate::{Error, Result};
use crate::sys::Driver;
use crate::iio::{Attribute, Channel, DeviceDescriptor, IioDevice, Shared, Value};
use crate::params::{OpMode, Timeslot};

use super::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessor {
    SamplingFrequency,
    LastTimeslot,
    OperationMode,
}

pub static DESCRIPTOR: DeviceDescriptor<Accessor> = DeviceDescriptor {
    channels: &[],
    attributes: &[
        Attribute::write_only("sampling_frequency", Shared::Separate, Accessor::SamplingFrequency),
        Attribute::write_only("last_timeslot", Shared::Separate, Accessor::LastTimeslot),
        Attribute::write_only("operation_mode", Shared::Separate, Accessor::OperationMode),
    ],
    debug_registers: true,
};

fn parse_u32(text: &str) -> Result<u32> {
    let value = Value::parse_int(text)?;
    u32::try_from(value).map_err(|_| Error::invalid(format!("{} is negative", value)))
}

impl<D: Driver> IioDevice for Device<D> {
    type Accessor = Accessor;

    fn descriptor(&self) -> &'static DeviceDescriptor<Accessor> {
        &DESCRIPTOR
    }

    fn show(&mut self, accessor: Accessor, _channel: Option<&Channel<Accessor>>) -> Result<Value> {
        Err(Error::invalid(format!("{:?} is not readable", accessor)))
    }

    fn store(&mut self, accessor: Accessor, _channel: Option<&Channel<Accessor>>, text: &str)
            -> Result<()> {
        let value = parse_u32(text)?;
        match accessor {
            Accessor::SamplingFrequency => self.set_sampling_freq(value),
            Accessor::LastTimeslot => self.set_last_timeslot(Timeslot::from_code(value)?),
            Accessor::OperationMode => self.set_opmode(OpMode::from_code(value)?),
        }
    }

    fn debug_reg_read(&mut self, reg: u32) -> Result<u32> {
        Ok(self.read_register(reg)? as u32)
    }

    fn debug_reg_write(&mut self, reg: u32, value: u32) -> Result<()> {
        self.write_register(reg, value)
    }
}
