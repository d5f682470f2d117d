use std::fmt::Debug;

use crate::{Access, Error, Result};
use super::{Attribute, Channel, DeviceDescriptor, Value};

/// A device whose attributes can be served through its static descriptor.
///
/// Accessors are always invoked with the channel the request came through, even for shared
/// attributes, so per-channel parameters stay correct.
pub trait IioDevice {
    type Accessor: Copy + Debug + 'static;

    fn descriptor(&self) -> &'static DeviceDescriptor<Self::Accessor>;

    fn show(&mut self, accessor: Self::Accessor, channel: Option<&Channel<Self::Accessor>>)
        -> Result<Value>;

    fn store(&mut self, accessor: Self::Accessor, channel: Option<&Channel<Self::Accessor>>,
             text: &str) -> Result<()>;

    fn debug_reg_read(&mut self, _reg: u32) -> Result<u32> {
        Err(Error::NotSupported { attribute: "debug_reg", access: Access::Read })
    }

    fn debug_reg_write(&mut self, _reg: u32, _value: u32) -> Result<()> {
        Err(Error::NotSupported { attribute: "debug_reg", access: Access::Write })
    }
}

fn lookup<A>(attr: Option<&'static Attribute<A>>, name: &str) -> Result<&'static Attribute<A>> {
    attr.ok_or_else(|| Error::invalid(format!("no attribute `{}`", name)))
}

fn show_accessor<A: Copy>(attr: &'static Attribute<A>) -> Result<A> {
    attr.show.ok_or(Error::NotSupported { attribute: attr.name, access: Access::Read })
}

fn store_accessor<A: Copy>(attr: &'static Attribute<A>) -> Result<A> {
    attr.store.ok_or(Error::NotSupported { attribute: attr.name, access: Access::Write })
}

pub fn read_channel_attr<D: IioDevice>(device: &mut D, channel: &Channel<D::Accessor>,
                                       name: &str) -> Result<String> {
    let attr = lookup(channel.attribute(name), name)?;
    let accessor = show_accessor(attr)?;
    log::trace!("show {:?} via {}", accessor, channel.attribute_path(attr));
    Ok(device.show(accessor, Some(channel))?.to_string())
}

/// Returns the number of bytes consumed.
pub fn write_channel_attr<D: IioDevice>(device: &mut D, channel: &Channel<D::Accessor>,
                                        name: &str, text: &str) -> Result<usize> {
    let attr = lookup(channel.attribute(name), name)?;
    let accessor = store_accessor(attr)?;
    log::trace!("store {:?} via {} = {:?}", accessor, channel.attribute_path(attr), text);
    device.store(accessor, Some(channel), text)?;
    Ok(text.len())
}

pub fn read_device_attr<D: IioDevice>(device: &mut D, name: &str) -> Result<String> {
    let attr = lookup(device.descriptor().attribute(name), name)?;
    let accessor = show_accessor(attr)?;
    Ok(device.show(accessor, None)?.to_string())
}

pub fn write_device_attr<D: IioDevice>(device: &mut D, name: &str, text: &str)
        -> Result<usize> {
    let attr = lookup(device.descriptor().attribute(name), name)?;
    let accessor = store_accessor(attr)?;
    log::trace!("store {:?} = {:?}", accessor, text);
    device.store(accessor, None, text)?;
    Ok(text.len())
}

fn copy_out(result: Result<String>, buf: &mut [u8]) -> isize {
    match result {
        Ok(text) => {
            let count = text.len().min(buf.len());
            buf[..count].copy_from_slice(&text.as_bytes()[..count]);
            if let Some(terminator) = buf.get_mut(count) {
                *terminator = 0;
            }
            count as isize
        }
        Err(error) => error.errno() as isize,
    }
}

fn copy_in(buf: &[u8], store: impl FnOnce(&str) -> Result<usize>) -> isize {
    let result = std::str::from_utf8(buf)
        .map_err(|_| Error::invalid("value is not UTF-8"))
        .and_then(store);
    match result {
        Ok(count) => count as isize,
        Err(error) => error.errno() as isize,
    }
}

/// Buffer-based read: renders the value into `buf`, NUL-terminating it if there is room.
/// Returns the number of bytes written, or a negative errno.
pub fn show_channel_attr<D: IioDevice>(device: &mut D, channel: &Channel<D::Accessor>,
                                       name: &str, buf: &mut [u8]) -> isize {
    copy_out(read_channel_attr(device, channel, name), buf)
}

/// Buffer-based write. Returns the number of bytes consumed, or a negative errno.
pub fn store_channel_attr<D: IioDevice>(device: &mut D, channel: &Channel<D::Accessor>,
                                        name: &str, buf: &[u8]) -> isize {
    copy_in(buf, |text| write_channel_attr(device, channel, name, text))
}

/// Buffer-based read of a device attribute; see [`show_channel_attr`].
pub fn show_device_attr<D: IioDevice>(device: &mut D, name: &str, buf: &mut [u8]) -> isize {
    copy_out(read_device_attr(device, name), buf)
}

/// Buffer-based write of a device attribute; see [`store_channel_attr`].
pub fn store_device_attr<D: IioDevice>(device: &mut D, name: &str, buf: &[u8]) -> isize {
    copy_in(buf, |text| write_device_attr(device, name, text))
}

/// Raw register read, bypassing the channel model.
pub fn debug_reg_read<D: IioDevice>(device: &mut D, reg: u32) -> Result<u32> {
    if !device.descriptor().debug_registers {
        return Err(Error::NotSupported { attribute: "debug_reg", access: Access::Read })
    }
    device.debug_reg_read(reg)
}

/// Raw register write, bypassing the channel model.
pub fn debug_reg_write<D: IioDevice>(device: &mut D, reg: u32, value: u32) -> Result<()> {
    if !device.descriptor().debug_registers {
        return Err(Error::NotSupported { attribute: "debug_reg", access: Access::Write })
    }
    device.debug_reg_write(reg, value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::iio::{ChannelType, Direction, Shared};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        Index,
        Set,
    }

    static ATTRS: [Attribute<Probe>; 3] = [
        Attribute::read_only("index", Shared::ByType, Probe::Index),
        Attribute::write_only("set", Shared::Separate, Probe::Set),
        Attribute::new("calibbias", Shared::ByType),
    ];

    const fn channel(index: u16) -> Channel<Probe> {
        Channel {
            ch_type: ChannelType::Voltage,
            index,
            index2: None,
            direction: Direction::Input,
            differential: false,
            indexed: true,
            extend_name: None,
            address: 0,
            scan_type: None,
            attributes: &ATTRS,
        }
    }

    static CHANNELS: [Channel<Probe>; 2] = [channel(0), channel(1)];

    static DEVICE: DeviceDescriptor<Probe> = DeviceDescriptor {
        channels: &CHANNELS,
        attributes: &[Attribute::read_write("mode", Shared::Separate, Probe::Index, Probe::Set)],
        debug_registers: false,
    };

    #[derive(Default)]
    struct ProbeDevice {
        stored: Vec<(Option<u16>, String)>,
    }

    impl IioDevice for ProbeDevice {
        type Accessor = Probe;

        fn descriptor(&self) -> &'static DeviceDescriptor<Probe> {
            &DEVICE
        }

        fn show(&mut self, accessor: Probe, channel: Option<&Channel<Probe>>) -> Result<Value> {
            assert_eq!(accessor, Probe::Index);
            Ok(Value::Int(channel.map(|channel| channel.index as i32).unwrap_or(-1)))
        }

        fn store(&mut self, accessor: Probe, channel: Option<&Channel<Probe>>, text: &str)
                -> Result<()> {
            assert_eq!(accessor, Probe::Set);
            self.stored.push((channel.map(|channel| channel.index), text.to_owned()));
            Ok(())
        }
    }

    #[test]
    fn test_shared_attribute_sees_originating_channel() {
        let mut device = ProbeDevice::default();
        assert_eq!(read_channel_attr(&mut device, &CHANNELS[0], "index").unwrap(), "0");
        assert_eq!(read_channel_attr(&mut device, &CHANNELS[1], "index").unwrap(), "1");
    }

    #[test]
    fn test_missing_accessor() {
        let mut device = ProbeDevice::default();
        assert!(matches!(
            read_channel_attr(&mut device, &CHANNELS[0], "set"),
            Err(Error::NotSupported { attribute: "set", access: Access::Read })));
        assert!(matches!(
            write_channel_attr(&mut device, &CHANNELS[0], "index", "1"),
            Err(Error::NotSupported { attribute: "index", access: Access::Write })));
        assert!(matches!(
            read_channel_attr(&mut device, &CHANNELS[0], "calibbias"),
            Err(Error::NotSupported { .. })));
        assert!(matches!(
            read_channel_attr(&mut device, &CHANNELS[0], "bogus"),
            Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_write_and_device_attrs() {
        let mut device = ProbeDevice::default();
        assert_eq!(write_channel_attr(&mut device, &CHANNELS[1], "set", "42").unwrap(), 2);
        assert_eq!(write_device_attr(&mut device, "mode", "go").unwrap(), 2);
        assert_eq!(read_device_attr(&mut device, "mode").unwrap(), "-1");
        assert_eq!(device.stored, [(Some(1), "42".to_owned()), (None, "go".to_owned())]);
    }

    #[test]
    fn test_buffer_accessors() {
        let mut device = ProbeDevice::default();
        let mut buf = [0xffu8; 4];
        assert_eq!(show_channel_attr(&mut device, &CHANNELS[1], "index", &mut buf), 1);
        assert_eq!(buf, [b'1', 0, 0xff, 0xff]);
        assert_eq!(show_channel_attr(&mut device, &CHANNELS[1], "set", &mut buf),
                   -libc::EOPNOTSUPP as isize);
        assert_eq!(store_channel_attr(&mut device, &CHANNELS[0], "set", b"7\n"), 2);
        assert_eq!(store_channel_attr(&mut device, &CHANNELS[0], "set", &[0xff, 0xfe]),
                   -libc::EINVAL as isize);
    }

    #[test]
    fn test_device_buffer_accessors() {
        let mut device = ProbeDevice::default();
        let mut buf = [0xffu8; 3];
        assert_eq!(show_device_attr(&mut device, "mode", &mut buf), 2);
        assert_eq!(buf, [b'-', b'1', 0]);
        assert_eq!(store_device_attr(&mut device, "mode", b"go"), 2);
        assert_eq!(store_device_attr(&mut device, "bogus", b"1"), -libc::EINVAL as isize);
        assert_eq!(device.stored, [(None, "go".to_owned())]);
    }

    #[test]
    fn test_debug_registers_gated_by_descriptor() {
        let mut device = ProbeDevice::default();
        assert!(matches!(debug_reg_read(&mut device, 0), Err(Error::NotSupported { .. })));
        assert!(matches!(debug_reg_write(&mut device, 0, 1), Err(Error::NotSupported { .. })));
    }
}
