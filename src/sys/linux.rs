use std::ffi::{CStr, CString};
use std::io;
use libc::{c_int, c_ulong};
use crate::{Error, Result};

const I2C_SLAVE: c_ulong = 0x0703;
const I2C_RDWR: c_ulong = 0x0707;
const I2C_M_RD: u16 = 0x0001;

#[repr(C)]
struct I2cMsg {
    addr: u16,
    flags: u16,
    len: u16,
    buf: *mut u8,
}

#[repr(C)]
struct I2cRdwrIoctlData {
    msgs: *mut I2cMsg,
    nmsgs: u32,
}

#[derive(Debug)]
struct Fd(c_int);

impl Fd {
    fn open(path: &CStr) -> io::Result<Fd> {
        unsafe {
            let fd = libc::open(path.as_ptr(), libc::O_RDWR);
            if fd == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(Fd(fd))
            }
        }
    }

    fn set_slave(&self, addr: u16) -> io::Result<()> {
        unsafe {
            if libc::ioctl(self.0, I2C_SLAVE as _, addr as c_ulong) == -1 {
                Err(io::Error::last_os_error())
            } else {
                Ok(())
            }
        }
    }

    fn transfer(&self, msgs: &mut [I2cMsg]) -> io::Result<()> {
        let mut data = I2cRdwrIoctlData { msgs: msgs.as_mut_ptr(), nmsgs: msgs.len() as u32 };
        unsafe {
            let done = libc::ioctl(self.0, I2C_RDWR as _, &mut data as *mut I2cRdwrIoctlData);
            if done == -1 {
                Err(io::Error::last_os_error())
            } else if done as usize != msgs.len() {
                Err(io::Error::from_raw_os_error(libc::EIO))
            } else {
                Ok(())
            }
        }
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        unsafe {
            if libc::close(self.0) == -1 {
                log::warn!("error closing fd: {}", io::Error::last_os_error())
            }
        }
    }
}

/// Width of the register address sent ahead of each transfer, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressWidth {
    U8,
    U16,
}

/// A single chip on a Linux `i2c-dev` bus.
#[derive(Debug)]
pub struct I2cDriver {
    fd: Fd,
    slave_addr: u16,
    addr_width: AddressWidth,
}

impl I2cDriver {
    pub fn new(bus_path: &str, slave_addr: u16, addr_width: AddressWidth) -> Result<I2cDriver> {
        let path = CString::new(bus_path)
            .map_err(|_| Error::invalid(format!("bus path {:?} contains a NUL byte", bus_path)))?;
        let fd = Fd::open(path.as_ref())?;
        fd.set_slave(slave_addr)?;
        log::debug!("opened {} for slave {:#04x}", bus_path, slave_addr);
        Ok(I2cDriver { fd, slave_addr, addr_width })
    }

    fn address_bytes(&self, addr: u16) -> ([u8; 2], usize) {
        match self.addr_width {
            AddressWidth::U8 => ([addr as u8, 0], 1),
            AddressWidth::U16 => (addr.to_be_bytes(), 2),
        }
    }
}

impl super::Driver for I2cDriver {
    fn read_register(&self, addr: u16, data: &mut [u8]) -> Result<()> {
        let (mut addr_bytes, addr_len) = self.address_bytes(addr);
        let mut msgs = [
            I2cMsg {
                addr: self.slave_addr,
                flags: 0,
                len: addr_len as u16,
                buf: addr_bytes.as_mut_ptr(),
            },
            I2cMsg {
                addr: self.slave_addr,
                flags: I2C_M_RD,
                len: data.len() as u16,
                buf: data.as_mut_ptr(),
            },
        ];
        self.fd.transfer(&mut msgs)?;
        log::trace!("read_register({:#06x}) = {:02x?}", addr, data);
        Ok(())
    }

    fn write_register(&self, addr: u16, data: &[u8]) -> Result<()> {
        log::trace!("write_register({:#06x}, {:02x?})", addr, data);
        let (addr_bytes, addr_len) = self.address_bytes(addr);
        let mut packet = Vec::with_capacity(addr_len + data.len());
        packet.extend_from_slice(&addr_bytes[..addr_len]);
        packet.extend_from_slice(data);
        let mut msgs = [
            I2cMsg {
                addr: self.slave_addr,
                flags: 0,
                len: packet.len() as u16,
                buf: packet.as_mut_ptr(),
            },
        ];
        Ok(self.fd.transfer(&mut msgs)?)
    }
}
