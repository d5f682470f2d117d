use std::thread::sleep;
use std::time::Duration;

use crate::Result;

/// Register-level access to a chip on a bus, plus the blocking delay used to let analog
/// front-ends settle.
///
/// Register addresses are passed through as-is; any framing bits (e.g. an I2C long-address
/// marker) are the chip driver's concern.
pub trait Driver {
    fn read_register(&self, addr: u16, data: &mut [u8]) -> Result<()>;
    fn write_register(&self, addr: u16, data: &[u8]) -> Result<()>;

    fn delay_ms(&self, ms: u32) {
        sleep(Duration::from_millis(ms as u64))
    }
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
#[path = "linux.rs"]
pub mod imp;

#[cfg(test)]
pub mod mock;
