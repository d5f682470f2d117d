#![allow(dead_code)]

use bitflags::bitflags;

/// Set on the first address byte to select 15-bit addressing over I2C.
pub const I2C_LONG_ADDRESS: u16 = 0x8000;
pub const ADDR_MASK: u16 = 0x7fff;

/// Chip ID
pub const ADDR_CHIP_ID: u16 = 0x0008;

/// Time Slot Period, low 16 bits
pub const ADDR_TS_FREQ: u16 = 0x000d;

/// Time Slot Period, high 7 bits
pub const ADDR_TS_FREQH: u16 = 0x000e;

pub const TS_FREQH_MASK: u32 = 0x7f;

/// System Control
pub const ADDR_SYS_CTL: u16 = 0x000f;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SysCtl: u16 {
        /// Low frequency oscillator: set selects 1 MHz, clear selects 32 kHz.
        const LfoscSel  = 1<<0;
        const LfoscEn   = 1<<1;
        const HfoscEn   = 1<<2;
        const LfoscExt  = 1<<3;
        const HfoscExt  = 1<<4;
        const SwReset   = 1<<15;
    }
}

/// Operating Mode
pub const ADDR_OPMODE: u16 = 0x0010;

pub const OPMODE_OP_MODE_MASK: u16 = 0x0001;
pub const OPMODE_TIMESLOT_EN_SHIFT: u32 = 8;
pub const OPMODE_TIMESLOT_EN_MASK: u16 = 0x0f << OPMODE_TIMESLOT_EN_SHIFT;

pub const LFOSC_FREQ_1M: u32 = 1_000_000;
pub const LFOSC_FREQ_32K: u32 = 32_768;
