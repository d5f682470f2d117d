#![allow(dead_code)]

use bitflags::bitflags;

/// Written as a bare address byte, resets the converter to power-on defaults.
pub const CMD_RESET: u8 = 0xbf;

/// Status Register
pub const ADDR_STATUS: u8 = 0x00;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Capacitance conversion finished (active low).
        const RdyCap = 1<<0;
        /// Voltage/temperature conversion finished (active low).
        const RdyVt  = 1<<1;
        /// Either conversion finished (active low).
        const Rdy    = 1<<2;
        /// Excitation output cannot be driven properly.
        const ExcErr = 1<<3;
    }
}

/// Capacitance Data, 24 bits, MSB first
pub const ADDR_CAP_DATA_H: u8 = 0x01;

/// Voltage/Temperature Data, 24 bits, MSB first
pub const ADDR_VT_DATA_H: u8 = 0x04;

/// Capacitive Channel Setup Register
pub const ADDR_CAP_SETUP: u8 = 0x07;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CapSetup: u8 {
        const CapChop = 1<<0;
        const CapDiff = 1<<5;
        const Cin2    = 1<<6;
        const CapEn   = 1<<7;
    }
}

/// Voltage/Temperature Channel Setup Register
pub const ADDR_VT_SETUP: u8 = 0x08;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VtSetup: u8 {
        const VtChop  = 1<<0;
        const VtShort = 1<<1;
        const ExtRef  = 1<<4;
        const VtEn    = 1<<7;
    }
}

pub const VT_SETUP_VTMD_SHIFT: u32 = 5;
pub const VT_SETUP_VTMD_MASK: u8 = 0b11 << VT_SETUP_VTMD_SHIFT;

/// Capacitive DAC and Excitation Setup Register
pub const ADDR_EXC_SETUP: u8 = 0x09;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExcSetup: u8 {
        /// Halves the internal clock; conversion times double.
        const ClkCtrl = 1<<7;
        /// Excitation signal present on the output during power-down and idle.
        const ExcOn   = 1<<6;
    }
}

pub const EXC_SETUP_EXCB_SHIFT: u32 = 4;
pub const EXC_SETUP_EXCA_SHIFT: u32 = 2;
pub const EXC_SETUP_EXCLVL_SHIFT: u32 = 0;

/// Configuration Register
pub const ADDR_CONFIG: u8 = 0x0a;

pub const CONFIG_VTF_SHIFT: u32 = 6;
pub const CONFIG_VTF_MASK: u8 = 0b11 << CONFIG_VTF_SHIFT;
pub const CONFIG_CAPF_SHIFT: u32 = 3;
pub const CONFIG_CAPF_MASK: u8 = 0b111 << CONFIG_CAPF_SHIFT;
pub const CONFIG_MD_SHIFT: u32 = 0;
pub const CONFIG_MD_MASK: u8 = 0b111 << CONFIG_MD_SHIFT;

/// Capacitive DAC Setup Registers
pub const ADDR_CAPDAC_A: u8 = 0x0b;
pub const ADDR_CAPDAC_B: u8 = 0x0c;

/// Connects the DAC to the positive (A) or negative (B) capacitance input.
pub const CAPDAC_DACEN: u8 = 1<<7;
/// DAC code, 7 bits.
pub const CAPDAC_DACP_MASK: u8 = 0x7f;

/// Capacitive Offset Calibration, 16 bits
pub const ADDR_CAP_OFFSET_H: u8 = 0x0d;

/// Capacitive Gain Calibration, 16 bits
pub const ADDR_CAP_GAIN_H: u8 = 0x0f;

/// Voltage Gain Calibration, 16 bits
pub const ADDR_VOLT_GAIN_H: u8 = 0x11;

/// Conversion results are offset binary around this code.
pub const DATA_ZERO_CODE: i32 = 0x800000;
