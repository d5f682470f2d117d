use crate::{Error, Result};

/// Input routed to the voltage/temperature converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VtSource {
    #[default]
    InternalTemp,
    ExternalTemp,
    VddMonitor,
    ExternalVin,
}

impl VtSource {
    pub fn code(self) -> u8 {
        match self {
            Self::InternalTemp => 0b00,
            Self::ExternalTemp => 0b01,
            Self::VddMonitor   => 0b10,
            Self::ExternalVin  => 0b11,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0b00 => Ok(Self::InternalTemp),
            0b01 => Ok(Self::ExternalTemp),
            0b10 => Ok(Self::VddMonitor),
            0b11 => Ok(Self::ExternalVin),
            _ => Err(Error::invalid(format!("VTMD code {:#x}", code))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Idle,
    #[default]
    Continuous,
    Single,
    PowerDown,
    OffsetCalibration,
    GainCalibration,
}

impl Mode {
    pub fn code(self) -> u8 {
        match self {
            Self::Idle              => 0b000,
            Self::Continuous        => 0b001,
            Self::Single            => 0b010,
            Self::PowerDown         => 0b011,
            Self::OffsetCalibration => 0b101,
            Self::GainCalibration   => 0b110,
        }
    }
}

/// Capacitance channel digital filter. Variants are named after the update rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapFilter {
    #[default]
    Hz91,
    Hz84,
    Hz50,
    Hz26,
    Hz16,
    Hz13,
    Hz11,
    Hz9,
}

impl CapFilter {
    pub const ALL: [CapFilter; 8] = [
        Self::Hz91, Self::Hz84, Self::Hz50, Self::Hz26,
        Self::Hz16, Self::Hz13, Self::Hz11, Self::Hz9,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn rate(self) -> FilterRate {
        CAP_FILTER_RATES[self.code() as usize]
    }

    pub fn from_update_rate(hz: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.rate().update_rate_hz as u32 == hz)
    }
}

/// Voltage/temperature channel digital filter. Variants are named after the update rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VtFilter {
    #[default]
    Hz50,
    Hz31,
    Hz16,
    Hz8,
}

impl VtFilter {
    pub const ALL: [VtFilter; 4] = [Self::Hz50, Self::Hz31, Self::Hz16, Self::Hz8];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn rate(self) -> FilterRate {
        VT_FILTER_RATES[self.code() as usize]
    }

    pub fn from_update_rate(hz: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.rate().update_rate_hz as u32 == hz)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterRate {
    pub update_rate_hz: u8,
    /// Conversion time plus one millisecond of margin.
    pub settle_ms: u8,
}

const fn rate(update_rate_hz: u8, conversion_ms: u8) -> FilterRate {
    FilterRate { update_rate_hz, settle_ms: conversion_ms + 1 }
}

pub const CAP_FILTER_RATES: [FilterRate; 8] = [
    rate(91, 11), rate(84, 12), rate(50, 20), rate(26, 38),
    rate(16, 62), rate(13, 77), rate(11, 92), rate(9, 110),
];

pub const VT_FILTER_RATES: [FilterRate; 4] = [
    rate(50, 20), rate(31, 32), rate(16, 62), rate(8, 122),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcPin {
    Disabled,
    Inverted,
    #[default]
    Normal,
}

impl ExcPin {
    pub fn code(self) -> u8 {
        match self {
            Self::Disabled => 0b00,
            Self::Inverted => 0b01,
            Self::Normal   => 0b10,
        }
    }
}

/// Excitation voltage level, as a fraction of VDD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExcLevel {
    Div1Of8,
    Div2Of8,
    Div3Of8,
    #[default]
    Div4Of8,
}

impl ExcLevel {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Oscillator sources of the optical front-end: low-frequency (time-slot timing) then
/// high-frequency (sequencer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockOption {
    #[default]
    IntLfoIntHfo,
    ExtLfoIntHfo,
    IntLfoExtHfo,
    ExtLfoExtHfo,
}

impl ClockOption {
    pub fn external_lfo(self) -> bool {
        matches!(self, Self::ExtLfoIntHfo | Self::ExtLfoExtHfo)
    }

    pub fn external_hfo(self) -> bool {
        matches!(self, Self::IntLfoExtHfo | Self::ExtLfoExtHfo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpMode {
    #[default]
    Standby,
    Go,
}

impl OpMode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Self::Standby),
            1 => Ok(Self::Go),
            _ => Err(Error::invalid(format!("operating mode {}", code))),
        }
    }
}

/// Time slots of the optical front-end sequencer, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeslot {
    A, B, C, D, E, F, G, H, I, J, K, L,
}

impl Timeslot {
    pub const ALL: [Timeslot; 12] = [
        Self::A, Self::B, Self::C, Self::D, Self::E, Self::F,
        Self::G, Self::H, Self::I, Self::J, Self::K, Self::L,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u32) -> Result<Self> {
        usize::try_from(code).ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| Error::invalid(format!("time slot {}", code)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_filter_tables() {
        assert_eq!(CapFilter::Hz91.rate(), FilterRate { update_rate_hz: 91, settle_ms: 12 });
        assert_eq!(CapFilter::Hz9.rate(), FilterRate { update_rate_hz: 9, settle_ms: 111 });
        assert_eq!(VtFilter::Hz8.rate(), FilterRate { update_rate_hz: 8, settle_ms: 123 });
        for (index, filter) in CapFilter::ALL.iter().enumerate() {
            assert_eq!(filter.code() as usize, index);
        }
    }

    #[test]
    fn test_filter_from_update_rate() {
        assert_eq!(CapFilter::from_update_rate(26), Some(CapFilter::Hz26));
        assert_eq!(CapFilter::from_update_rate(27), None);
        assert_eq!(VtFilter::from_update_rate(16), Some(VtFilter::Hz16));
        assert_eq!(VtFilter::from_update_rate(91), None);
    }

    #[test]
    fn test_vt_source_codes() {
        for code in 0..4 {
            assert_eq!(VtSource::from_code(code).unwrap().code(), code);
        }
        assert!(VtSource::from_code(4).is_err());
    }

    #[test]
    fn test_timeslot_codes() {
        assert_eq!(Timeslot::from_code(0).unwrap(), Timeslot::A);
        assert_eq!(Timeslot::from_code(11).unwrap(), Timeslot::L);
        assert_eq!(Timeslot::L.code(), 11);
        assert!(Timeslot::from_code(12).is_err());
        assert!(OpMode::from_code(2).is_err());
        assert_eq!(OpMode::from_code(1).unwrap(), OpMode::Go);
    }
}
