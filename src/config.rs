//! Converter setup as supplied by the application, and its register encodings.

use crate::Result;
use crate::params::{CapFilter, ExcLevel, ExcPin, Mode, VtFilter, VtSource};
use crate::regs::ad7746 as regs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapSetup {
    pub enabled: bool,
    /// Route CIN2 instead of CIN1 to the converter.
    pub cin2: bool,
    pub differential: bool,
    pub chop: bool,
}

impl Default for CapSetup {
    fn default() -> Self {
        Self {
            enabled: true,
            cin2: true,
            differential: false,
            chop: true,
        }
    }
}

impl CapSetup {
    pub(crate) fn register(self) -> u8 {
        let mut value = regs::CapSetup::empty();
        value.set(regs::CapSetup::CapEn, self.enabled);
        value.set(regs::CapSetup::Cin2, self.cin2);
        value.set(regs::CapSetup::CapDiff, self.differential);
        value.set(regs::CapSetup::CapChop, self.chop);
        value.bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtSetup {
    pub enabled: bool,
    pub source: VtSource,
    pub ext_ref: bool,
    pub short: bool,
    pub chop: bool,
}

impl Default for VtSetup {
    fn default() -> Self {
        Self {
            enabled: true,
            source: VtSource::InternalTemp,
            ext_ref: false,
            short: false,
            chop: true,
        }
    }
}

impl VtSetup {
    pub(crate) fn register(self) -> u8 {
        let mut value = regs::VtSetup::empty();
        value.set(regs::VtSetup::VtEn, self.enabled);
        value.set(regs::VtSetup::ExtRef, self.ext_ref);
        value.set(regs::VtSetup::VtShort, self.short);
        value.set(regs::VtSetup::VtChop, self.chop);
        value.bits() | self.source.code() << regs::VT_SETUP_VTMD_SHIFT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcSetup {
    pub clk_ctrl: bool,
    pub exc_on: bool,
    pub exc_b: ExcPin,
    pub exc_a: ExcPin,
    pub level: ExcLevel,
}

impl Default for ExcSetup {
    fn default() -> Self {
        Self {
            clk_ctrl: false,
            exc_on: false,
            exc_b: ExcPin::Disabled,
            exc_a: ExcPin::Normal,
            level: ExcLevel::Div4Of8,
        }
    }
}

impl ExcSetup {
    pub(crate) fn register(self) -> u8 {
        let mut value = regs::ExcSetup::empty();
        value.set(regs::ExcSetup::ClkCtrl, self.clk_ctrl);
        value.set(regs::ExcSetup::ExcOn, self.exc_on);
        value.bits() |
            self.exc_b.code() << regs::EXC_SETUP_EXCB_SHIFT |
            self.exc_a.code() << regs::EXC_SETUP_EXCA_SHIFT |
            self.level.code() << regs::EXC_SETUP_EXCLVL_SHIFT
    }
}

/// Conversion mode and filter selection, i.e. the configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvConfig {
    pub vt_filter: VtFilter,
    pub cap_filter: CapFilter,
    pub mode: Mode,
}

impl ConvConfig {
    pub(crate) fn register(self) -> u8 {
        self.vt_filter.code() << regs::CONFIG_VTF_SHIFT |
            self.cap_filter.code() << regs::CONFIG_CAPF_SHIFT |
            self.mode.code() << regs::CONFIG_MD_SHIFT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Setup {
    pub cap: CapSetup,
    pub vt: VtSetup,
    pub exc: ExcSetup,
    pub config: ConvConfig,
}

/// Calibration DAC codes, indexed by capacitance channel and differential flag.
///
/// When a capacitance channel is selected, entry `[index][0]` is programmed into CAPDAC A and
/// `[index][1]` into CAPDAC B. The `offset` attribute of a channel reports the entry for its own
/// differential flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CapDacTable {
    pub codes: [[u8; 2]; 2],
}

impl CapDacTable {
    pub const CHANNELS: usize = 2;

    pub fn code(&self, index: usize, differential: bool) -> Result<u8> {
        self.codes.get(index)
            .map(|pair| pair[differential as usize])
            .ok_or_else(|| crate::Error::invalid(format!("CAPDAC index {}", index)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitParams {
    pub setup: Setup,
    pub capdac: CapDacTable,
}
