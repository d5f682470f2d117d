mod sys;
mod regs;
mod config;
mod params;
pub mod iio;
pub mod ad7746;
pub mod adpd410x;

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The underlying bus transaction failed. The OS error code is kept as-is.
    #[error("bus I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("attribute `{attribute}` has no {access} accessor")]
    NotSupported {
        attribute: &'static str,
        access: Access,
    },
}

/// Direction of an attribute access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

impl Error {
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Error::InvalidArgument(what.into())
    }

    /// Negative errno as returned across the C-shaped accessor boundary.
    pub fn errno(&self) -> i32 {
        match self {
            Self::Io(io_error) =>
                -io_error.raw_os_error().unwrap_or(libc::EIO),
            Self::InvalidArgument(_) =>
                -libc::EINVAL,
            Self::NotSupported { .. } =>
                -libc::EOPNOTSUPP,
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(io_error) =>
                io_error,
            Error::InvalidArgument(_) =>
                Self::new(io::ErrorKind::InvalidInput, error),
            Error::NotSupported { .. } =>
                Self::new(io::ErrorKind::Unsupported, error),
        }
    }
}

pub type Result<T> =
    core::result::Result<T, Error>;

pub use sys::Driver;

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use sys::imp::{AddressWidth, I2cDriver};

pub use config::{
    CapSetup,
    VtSetup,
    ExcSetup,
    ConvConfig,
    Setup,
    CapDacTable,
    InitParams,
};

pub use params::{
    VtSource,
    Mode,
    CapFilter,
    VtFilter,
    ExcPin,
    ExcLevel,
    ClockOption,
    OpMode,
    Timeslot,
    FilterRate,
    CAP_FILTER_RATES,
    VT_FILTER_RATES,
};
