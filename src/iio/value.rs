use std::fmt;

use crate::{Error, Result};

/// A numeric attribute value together with the scheme used to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    /// `integer + micro / 10^6`
    IntPlusMicro(i32, i32),
    /// `integer + nano / 10^9`
    IntPlusNano(i32, i32),
    /// `numerator / 2^log2_denominator`
    FractionalLog2(i32, u32),
}

fn write_int_plus(f: &mut fmt::Formatter, integer: i32, fraction: i32, digits: usize)
        -> fmt::Result {
    if fraction < 0 {
        write!(f, "-{}.{:0digits$}", integer.unsigned_abs(), fraction.unsigned_abs())
    } else {
        write!(f, "{}.{:0digits$}", integer, fraction)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Int(value) =>
                write!(f, "{}", value),
            Self::IntPlusMicro(integer, micro) =>
                write_int_plus(f, integer, micro, 6),
            Self::IntPlusNano(integer, nano) =>
                write_int_plus(f, integer, nano, 9),
            Self::FractionalLog2(numerator, log2_denominator) => {
                let product = numerator as i64 * 1_000_000_000;
                let shift = log2_denominator.min(63);
                // truncate toward zero
                let scaled = if product < 0 { -(-product >> shift) } else { product >> shift };
                let integer = scaled / 1_000_000_000;
                let nano = (scaled % 1_000_000_000).unsigned_abs();
                if integer == 0 && scaled < 0 {
                    write!(f, "-0.{:09}", nano)
                } else {
                    write!(f, "{}.{:09}", integer, nano)
                }
            }
        }
    }
}

impl Value {
    /// Parse a written integer, tolerating surrounding whitespace and a trailing NUL.
    pub fn parse_int(text: &str) -> Result<i32> {
        let trimmed = text.trim_end_matches('\0').trim();
        trimmed.parse::<i32>()
            .map_err(|_| Error::invalid(format!("{:?} is not an integer", trimmed)))
    }
}
