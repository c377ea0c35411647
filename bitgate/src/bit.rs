use std::fmt;
use std::ops::Not;

use crate::error::Error;

/// A binary signal level.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Bit {
    #[default]
    Low,
    High,
}

impl Bit {
    pub fn is_high(&self) -> bool {
        *self == Bit::High
    }
}

impl Not for Bit {
    type Output = Bit;

    fn not(self) -> Bit {
        match self {
            Bit::Low => Bit::High,
            Bit::High => Bit::Low,
        }
    }
}

impl From<bool> for Bit {
    fn from(x: bool) -> Self {
        if x {
            Bit::High
        } else {
            Bit::Low
        }
    }
}

impl From<Bit> for bool {
    fn from(x: Bit) -> Self {
        x.is_high()
    }
}

impl From<Bit> for u8 {
    fn from(x: Bit) -> Self {
        x as u8
    }
}

impl TryFrom<u8> for Bit {
    type Error = Error;

    fn try_from(x: u8) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(Bit::Low),
            1 => Ok(Bit::High),
            x => Err(Error::InvalidValue(x)),
        }
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}
