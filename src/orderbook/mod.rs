//! Level book module
//!
//! Per-symbol bid/ask books rebuilt from venue snapshots and updates,
//! with CRC-32 integrity checks against the venue's own digest.

mod book;
mod registry;
mod side;

pub use book::SymbolBook;
pub use registry::BookRegistry;
pub use side::BookSide;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RecorderError;

/// Number of best levels per side fed into the checksum digest. Fixed
/// by the venue, independent of the subscribed book depth.
pub const CHECKSUM_DEPTH: usize = 10;

/// Side of the order book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bid,
    Ask,
}

/// Subscribed book depth. The venue only accepts these five values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    Ten = 10,
    TwentyFive = 25,
    Hundred = 100,
    FiveHundred = 500,
    Thousand = 1000,
}

impl Depth {
    pub fn as_usize(&self) -> usize {
        *self as usize
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Thousand
    }
}

impl TryFrom<u32> for Depth {
    type Error = RecorderError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(Depth::Ten),
            25 => Ok(Depth::TwentyFive),
            100 => Ok(Depth::Hundred),
            500 => Ok(Depth::FiveHundred),
            1000 => Ok(Depth::Thousand),
            other => Err(RecorderError::Config(format!(
                "book depth must be one of 10/25/100/500/1000, got {other}"
            ))),
        }
    }
}

impl Serialize for Depth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(*self as u32)
    }
}

impl<'de> Deserialize<'de> for Depth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Depth::try_from(value).map_err(serde::de::Error::custom)
    }
}
