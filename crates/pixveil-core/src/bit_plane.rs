//! Bit-plane access for 8 bit color channels.
//!
//! All functions take and return bit groups as right-aligned numbers, so a
//! depth of 3 carries values in `0..8`.

use std::fmt;

use crate::error::SteganoError;

/// Number of bits taken from or stored into one color channel, always 1 to 8
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitDepth(u8);

impl BitDepth {
    pub const MIN: BitDepth = BitDepth(1);
    pub const MAX: BitDepth = BitDepth(8);
    /// the upper or lower half of a channel
    pub const HALF: BitDepth = BitDepth(4);

    pub fn new(depth: u8) -> Option<Self> {
        (1..=8).contains(&depth).then_some(Self(depth))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn bits(self) -> usize {
        self.0 as usize
    }

    /// a mask with the lowest `depth` bits set
    pub fn mask(self) -> u8 {
        ((1u16 << self.0) - 1) as u8
    }

    /// all valid depths, ascending
    pub fn all() -> impl DoubleEndedIterator<Item = BitDepth> {
        (1..=8).map(BitDepth)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = SteganoError;

    fn try_from(depth: u8) -> Result<Self, Self::Error> {
        Self::new(depth).ok_or(SteganoError::InvalidBitDepth(depth))
    }
}

impl From<BitDepth> for u8 {
    fn from(depth: BitDepth) -> Self {
        depth.0
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Replaces the lowest `depth` bits of `value` with `bits`.
///
/// Bits above `depth` in `bits` are ignored, the upper `8 - depth` bits of `value` stay as they are.
#[inline]
pub fn set_low_bits(value: u8, bits: u8, depth: BitDepth) -> u8 {
    let mask = depth.mask();
    (value & !mask) | (bits & mask)
}

/// Returns the lowest `depth` bits of `value`
#[inline]
pub fn low_bits(value: u8, depth: BitDepth) -> u8 {
    value & depth.mask()
}

/// Returns the highest `depth` bits of `value`, shifted down so they are right-aligned
#[inline]
pub fn high_bits(value: u8, depth: BitDepth) -> u8 {
    ((value as u16) >> (8 - depth.get())) as u8
}
