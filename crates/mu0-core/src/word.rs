//! 12-bit word primitives: addresses, signed values, and two's-complement
//! conversion between the two.

use std::fmt;

/// Number of bits in an architectural word.
pub const WORD_BITS: u32 = 12;
/// Mask selecting the low 12 bits of a raw word.
pub const WORD_MASK: u16 = 0x0FFF;
/// Largest raw word that still decodes to a non-negative value.
pub const WORD_MAX_POSITIVE: u16 = 0x07FF;
/// Modulus of the 12-bit two's-complement encoding (`2^12`).
pub const WORD_MODULUS: Value = 0x1000;
/// Smallest signed value representable in a 12-bit word.
pub const WORD_MIN_SIGNED: Value = -0x800;
/// Largest signed value representable in a 12-bit word.
pub const WORD_MAX_SIGNED: Value = 0x7FF;

/// Signed machine value held by the accumulator and memory cells.
///
/// Values read from source are always in `WORD_MIN_SIGNED..=WORD_MAX_SIGNED`,
/// but accumulator arithmetic is not wrapped to 12 bits.
pub type Value = i64;

/// A 12-bit address into data memory or the instruction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
pub struct Address(u16);

impl Address {
    /// Lowest address.
    pub const MIN: Self = Self(0);
    /// Highest address (`0xFFF`).
    pub const MAX: Self = Self(WORD_MASK);

    /// Creates an address, rejecting anything wider than 12 bits.
    #[must_use]
    pub const fn new(raw: u16) -> Option<Self> {
        if raw <= WORD_MASK {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the raw 12-bit address.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Interprets the address as a program position (jump target).
    #[must_use]
    pub const fn as_position(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u16> for Address {
    type Error = AddressOutOfRange;

    fn try_from(raw: u16) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(AddressOutOfRange(raw))
    }
}

impl From<Address> for u16 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

/// Error returned when a raw value does not fit in a 12-bit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("address {0:#x} exceeds the 12-bit address space")]
pub struct AddressOutOfRange(pub u16);

/// Decodes a raw 12-bit word into its signed value.
///
/// Raw words above `0x7FF` are negative (`raw - 0x1000`). Bits above the low
/// twelve are ignored.
#[must_use]
pub const fn decode(raw: u16) -> Value {
    let raw = raw & WORD_MASK;
    if raw > WORD_MAX_POSITIVE {
        raw as Value - WORD_MODULUS
    } else {
        raw as Value
    }
}

/// Encodes a signed value as its raw two's-complement word for display.
///
/// Negative values gain `0x1000`; everything else is returned unchanged, so
/// accumulator values outside the 12-bit range stay visibly out of range.
#[must_use]
pub const fn encode(value: Value) -> Value {
    if value < 0 {
        value + WORD_MODULUS
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, Address, WORD_MASK};

    #[test]
    fn decode_splits_at_sign_bit() {
        assert_eq!(decode(0x000), 0);
        assert_eq!(decode(0x7FF), 2047);
        assert_eq!(decode(0x800), -2048);
        assert_eq!(decode(0xFFE), -2);
        assert_eq!(decode(0xFFF), -1);
    }

    #[test]
    fn encode_only_shifts_negative_values() {
        assert_eq!(encode(5), 5);
        assert_eq!(encode(-1), 0xFFF);
        assert_eq!(encode(-2048), 0x800);
        assert_eq!(encode(5000), 5000);
    }

    #[test]
    fn address_rejects_values_wider_than_twelve_bits() {
        assert_eq!(Address::new(WORD_MASK).map(Address::get), Some(0xFFF));
        assert!(Address::new(0x1000).is_none());
        assert!(Address::try_from(0xFFFF).is_err());
    }

    #[test]
    fn address_displays_as_three_hex_digits() {
        assert_eq!(Address::new(0x10).unwrap().to_string(), "0x010");
        assert_eq!(Address::MAX.to_string(), "0xfff");
    }
}
