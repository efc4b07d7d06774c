//! Packed decimal (COMP-3) key fields.
//!
//! Packed decimal stores two digits per byte with the sign in the rightmost
//! nibble.  In hex form, `0x12 0x3D` reads `123D`: digits `123`, sign `D`.
//!
//! - `C` or `F` -- positive (`F` is the unsigned form)
//! - `D` -- negative
//!
//! Any other trailing nibble means the bytes are not packed decimal.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Sign recovered from a packed decimal sign nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Sign nibble `C` or `F`.
    Positive,
    /// Sign nibble `D`.
    Negative,
}

impl Sign {
    /// Parse a packed decimal sign nibble.
    pub fn from_packed_nibble(nibble: u8) -> Option<Self> {
        match nibble & 0x0F {
            0x0C | 0x0F => Some(Self::Positive),
            0x0D => Some(Self::Negative),
            _ => None,
        }
    }
}

/// A decoded packed decimal key: digit nibbles and sign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedKey {
    /// Hex digits with the sign nibble removed, leading zeros kept.
    pub digits: String,
    pub sign: Sign,
}

impl PackedKey {
    /// Key text: the digits, prefixed with `-` when negative.
    pub fn to_key_string(&self) -> String {
        match self.sign {
            Sign::Positive => self.digits.clone(),
            Sign::Negative => format!("-{}", self.digits),
        }
    }

    /// Numeric value, or `None` if a digit nibble is not decimal.
    pub fn value(&self) -> Option<Decimal> {
        let mut value = Decimal::from_str(&self.digits).ok()?;
        if self.sign == Sign::Negative {
            value = -value;
        }
        Some(value)
    }
}

/// Decode packed decimal bytes.  Returns `None` when the trailing nibble
/// is not a packed sign or the slice is empty.
pub fn decode_packed(bytes: &[u8]) -> Option<PackedKey> {
    let (&last, _) = bytes.split_last()?;
    let sign = Sign::from_packed_nibble(last)?;
    let mut hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    hex.pop();
    Some(PackedKey { digits: hex, sign })
}
