//! Key normalization for relational key comparisons.
//!
//! Legacy keys were compared as fixed-width EBCDIC or packed-decimal bytes.
//! A relational store compares typed columns instead, so key fragments built
//! from currency values are normalized into fixed-width strings whose
//! ordering matches the original engine:
//!
//! - **Character** fields are blank-padded; descending fields pad with `9`
//! - **Numeric** fields are zero-padded on the left
//! - **Dates** become `YYYY-MM-DD`, with a sentinel for empty dates
//! - **Packed decimal** fields are decoded from their sign nibble

mod normalize;
mod packed;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurrencyError;

pub use normalize::{normalize_binary_key, normalize_field, KeyNormalizer};
pub use packed::{decode_packed, PackedKey, Sign};

/// Logical type of a key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Fixed-length character data.
    String,
    /// Whole number.
    Integer,
    /// Halfword whole number.
    Short,
    /// Decimal number in display form.
    Decimal,
    /// `YYYYMMDD` date.
    Date,
    /// Packed decimal (COMP-3) bytes.
    Packed,
}

impl FieldType {
    /// True for types that are zero-padded on the left.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Short | Self::Decimal)
    }
}

impl FromStr for FieldType {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STRING" | "CHAR" | "CHARACTER" => Ok(Self::String),
            "INTEGER" | "INT" | "LONG" => Ok(Self::Integer),
            "SHORT" | "SMALLINT" => Ok(Self::Short),
            "DECIMAL" | "NUMERIC" => Ok(Self::Decimal),
            "DATE" => Ok(Self::Date),
            "PACKED" | "PACKEDDECIMAL" | "COMP-3" => Ok(Self::Packed),
            _ => Err(CurrencyError::UnknownFieldType {
                name: s.to_string(),
            }),
        }
    }
}

/// Sort direction of a key field in the legacy schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(Self::Asc),
            "DESC" | "DESCENDING" => Ok(Self::Desc),
            _ => Err(CurrencyError::UnknownSortOrder {
                name: s.to_string(),
            }),
        }
    }
}

/// One field of a composite key, located by character offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySegment {
    /// Zero-based offset of the field.
    pub start: usize,
    /// Field width.
    pub length: usize,
    /// Logical type.
    pub field_type: FieldType,
    /// Sort direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl KeySegment {
    /// Ascending segment of `length` characters at `start`.
    pub fn new(start: usize, length: usize, field_type: FieldType) -> Self {
        Self {
            start,
            length,
            field_type,
            order: SortOrder::Asc,
        }
    }

    /// Same segment, sorted descending.
    pub fn descending(self) -> Self {
        Self {
            order: SortOrder::Desc,
            ..self
        }
    }
}
