//! Field and composite key normalization.

use rust_decimal::Decimal;

use super::packed::decode_packed;
use super::{FieldType, KeySegment, SortOrder};
use crate::config::{KeyConfig, LEGACY_HIGH_VALUE};

/// Width of an unformatted `YYYYMMDD` date.
const DATE_DIGITS: usize = 8;

/// Normalizes key fields under one platform configuration.
#[derive(Debug, Clone, Default)]
pub struct KeyNormalizer {
    config: KeyConfig,
}

impl KeyNormalizer {
    /// Create a normalizer for one platform configuration.
    pub fn new(config: KeyConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    /// Normalize the field at `[start, start + length)` of `raw` into a
    /// fixed-width fragment that sorts like the legacy key.
    ///
    /// Characters past the end of `raw` count as absent and are padded.
    pub fn normalize_field(
        &self,
        raw: &str,
        start: usize,
        length: usize,
        field_type: FieldType,
        order: SortOrder,
    ) -> String {
        let field: String = raw.chars().skip(start).take(length).collect();
        match field_type {
            FieldType::String | FieldType::Packed => {
                let text = self.rewrite_high_value(&field);
                pad_right(&text, length, text_fill(order))
            }
            FieldType::Integer | FieldType::Short | FieldType::Decimal => {
                let digits = field.trim();
                match order {
                    SortOrder::Asc => pad_left(digits, length, '0'),
                    SortOrder::Desc => pad_right(digits, length, '9'),
                }
            }
            FieldType::Date => self.format_date(&pad_right(field.trim(), length, text_fill(order))),
        }
    }

    /// Same as [`normalize_field`](Self::normalize_field) with the
    /// configured default sort order.
    pub fn normalize_field_default(
        &self,
        raw: &str,
        start: usize,
        length: usize,
        field_type: FieldType,
    ) -> String {
        self.normalize_field(raw, start, length, field_type, self.config.default_order)
    }

    /// Normalize a field held as raw bytes.
    ///
    /// Packed fields are decoded from their sign nibble; anything else,
    /// including a packed field with an invalid sign, is returned as the
    /// raw substring.  A field past the end of `raw` yields `length` zeros.
    pub fn normalize_binary_key(
        &self,
        raw: &[u8],
        start: usize,
        length: usize,
        field_type: FieldType,
    ) -> String {
        let Some(field) = field_bytes(raw, start, length) else {
            return "0".repeat(length);
        };
        if field_type == FieldType::Packed {
            if let Some(key) = decode_packed(field) {
                return key.to_key_string();
            }
        }
        latin1(field)
    }

    /// Numeric value of a packed field, for range checks against decoded
    /// keys.  `None` when the field is missing or not packed decimal.
    pub fn packed_value(&self, raw: &[u8], start: usize, length: usize) -> Option<Decimal> {
        decode_packed(field_bytes(raw, start, length)?)?.value()
    }

    /// Concatenate normalized segments of `raw` into one comparable key.
    pub fn composite_key(&self, raw: &str, segments: &[KeySegment]) -> String {
        segments
            .iter()
            .map(|s| self.normalize_field(raw, s.start, s.length, s.field_type, s.order))
            .collect()
    }

    fn rewrite_high_value(&self, field: &str) -> String {
        let target = self.config.high_value_char();
        if target == LEGACY_HIGH_VALUE {
            return field.to_string();
        }
        field
            .chars()
            .map(|c| if c == LEGACY_HIGH_VALUE { target } else { c })
            .collect()
    }

    fn format_date(&self, padded: &str) -> String {
        if padded.chars().count() != DATE_DIGITS {
            return padded.to_string();
        }
        let empty = padded.chars().all(|c| c == '0') || padded.chars().all(|c| c == ' ');
        let date = if empty {
            self.config.min_date.as_str()
        } else {
            padded
        };
        if date.len() == DATE_DIGITS && date.bytes().all(|b| b.is_ascii_digit()) {
            format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..])
        } else {
            date.to_string()
        }
    }
}

/// Normalize a field with the default configuration.
///
/// ```
/// use open_mainframe_currency::keys::{normalize_field, FieldType, SortOrder};
///
/// assert_eq!(normalize_field("AB", 0, 5, FieldType::String, SortOrder::Asc), "AB   ");
/// assert_eq!(normalize_field("7", 0, 3, FieldType::Integer, SortOrder::Asc), "007");
/// ```
pub fn normalize_field(
    raw: &str,
    start: usize,
    length: usize,
    field_type: FieldType,
    order: SortOrder,
) -> String {
    KeyNormalizer::default().normalize_field(raw, start, length, field_type, order)
}

/// Normalize a byte field with the default configuration.
pub fn normalize_binary_key(raw: &[u8], start: usize, length: usize, field_type: FieldType) -> String {
    KeyNormalizer::default().normalize_binary_key(raw, start, length, field_type)
}

fn text_fill(order: SortOrder) -> char {
    match order {
        SortOrder::Asc => ' ',
        SortOrder::Desc => '9',
    }
}

fn field_bytes(raw: &[u8], start: usize, length: usize) -> Option<&[u8]> {
    raw.get(start..start.checked_add(length)?)
}

fn pad_right(s: &str, width: usize, fill: char) -> String {
    let mut out: String = s.chars().take(width).collect();
    let used = out.chars().count();
    out.extend(std::iter::repeat(fill).take(width - used));
    out
}

fn pad_left(s: &str, width: usize, fill: char) -> String {
    let used = s.chars().count().min(width);
    let mut out: String = std::iter::repeat(fill).take(width - used).collect();
    out.extend(s.chars().take(width));
    out
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
