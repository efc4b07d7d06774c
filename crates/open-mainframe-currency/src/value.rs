//! Currency key values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value held under one key column of a record's currency.
///
/// `Absent` means no row is positioned on that key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyValue {
    /// No current value.
    #[default]
    Absent,
    /// Character key.
    Text(String),
    /// Numeric key.
    Integer(i64),
}

impl KeyValue {
    /// True unless the value is `Absent` or an empty/blank string.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Absent => false,
            Self::Text(s) => !s.trim().is_empty(),
            Self::Integer(_) => true,
        }
    }

    /// Numeric identity for the value; `0` when absent or not numeric.
    pub fn as_id(&self) -> i64 {
        match self {
            Self::Absent => 0,
            Self::Text(s) => s.trim().parse().unwrap_or(0),
            Self::Integer(n) => *n,
        }
    }
}

impl From<i64> for KeyValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for KeyValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for KeyValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<&str> for KeyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl<T: Into<KeyValue>> From<Option<T>> for KeyValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Absent, Into::into)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence() {
        assert!(!KeyValue::Absent.is_present());
        assert!(!KeyValue::from("   ").is_present());
        assert!(KeyValue::from("A").is_present());
        assert!(KeyValue::Integer(0).is_present());
    }

    #[test]
    fn numeric_identity() {
        assert_eq!(KeyValue::Integer(42).as_id(), 42);
        assert_eq!(KeyValue::from(" 17 ").as_id(), 17);
        assert_eq!(KeyValue::from("ABC").as_id(), 0);
        assert_eq!(KeyValue::Absent.as_id(), 0);
    }

    #[test]
    fn option_conversion() {
        assert_eq!(KeyValue::from(None::<i64>), KeyValue::Absent);
        assert_eq!(KeyValue::from(Some(5_i64)), KeyValue::Integer(5));
    }
}
