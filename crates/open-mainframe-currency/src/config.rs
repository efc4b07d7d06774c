//! Currency engine configuration -- target platform and key normalization settings.

use serde::{Deserialize, Serialize};

use crate::error::{CurrencyError, Result};
use crate::keys::SortOrder;

/// High-value character as it appears in legacy key data (`X'FF'`).
pub const LEGACY_HIGH_VALUE: char = '\u{FF}';

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Key normalization settings.
    #[serde(default)]
    pub keys: KeyConfig,
}

/// Relational platform the generated access code runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    /// Db2 with an EBCDIC or Latin-1 code page.
    Db2,
    /// SQL Server, UTF-16 binary collation.
    SqlServer,
    /// PostgreSQL, UTF-8 with C collation.
    #[default]
    PostgreSql,
    /// Oracle with a single-byte character set.
    Oracle,
}

impl TargetPlatform {
    /// The character that sorts above every other on this platform.
    pub fn high_value(self) -> char {
        match self {
            Self::Db2 | Self::Oracle => LEGACY_HIGH_VALUE,
            Self::SqlServer => '\u{FFFF}',
            Self::PostgreSql => '\u{10FFFF}',
        }
    }
}

/// Key normalization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Target platform.
    #[serde(default)]
    pub platform: TargetPlatform,
    /// Explicit high-value replacement, overriding the platform default.
    #[serde(default)]
    pub high_value: Option<char>,
    /// `YYYYMMDD` written in place of an empty date.
    #[serde(default = "default_min_date")]
    pub min_date: String,
    /// Sort order used when a caller does not name one.
    #[serde(default)]
    pub default_order: SortOrder,
}

impl KeyConfig {
    /// Effective high-value character.
    pub fn high_value_char(&self) -> char {
        self.high_value.unwrap_or_else(|| self.platform.high_value())
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            platform: TargetPlatform::default(),
            high_value: None,
            min_date: default_min_date(),
            default_order: SortOrder::default(),
        }
    }
}

fn default_min_date() -> String {
    "19010101".to_string()
}

impl CurrencyConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CurrencyError::ConfigIo {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path, platform = ?config.keys.platform, "Currency configuration loaded");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}
