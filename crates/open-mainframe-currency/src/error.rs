//! Currency engine error types.
//!
//! Lookup misses are not errors here: an unknown set or an absent key
//! resolves to `0` or an empty name.  These variants cover registration
//! and configuration faults only.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by the currency engine.
#[derive(Debug, Error, Diagnostic)]
pub enum CurrencyError {
    /// A record type was registered twice in one currency table.
    #[error("record '{record}' is already registered")]
    #[diagnostic(code(currency::duplicate_record))]
    DuplicateRecord {
        /// The duplicate record name.
        record: String,
    },

    /// A set was registered twice in one currency table.
    #[error("set '{set}' is already registered")]
    #[diagnostic(code(currency::duplicate_set))]
    DuplicateSet {
        /// The duplicate set name.
        set: String,
    },

    /// A set refers to a record type the table does not know.
    #[error("set '{set}' refers to unregistered record '{record}'")]
    #[diagnostic(
        code(currency::unknown_record),
        help("Register every owner and member record before its sets")
    )]
    UnknownRecord {
        /// The set being registered.
        set: String,
        /// The missing record name.
        record: String,
    },

    /// A set definition lacks a side its shape requires.
    #[error("set '{set}' has no {side} record")]
    #[diagnostic(code(currency::incomplete_set))]
    IncompleteSet {
        /// The set being built.
        set: String,
        /// `owner` or `member`.
        side: &'static str,
    },

    /// A set declares part of a junction-table link but not all of it.
    #[error("set '{set}' declares a partial junction link: missing {missing}")]
    #[diagnostic(
        code(currency::partial_junction),
        help("A junction set needs junction_table together with junction_id or junction_foreign_key")
    )]
    PartialJunction {
        /// The set being built.
        set: String,
        /// The field or fields the declaration lacks.
        missing: &'static str,
    },

    /// A record type was declared without any key column.
    #[error("record '{record}' has no key columns")]
    #[diagnostic(code(currency::no_keys))]
    NoKeyColumns {
        /// The record name.
        record: String,
    },

    /// An unrecognised key field type name.
    #[error("unknown field type '{name}'")]
    #[diagnostic(
        code(currency::field_type),
        help("Expected one of String, Integer, Short, Decimal, Date, Packed")
    )]
    UnknownFieldType {
        /// The rejected name.
        name: String,
    },

    /// An unrecognised sort order name.
    #[error("unknown sort order '{name}'")]
    #[diagnostic(code(currency::sort_order), help("Expected ASC or DESC"))]
    UnknownSortOrder {
        /// The rejected name.
        name: String,
    },

    /// Configuration could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    #[diagnostic(code(currency::config_io))]
    ConfigIo {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    #[diagnostic(code(currency::config_parse))]
    ConfigParse(#[from] toml::de::Error),

    /// A saved currency snapshot could not be encoded or decoded.
    #[error("currency snapshot error: {0}")]
    #[diagnostic(code(currency::snapshot))]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for currency engine operations.
pub type Result<T> = std::result::Result<T, CurrencyError>;
