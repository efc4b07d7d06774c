//! Record currency -- the current position of one record type.
//!
//! Each record type known to a session carries the key values of the row
//! last touched, what happened to that row, and the sets the record type
//! takes part in.  A record with every key `Absent` has no current row.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::KeyValue;

// ---------------------------------------------------------------------------
//  Action code
// ---------------------------------------------------------------------------

/// What the record-access layer last did to the current row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCode {
    /// Nothing recorded yet.
    #[default]
    NoAction,
    /// No row is current.
    NoRow,
    /// Row was retrieved.
    Fetched,
    /// Row was stored.
    Inserted,
    /// Row was modified.
    Updated,
    /// Row was erased.  It stays current for member-id queries.
    DeletedRow,
    /// A keyed lookup (FIND ... USING) found nothing.
    MissOnUsing,
    /// Row was connected to a set occurrence.
    Connected,
    /// Row was disconnected from a set occurrence.
    Disconnected,
}

/// Role a record type plays in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListRole {
    /// Owner side of the set.
    Owner,
    /// Member side of the set.
    Member,
}

// ---------------------------------------------------------------------------
//  Record currency
// ---------------------------------------------------------------------------

/// Currency of a single record type.
///
/// The identity column is always present in `currency_keys`, possibly as
/// [`KeyValue::Absent`].  Cloning yields an independent copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCurrency {
    /// Record type name (e.g., `ORDER`).
    pub record_name: String,
    /// Backing relational table.
    pub table_name: String,
    /// Identity column, the first of the key columns.
    pub id_column: String,
    /// Declared key columns, identity column first.
    pub key_columns: Vec<String>,
    /// Current key values by column name.
    pub currency_keys: HashMap<String, KeyValue>,
    /// What happened to the current row last.
    pub action_code: ActionCode,
    /// Sets this record participates in, by set name.
    pub list_names: HashMap<String, ListRole>,
}

impl RecordCurrency {
    /// Create a record currency whose identity column is `id_column`.
    pub fn new(record_name: &str, table_name: &str, id_column: &str) -> Self {
        let mut currency_keys = HashMap::new();
        currency_keys.insert(id_column.to_string(), KeyValue::Absent);
        Self {
            record_name: record_name.to_string(),
            table_name: table_name.to_string(),
            id_column: id_column.to_string(),
            key_columns: vec![id_column.to_string()],
            currency_keys,
            action_code: ActionCode::NoAction,
            list_names: HashMap::new(),
        }
    }

    /// Declare an additional key column.
    pub fn with_key(mut self, column: &str) -> Self {
        if !self.key_columns.iter().any(|c| c == column) {
            self.key_columns.push(column.to_string());
        }
        self.currency_keys
            .entry(column.to_string())
            .or_insert(KeyValue::Absent);
        self
    }

    /// Register participation in a set.  No-op if already registered.
    pub fn set_list_name(&mut self, set_name: &str, role: ListRole) {
        self.list_names.entry(set_name.to_string()).or_insert(role);
    }

    /// Role this record plays in `set_name`, if any.
    pub fn role_in(&self, set_name: &str) -> Option<ListRole> {
        self.list_names.get(set_name).copied()
    }

    /// Value of a key, `Absent` when unknown.
    pub fn key(&self, name: &str) -> &KeyValue {
        static ABSENT: KeyValue = KeyValue::Absent;
        self.currency_keys.get(name).unwrap_or(&ABSENT)
    }

    /// Store a key value.  Keys not declared as columns (such as a
    /// set-specific identity stored under a set name) are accepted too.
    pub fn set_key(&mut self, name: &str, value: impl Into<KeyValue>) {
        self.currency_keys.insert(name.to_string(), value.into());
    }

    /// Identity-column value, `0` when absent.
    pub fn current_id(&self) -> i64 {
        self.key(&self.id_column).as_id()
    }

    /// True when the identity key holds a non-empty value.
    pub fn has_current(&self) -> bool {
        self.key(&self.id_column).is_present()
    }

    /// Record the outcome of the last operation on this record type.
    pub fn set_action(&mut self, action: ActionCode) {
        self.action_code = action;
    }

    /// Set every key to `Absent` and the action to `NoRow`.
    ///
    /// No-op when the record has no keys.
    pub fn drop_currency_keys(&mut self) {
        if self.currency_keys.is_empty() {
            return;
        }
        for value in self.currency_keys.values_mut() {
            *value = KeyValue::Absent;
        }
        self.action_code = ActionCode::NoRow;
    }

    /// Set one key to `Absent`.  No-op if the key is unknown.
    pub fn drop_key(&mut self, name: &str) {
        if let Some(value) = self.currency_keys.get_mut(name) {
            *value = KeyValue::Absent;
        }
    }

    /// Copy key values and action from another currency of the same record
    /// type, leaving names and set roles untouched.
    pub(crate) fn absorb(&mut self, other: &RecordCurrency) {
        self.currency_keys.clone_from(&other.currency_keys);
        self.action_code = other.action_code;
    }
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------
