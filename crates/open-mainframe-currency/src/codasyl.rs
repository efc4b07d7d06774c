//! CODASYL set semantics and the schema description a session registers.
//!
//! The legacy schema declares, per set, a membership class, an insertion
//! order and a duplicates rule.  Those travel with each list currency
//! unchanged.  A [`CurrencySchema`] lists the record types and sets of one
//! database so a session can register its whole currency shape at start.

use serde::{Deserialize, Serialize};

use crate::error::{CurrencyError, Result};
use crate::list::ListCurrency;
use crate::record::RecordCurrency;

// ---------------------------------------------------------------------------
//  Set membership class
// ---------------------------------------------------------------------------

/// Set membership class governing connect/disconnect rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListOptions {
    /// Must belong to a set; automatically connected on STORE.
    #[default]
    MandatoryAutomatic,
    /// Must belong to a set; explicit CONNECT required.
    MandatoryManual,
    /// May belong to a set; automatically connected on STORE.
    OptionalAutomatic,
    /// May belong to a set; explicit CONNECT required.
    OptionalManual,
}

impl ListOptions {
    /// True when STORE connects the member automatically.
    pub fn is_automatic(self) -> bool {
        matches!(self, Self::MandatoryAutomatic | Self::OptionalAutomatic)
    }

    /// True when the member may be disconnected.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::OptionalAutomatic | Self::OptionalManual)
    }
}

// ---------------------------------------------------------------------------
//  Set ordering
// ---------------------------------------------------------------------------

/// Order in which new member records are inserted into a set occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListOrder {
    /// Insert as first member.
    First,
    /// Insert as last member.
    #[default]
    Last,
    /// Insert after current of set.
    Next,
    /// Insert before current of set.
    Prior,
    /// Insert in sorted order by sort key.
    Sorted,
}

/// Handling of duplicate sort keys within a sorted set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListDuplicates {
    /// Duplicates are accepted in arrival order.
    Allowed,
    /// Duplicates are rejected.
    #[default]
    NotAllowed,
    /// Duplicates are placed first.
    First,
    /// Duplicates are placed last.
    Last,
}

// ---------------------------------------------------------------------------
//  Schema description
// ---------------------------------------------------------------------------

/// A record type as mapped onto a relational table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    /// Record type name.
    pub name: String,
    /// Backing table.
    pub table: String,
    /// Key columns, identity column first.
    pub keys: Vec<String>,
}

impl RecordDef {
    /// Build the initial (empty) currency for this record type.
    pub fn to_currency(&self) -> Result<RecordCurrency> {
        let (id_column, rest) = self
            .keys
            .split_first()
            .ok_or_else(|| CurrencyError::NoKeyColumns {
                record: self.name.clone(),
            })?;
        Ok(rest.iter().fold(
            RecordCurrency::new(&self.name, &self.table, id_column),
            |rec, col| rec.with_key(col),
        ))
    }
}

/// A set as mapped onto foreign keys, junction tables or sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDef {
    /// Set name.
    pub name: String,
    /// Foreign-key column from member to owner.
    pub foreign_key: String,
    /// Owner record type.
    #[serde(default)]
    pub owner: Option<String>,
    /// Member record types; more than one makes a multi-member set.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub sort_key: Option<String>,
    #[serde(default)]
    pub type_key: Option<String>,
    #[serde(default)]
    pub junction_table: Option<String>,
    #[serde(default)]
    pub junction_id: Option<String>,
    #[serde(default)]
    pub junction_foreign_key: Option<String>,
    #[serde(default)]
    pub sequence: Option<String>,
    #[serde(default)]
    pub options: ListOptions,
    #[serde(default)]
    pub order: ListOrder,
    #[serde(default)]
    pub duplicates: ListDuplicates,
}

impl SetDef {
    /// Build the list currency for this set, copying owner/member record
    /// currencies found through `lookup`.
    pub fn to_currency<'a, F>(&self, lookup: F) -> Result<ListCurrency>
    where
        F: Fn(&str) -> Option<&'a RecordCurrency>,
    {
        let resolve = |name: &String| {
            lookup(name).ok_or_else(|| CurrencyError::UnknownRecord {
                set: self.name.clone(),
                record: name.clone(),
            })
        };
        let owner = self.owner.as_ref().map(resolve).transpose()?;
        let members = self
            .members
            .iter()
            .map(resolve)
            .collect::<Result<Vec<_>>>()?;

        let list = if members.len() > 1 {
            let snapshots: Vec<RecordCurrency> = members.into_iter().cloned().collect();
            match (&self.junction_table, &self.junction_id, &self.junction_foreign_key) {
                (table, Some(junction_id), fk) => {
                    let mut list = ListCurrency::multi_member_with_junction(
                        &self.name,
                        &self.foreign_key,
                        owner,
                        &snapshots,
                        junction_id,
                        self.sequence.as_deref(),
                    );
                    if let Some(junction) = list.junction.as_mut() {
                        junction.table_name = table.clone();
                        junction.foreign_key = fk.clone();
                    }
                    list
                }
                (Some(_), None, _) => return Err(self.partial_junction("junction_id")),
                (None, None, Some(_)) => return Err(self.partial_junction("junction_table")),
                (None, None, None) => ListCurrency::multi_member(
                    &self.name,
                    &self.foreign_key,
                    owner,
                    &snapshots,
                    self.sort_key.as_deref(),
                    self.type_key.as_deref(),
                ),
            }
        } else {
            let member = members.first().copied();
            match (&self.junction_table, &self.junction_id, &self.junction_foreign_key) {
                (Some(table), Some(junction_id), _) => ListCurrency::junction(
                    &self.name,
                    &self.foreign_key,
                    owner,
                    member,
                    table,
                    junction_id,
                ),
                (Some(table), None, Some(fk)) => ListCurrency::pair_with_junction(
                    &self.name,
                    &self.foreign_key,
                    owner.ok_or_else(|| self.incomplete("owner"))?,
                    member.ok_or_else(|| self.incomplete("member"))?,
                    table,
                    fk,
                ),
                (Some(_), None, None) => {
                    return Err(self.partial_junction("junction_id or junction_foreign_key"))
                }
                (None, Some(_), _) | (None, None, Some(_)) => {
                    return Err(self.partial_junction("junction_table"))
                }
                (None, None, None) => {
                    let owner = owner.ok_or_else(|| self.incomplete("owner"))?;
                    let member = member.ok_or_else(|| self.incomplete("member"))?;
                    match &self.sequence {
                        Some(sequence) => ListCurrency::pair_with_sequence(
                            &self.name,
                            &self.foreign_key,
                            owner,
                            member,
                            sequence,
                        ),
                        None => ListCurrency::pair(&self.name, &self.foreign_key, owner, member),
                    }
                }
            }
        };
        Ok(list.with_semantics(self.options, self.order, self.duplicates))
    }

    fn partial_junction(&self, missing: &'static str) -> CurrencyError {
        CurrencyError::PartialJunction {
            set: self.name.clone(),
            missing,
        }
    }

    fn incomplete(&self, side: &'static str) -> CurrencyError {
        CurrencyError::IncompleteSet {
            set: self.name.clone(),
            side,
        }
    }
}

/// Record types and sets of one database, as registered by a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySchema {
    /// Schema name.
    #[serde(default)]
    pub name: String,
    /// Record types, in registration order.
    #[serde(default)]
    pub records: Vec<RecordDef>,
    /// Sets, in registration order.
    #[serde(default)]
    pub sets: Vec<SetDef>,
}

impl CurrencySchema {
    /// Parse a schema description from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Parse a schema description from JSON.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------
