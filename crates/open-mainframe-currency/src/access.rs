//! Record-access hooks.
//!
//! Generated per-record access code implements [`RecordAccess`] and calls
//! the hooks after each relational operation.  The provided methods keep the
//! currency table in step with IDMS rules:
//!
//! - a retrieved or stored row becomes current of its record type, of the
//!   run-unit, and of every set it participates in
//! - an erased row stays current for member-id queries, with the set left
//!   unpositioned
//! - a miss leaves currency alone, except that a keyed (USING) miss is
//!   recorded so owner resolution ignores the member row
//!
//! Implementors override a hook only where a record type needs more.

use crate::currency::CurrencyTable;
use crate::list::{ListShape, PositionCode};
use crate::record::{ActionCode, ListRole};
use crate::status::{ReturnCode, StatusCode};
use crate::value::KeyValue;

/// Capability set of one generated record type.
pub trait RecordAccess {
    /// Record type name as registered in the currency table.
    fn record_name(&self) -> &str;

    /// A row was retrieved.
    fn on_fetched(&self, table: &mut CurrencyTable, keys: &[(&str, KeyValue)]) -> ReturnCode {
        record_changed(table, self.record_name(), keys, ActionCode::Fetched)
    }

    /// A row was stored.  Manual sets are left untouched, keeping their
    /// current member: the new row is not connected until an explicit
    /// CONNECT.
    fn on_inserted(&self, table: &mut CurrencyTable, keys: &[(&str, KeyValue)]) -> ReturnCode {
        record_changed(table, self.record_name(), keys, ActionCode::Inserted)
    }

    /// A row was modified.
    fn on_updated(&self, table: &mut CurrencyTable, keys: &[(&str, KeyValue)]) -> ReturnCode {
        record_changed(table, self.record_name(), keys, ActionCode::Updated)
    }

    /// The current row was erased.
    fn on_deleted(&self, table: &mut CurrencyTable) -> ReturnCode {
        let name = self.record_name();
        let Some(record) = table.record_mut(name) else {
            return unknown_record(name);
        };
        record.set_action(ActionCode::DeletedRow);
        let sets: Vec<String> = record.list_names.keys().cloned().collect();
        table.sync_record(name);
        for set in sets {
            table.set_position(&set, PositionCode::OnNone, ActionCode::DeletedRow);
        }
        ReturnCode::GOOD
    }

    /// A lookup found no row.  `using` marks a keyed (FIND ... USING) miss.
    fn on_not_found(&self, table: &mut CurrencyTable, using: bool) -> ReturnCode {
        if using {
            let name = self.record_name();
            let Some(record) = table.record_mut(name) else {
                return unknown_record(name);
            };
            let member_sets: Vec<String> = record
                .list_names
                .iter()
                .filter(|(_, role)| **role == ListRole::Member)
                .map(|(set, _)| set.clone())
                .collect();
            for set in member_sets {
                if let Some(list) = table.list_mut(&set) {
                    list.action_code = ActionCode::MissOnUsing;
                }
            }
        }
        StatusCode::RowNotFound.into()
    }

    /// Walking `set_name` ran past its last member; the owner becomes
    /// current of set.
    fn on_end_of_list(&self, table: &mut CurrencyTable, set_name: &str) -> ReturnCode {
        if let Some(list) = table.list_mut(set_name) {
            list.position_code = PositionCode::OnOwnerRow;
        }
        StatusCode::EndOfList.into()
    }
}

fn unknown_record(name: &str) -> ReturnCode {
    tracing::warn!(record = %name, "Record type not registered in currency table");
    StatusCode::RowNotFound.into()
}

fn record_changed(
    table: &mut CurrencyTable,
    name: &str,
    keys: &[(&str, KeyValue)],
    action: ActionCode,
) -> ReturnCode {
    let Some(record) = table.record_mut(name) else {
        return unknown_record(name);
    };
    for (key, value) in keys {
        record.set_key(key, value.clone());
    }
    record.set_action(action);
    let sets: Vec<(String, ListRole)> = record
        .list_names
        .iter()
        .map(|(set, role)| (set.clone(), *role))
        .collect();

    table.set_current_of_run_unit(name);

    for (set, role) in sets {
        let Some(list) = table.list(&set) else {
            continue;
        };
        // A stored row joins a manual set only on CONNECT.
        if role == ListRole::Member
            && action == ActionCode::Inserted
            && !list.list_options.is_automatic()
        {
            continue;
        }
        table.sync_record_in(name, &set);
        let Some(list) = table.list_mut(&set) else {
            continue;
        };
        if role == ListRole::Member && list.shape() == ListShape::MultiMember {
            list.select_member(name);
        }
        let position = match role {
            ListRole::Owner => PositionCode::OnOwnerRow,
            ListRole::Member => PositionCode::OnMemberRow,
        };
        list.set_position(position, action);
    }
    ReturnCode::GOOD
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------
