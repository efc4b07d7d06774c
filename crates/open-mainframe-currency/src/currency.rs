//! Currency table -- the session-scoped currency state of a run-unit.
//!
//! IDMS kept, for every active run-unit:
//!
//! - **Current of run-unit** -- the last record touched
//! - **Current of record type** -- the last row of each record type
//! - **Current of set** -- the last position within each set
//!
//! Generated record-access code writes these as it fetches and stores rows,
//! then asks the table which owner or member row is current before building
//! a relational predicate.  Every query answers `0` (or an empty name) when
//! nothing is current; absence is a normal state, never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::codasyl::CurrencySchema;
use crate::error::{CurrencyError, Result};
use crate::list::{ListCurrency, PositionCode};
use crate::record::{ActionCode, ListRole, RecordCurrency};
use crate::session::SessionContext;
use crate::value::KeyValue;

// ---------------------------------------------------------------------------
//  Saved state
// ---------------------------------------------------------------------------

/// A copy of all currency state, used for save/restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CurrencySnapshot {
    record_table: HashMap<String, RecordCurrency>,
    list_table: HashMap<String, ListCurrency>,
    current_id: KeyValue,
    current_record_name: String,
}

// ---------------------------------------------------------------------------
//  Currency table
// ---------------------------------------------------------------------------

/// All record and set currencies of one conversation.
///
/// Entities are plain values: `clone()` produces a table that shares no
/// mutable state with its source, which is what a session relies on when it
/// suspends across a request boundary and later resumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTable {
    /// Identity captured when the session started.
    session: SessionContext,
    /// Record currencies by record name.
    record_table: HashMap<String, RecordCurrency>,
    /// Set currencies by set name.
    list_table: HashMap<String, ListCurrency>,
    /// Identity value of the current of run-unit.
    current_id: KeyValue,
    /// Record name of the current of run-unit.
    current_record_name: String,
    /// Stack for save/restore of currency state.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    stack: Vec<CurrencySnapshot>,
}

impl CurrencyTable {
    /// Create an empty table for a session.
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    /// Create a table and register every record and set of `schema`.
    pub fn from_schema(session: SessionContext, schema: &CurrencySchema) -> Result<Self> {
        let mut table = Self::new(session);
        for def in &schema.records {
            table.register_record(def.to_currency()?)?;
        }
        for def in &schema.sets {
            let list = def.to_currency(|name| table.record_table.get(name))?;
            table.register_list(list)?;
        }
        tracing::debug!(
            conversation = %table.session.conversation_name,
            schema = %schema.name,
            records = table.record_table.len(),
            sets = table.list_table.len(),
            "Currency table built from schema"
        );
        Ok(table)
    }

    /// Identity of the owning session.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Conversation name of the owning session.
    pub fn conversation_name(&self) -> &str {
        &self.session.conversation_name
    }

    // -- registration --

    /// Register a record type.  Fails if the name is already registered.
    pub fn register_record(&mut self, record: RecordCurrency) -> Result<()> {
        if self.record_table.contains_key(&record.record_name) {
            return Err(CurrencyError::DuplicateRecord {
                record: record.record_name,
            });
        }
        tracing::debug!(record = %record.record_name, table = %record.table_name, "Record registered");
        self.record_table.insert(record.record_name.clone(), record);
        Ok(())
    }

    /// Register a set.  Every record type it names must already be
    /// registered; each gets the set recorded under its role.
    pub fn register_list(&mut self, list: ListCurrency) -> Result<()> {
        if self.list_table.contains_key(&list.list_name) {
            return Err(CurrencyError::DuplicateSet {
                set: list.list_name,
            });
        }

        let mut roles: Vec<(String, ListRole)> = Vec::new();
        if let Some(owner) = list.owner_name() {
            roles.push((owner.to_string(), ListRole::Owner));
        }
        if let Some(member) = list.member_name() {
            roles.push((member.to_string(), ListRole::Member));
        }
        roles.extend(
            list.member_list()
                .iter()
                .map(|m| (m.record_name.clone(), ListRole::Member)),
        );

        if let Some((missing, _)) = roles
            .iter()
            .find(|(name, _)| !self.record_table.contains_key(name))
        {
            return Err(CurrencyError::UnknownRecord {
                set: list.list_name,
                record: missing.clone(),
            });
        }
        for (name, role) in &roles {
            if let Some(record) = self.record_table.get_mut(name) {
                record.set_list_name(&list.list_name, *role);
            }
        }

        tracing::debug!(set = %list.list_name, shape = ?list.shape(), "Set registered");
        self.list_table.insert(list.list_name.clone(), list);
        Ok(())
    }

    // -- access for the record-access layer --

    /// Currency of a record type, if registered.
    pub fn record(&self, record_name: &str) -> Option<&RecordCurrency> {
        self.record_table.get(record_name)
    }

    /// Mutable currency of a record type, if registered.
    pub fn record_mut(&mut self, record_name: &str) -> Option<&mut RecordCurrency> {
        self.record_table.get_mut(record_name)
    }

    /// Currency of a set, if registered.
    pub fn list(&self, set_name: &str) -> Option<&ListCurrency> {
        self.list_table.get(set_name)
    }

    /// Mutable currency of a set, if registered.
    pub fn list_mut(&mut self, set_name: &str) -> Option<&mut ListCurrency> {
        self.list_table.get_mut(set_name)
    }

    /// Registered record names, unordered.
    pub fn record_names(&self) -> impl Iterator<Item = &str> {
        self.record_table.keys().map(String::as_str)
    }

    /// Registered set names, unordered.
    pub fn list_names(&self) -> impl Iterator<Item = &str> {
        self.list_table.keys().map(String::as_str)
    }

    /// Make `record_name` the current of run-unit, taking its identity
    /// value.  Returns `false` if the record type is unknown.
    pub fn set_current_of_run_unit(&mut self, record_name: &str) -> bool {
        let Some(record) = self.record_table.get(record_name) else {
            return false;
        };
        self.current_id = record.key(&record.id_column).clone();
        self.current_record_name = record.record_name.clone();
        true
    }

    /// Record name of the current of run-unit; empty when none.
    pub fn current_record_name(&self) -> &str {
        &self.current_record_name
    }

    /// Identity of the current of run-unit; `0` when none.
    pub fn current_of_run_unit(&self) -> i64 {
        self.current_id.as_id()
    }

    /// Position a set.  Returns `false` if the set is unknown.
    pub fn set_position(&mut self, set_name: &str, position: PositionCode, action: ActionCode) -> bool {
        match self.list_table.get_mut(set_name) {
            Some(list) => {
                list.set_position(position, action);
                true
            }
            None => false,
        }
    }

    /// Copy a record's canonical keys and action into every set snapshot
    /// of that record type.
    pub fn sync_record(&mut self, record_name: &str) {
        let Some(record) = self.record_table.get(record_name) else {
            return;
        };
        for set_name in record.list_names.keys() {
            if let Some(list) = self.list_table.get_mut(set_name) {
                list.refresh_snapshots(record);
            }
        }
    }

    /// Copy a record's canonical keys and action into the snapshots one
    /// set holds of it.  Returns `false` if either name is unknown.
    pub fn sync_record_in(&mut self, record_name: &str, set_name: &str) -> bool {
        let (Some(record), Some(list)) = (
            self.record_table.get(record_name),
            self.list_table.get_mut(set_name),
        ) else {
            return false;
        };
        list.refresh_snapshots(record);
        true
    }

    // -- resolution --

    /// Identity value of the current row of `record_name`; `0` if the
    /// record type is unknown or has no current row.
    pub fn table_current_id(&self, record_name: &str) -> i64 {
        self.record_table
            .get(record_name)
            .map_or(0, RecordCurrency::current_id)
    }

    /// Identity of the current member of `set_name`.
    ///
    /// Only answers when the set is positioned on a member row, or when it
    /// is unpositioned because its member was just erased.
    pub fn list_member_id(&self, set_name: &str) -> i64 {
        self.list_table.get(set_name).map_or(0, member_identity)
    }

    /// Current-of-set identity; same rules as [`list_member_id`].
    ///
    /// [`list_member_id`]: CurrencyTable::list_member_id
    pub fn list_current_id(&self, set_name: &str) -> i64 {
        self.list_table.get(set_name).map_or(0, member_identity)
    }

    /// Identity of the owner of the current occurrence of `set_name`.
    ///
    /// Resolution order:
    ///
    /// 1. unknown set, or a set with no record on either side: `0`
    /// 2. positioned on a member row (not after a USING miss): the
    ///    member's foreign key
    /// 3. no owner record type but a foreign key is defined: the member's
    ///    foreign key
    /// 4. otherwise: the owner's identity
    /// 5. an owner holding a value under the set's own name overrides the
    ///    result when it differs, the set is not on the owner row, and
    ///    either `is_get_owner` is set or nothing else resolved
    pub fn list_owner_id(&self, set_name: &str, is_get_owner: bool) -> i64 {
        let Some(list) = self.list_table.get(set_name) else {
            return 0;
        };
        if list.owner_currency.is_none() && list.member_currency.is_none() {
            return 0;
        }

        let member_fk = || {
            list.member_currency
                .as_ref()
                .map_or(0, |m| m.key(&list.key_name).as_id())
        };
        let mut owner_id = if list.position_code == PositionCode::OnMemberRow
            && list.action_code != ActionCode::MissOnUsing
        {
            member_fk()
        } else if list.owner_currency.is_none() && !list.key_name.is_empty() {
            member_fk()
        } else {
            list.owner_currency
                .as_ref()
                .map_or(0, RecordCurrency::current_id)
        };

        if let Some(owner) = list.owner_currency.as_ref() {
            let per_set = owner.key(&list.list_name);
            if per_set.is_present() {
                let per_set_id = per_set.as_id();
                if per_set_id != owner_id
                    && list.position_code != PositionCode::OnOwnerRow
                    && (is_get_owner || owner_id == 0)
                {
                    tracing::trace!(set = %set_name, owner_id, per_set_id, "Set-specific owner id applied");
                    owner_id = per_set_id;
                }
            }
        }
        owner_id
    }

    /// Owner identity for a junction-table set.
    ///
    /// On a member row, a value the member holds under the set's name wins.
    pub fn junction_list_owner_id(&self, set_name: &str) -> i64 {
        let Some(list) = self.list_table.get(set_name) else {
            return 0;
        };
        if list.position_code == PositionCode::OnMemberRow {
            if let Some(member) = list.member_currency.as_ref() {
                let linked = member.key(&list.list_name);
                if linked.is_present() {
                    return linked.as_id();
                }
            }
        }
        list.owner_currency
            .as_ref()
            .map_or(0, RecordCurrency::current_id)
    }

    /// Member record name of `set_name`; empty if unknown.
    pub fn list_member_name(&self, set_name: &str) -> &str {
        self.list_table
            .get(set_name)
            .and_then(ListCurrency::member_name)
            .unwrap_or("")
    }

    /// Owner record name of `set_name`; empty if the set is unknown or has
    /// no owner record type.
    pub fn list_owner_name(&self, set_name: &str) -> &str {
        self.list_table
            .get(set_name)
            .and_then(ListCurrency::owner_name)
            .unwrap_or("")
    }

    /// Foreign-key column of `set_name`; empty if unknown.
    pub fn list_key_name(&self, set_name: &str) -> &str {
        self.list_table
            .get(set_name)
            .map_or("", |list| list.key_name.as_str())
    }

    // -- lifecycle --

    /// Drop every key value and reset every set position, keeping the
    /// registered record and set shapes.
    pub fn clear_currency(&mut self) {
        self.record_table
            .values_mut()
            .for_each(RecordCurrency::drop_currency_keys);
        self.list_table.values_mut().for_each(ListCurrency::clear);
        self.current_id = KeyValue::Absent;
        self.current_record_name.clear();
        tracing::debug!(conversation = %self.session.conversation_name, "Currency cleared");
    }

    /// Save all currency state onto the internal stack.
    pub fn save(&mut self) {
        self.stack.push(CurrencySnapshot {
            record_table: self.record_table.clone(),
            list_table: self.list_table.clone(),
            current_id: self.current_id.clone(),
            current_record_name: self.current_record_name.clone(),
        });
        tracing::trace!(depth = self.stack.len(), "Currency saved");
    }

    /// Restore currency state from the last save.
    /// Returns `true` if a snapshot was restored, `false` if the stack was empty.
    pub fn restore(&mut self) -> bool {
        if let Some(snapshot) = self.stack.pop() {
            self.record_table = snapshot.record_table;
            self.list_table = snapshot.list_table;
            self.current_id = snapshot.current_id;
            self.current_record_name = snapshot.current_record_name;
            tracing::trace!(depth = self.stack.len(), "Currency restored");
            true
        } else {
            false
        }
    }

    /// Depth of the save stack.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Serialize the table for a suspended session.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a table saved with [`to_json`](CurrencyTable::to_json).
    pub fn from_json(input: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(input)?;
        tracing::debug!(conversation = %table.session.conversation_name, "Currency table resumed");
        Ok(table)
    }
}

fn member_identity(list: &ListCurrency) -> i64 {
    let Some(member) = list.member_currency.as_ref() else {
        return 0;
    };
    let positioned = match list.position_code {
        PositionCode::OnMemberRow => true,
        PositionCode::OnNone => member.action_code == ActionCode::DeletedRow,
        PositionCode::OnOwnerRow => false,
    };
    if positioned && member.has_current() {
        member.current_id()
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> RecordCurrency {
        RecordCurrency::new("CUSTOMER", "customer", "CUSTOMER_ID")
    }

    fn order() -> RecordCurrency {
        RecordCurrency::new("ORDER", "orders", "ORDER_ID").with_key("CUSTOMER_ID")
    }

    fn table() -> CurrencyTable {
        let mut ct = CurrencyTable::new(SessionContext::new("CONV1", "JSMITH", "ORDPGM"));
        ct.register_record(customer()).unwrap();
        ct.register_record(order()).unwrap();
        ct.register_list(ListCurrency::pair(
            "CUST-ORDER",
            "CUSTOMER_ID",
            &customer(),
            &order(),
        ))
        .unwrap();
        ct
    }

    fn member_mut<'a>(ct: &'a mut CurrencyTable, set: &str) -> &'a mut RecordCurrency {
        ct.list_mut(set).unwrap().member_currency.as_mut().unwrap()
    }

    fn owner_mut<'a>(ct: &'a mut CurrencyTable, set: &str) -> &'a mut RecordCurrency {
        ct.list_mut(set).unwrap().owner_currency.as_mut().unwrap()
    }

    #[test]
    fn empty_table_answers_absent() {
        let ct = CurrencyTable::new(SessionContext::named("EMPTY"));
        assert_eq!(ct.table_current_id("CUSTOMER"), 0);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 0);
        assert_eq!(ct.list_current_id("CUST-ORDER"), 0);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 0);
        assert_eq!(ct.list_owner_id("CUST-ORDER", true), 0);
        assert_eq!(ct.junction_list_owner_id("CUST-ORDER"), 0);
        assert_eq!(ct.list_member_name("CUST-ORDER"), "");
        assert_eq!(ct.list_owner_name("CUST-ORDER"), "");
        assert_eq!(ct.list_key_name("CUST-ORDER"), "");
        assert_eq!(ct.current_of_run_unit(), 0);
    }

    #[test]
    fn registration_records_roles() {
        let ct = table();
        assert_eq!(
            ct.record("CUSTOMER").unwrap().role_in("CUST-ORDER"),
            Some(ListRole::Owner)
        );
        assert_eq!(
            ct.record("ORDER").unwrap().role_in("CUST-ORDER"),
            Some(ListRole::Member)
        );
        assert_eq!(ct.conversation_name(), "CONV1");
        assert_eq!(ct.session().user_id, "JSMITH");
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut ct = table();
        assert!(matches!(
            ct.register_record(customer()),
            Err(CurrencyError::DuplicateRecord { .. })
        ));
        let dup = ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &customer(), &order());
        assert!(matches!(
            ct.register_list(dup),
            Err(CurrencyError::DuplicateSet { .. })
        ));
    }

    #[test]
    fn set_with_unregistered_record_fails() {
        let mut ct = table();
        let invoice = RecordCurrency::new("INVOICE", "invoice", "INVOICE_ID");
        let list = ListCurrency::pair("CUST-INVOICE", "CUSTOMER_ID", &customer(), &invoice);
        assert!(matches!(
            ct.register_list(list),
            Err(CurrencyError::UnknownRecord { record, .. }) if record == "INVOICE"
        ));
        assert!(ct.list("CUST-INVOICE").is_none());
    }

    #[test]
    fn table_current_id_reads_identity() {
        let mut ct = table();
        assert_eq!(ct.table_current_id("CUSTOMER"), 0);
        ct.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 7);
        assert_eq!(ct.table_current_id("CUSTOMER"), 7);
        assert_eq!(ct.table_current_id("UNKNOWN"), 0);
    }

    #[test]
    fn member_id_requires_member_position() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("ORDER_ID", 15);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 0);

        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 15);
        assert_eq!(ct.list_current_id("CUST-ORDER"), 15);

        ct.set_position("CUST-ORDER", PositionCode::OnOwnerRow, ActionCode::Fetched);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 0);
    }

    #[test]
    fn deleted_member_stays_current() {
        let mut ct = table();
        let member = member_mut(&mut ct, "CUST-ORDER");
        member.set_key("ORDER_ID", 15);
        member.set_action(ActionCode::DeletedRow);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 15);
        assert_eq!(ct.list_current_id("CUST-ORDER"), 15);
    }

    #[test]
    fn blank_member_identity_is_absent() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("ORDER_ID", "  ");
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 0);
    }

    #[test]
    fn owner_id_from_member_foreign_key() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 42);
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 42);
    }

    #[test]
    fn owner_id_from_owner_row() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 42);
        owner_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 7);
        ct.set_position("CUST-ORDER", PositionCode::OnOwnerRow, ActionCode::Fetched);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 7);
    }

    #[test]
    fn miss_on_using_falls_back_to_owner() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 42);
        owner_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 7);
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::MissOnUsing);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 7);
    }

    #[test]
    fn set_specific_override_for_get_owner() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("CUSTOMER_ID", 42);
        let owner = owner_mut(&mut ct, "CUST-ORDER");
        owner.set_key("CUSTOMER_ID", 7);
        owner.set_key("CUST-ORDER", 9);
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);

        assert_eq!(ct.list_owner_id("CUST-ORDER", true), 9);
        // Routine lookups keep the resolved foreign key.
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 42);
    }

    #[test]
    fn override_fills_unresolved_owner() {
        let mut ct = table();
        owner_mut(&mut ct, "CUST-ORDER").set_key("CUST-ORDER", 9);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 9);
    }

    #[test]
    fn override_ignored_on_owner_row() {
        let mut ct = table();
        let owner = owner_mut(&mut ct, "CUST-ORDER");
        owner.set_key("CUSTOMER_ID", 7);
        owner.set_key("CUST-ORDER", 9);
        ct.set_position("CUST-ORDER", PositionCode::OnOwnerRow, ActionCode::Fetched);
        assert_eq!(ct.list_owner_id("CUST-ORDER", true), 7);
    }

    #[test]
    fn ownerless_set_uses_member_foreign_key() {
        let mut ct = table();
        ct.register_list(ListCurrency::junction(
            "SYSTEM-ORDER",
            "CUSTOMER_ID",
            None,
            Some(&order()),
            "system_order",
            "SO_ID",
        ))
        .unwrap();
        member_mut(&mut ct, "SYSTEM-ORDER").set_key("CUSTOMER_ID", 31);
        assert_eq!(ct.list_owner_id("SYSTEM-ORDER", false), 31);
        assert_eq!(ct.list_owner_name("SYSTEM-ORDER"), "");
        assert_eq!(ct.list_member_name("SYSTEM-ORDER"), "ORDER");
    }

    #[test]
    fn junction_owner_prefers_member_link() {
        let mut ct = table();
        ct.register_list(ListCurrency::junction(
            "ORDER_ITEMS",
            "ORDER_ID",
            Some(&customer()),
            Some(&order()),
            "order_items",
            "ORDER_ITEM_ID",
        ))
        .unwrap();
        member_mut(&mut ct, "ORDER_ITEMS").set_key("ORDER_ITEMS", 501);
        owner_mut(&mut ct, "ORDER_ITEMS").set_key("CUSTOMER_ID", 3);

        assert_eq!(ct.junction_list_owner_id("ORDER_ITEMS"), 3);
        ct.set_position("ORDER_ITEMS", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.junction_list_owner_id("ORDER_ITEMS"), 501);
    }

    #[test]
    fn junction_without_owner_is_zero() {
        let mut ct = table();
        ct.register_list(ListCurrency::junction(
            "ORDER_ITEMS",
            "ORDER_ID",
            None,
            Some(&order()),
            "order_items",
            "ORDER_ITEM_ID",
        ))
        .unwrap();
        member_mut(&mut ct, "ORDER_ITEMS").set_key("ORDER_ITEMS", 501);
        assert_eq!(ct.junction_list_owner_id("ORDER_ITEMS"), 0);
    }

    #[test]
    fn name_lookups() {
        let ct = table();
        assert_eq!(ct.list_member_name("CUST-ORDER"), "ORDER");
        assert_eq!(ct.list_owner_name("CUST-ORDER"), "CUSTOMER");
        assert_eq!(ct.list_key_name("CUST-ORDER"), "CUSTOMER_ID");
        let mut names: Vec<&str> = ct.record_names().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["CUSTOMER", "ORDER"]);
        assert_eq!(ct.list_names().count(), 1);
    }

    #[test]
    fn run_unit_currency() {
        let mut ct = table();
        assert!(!ct.set_current_of_run_unit("UNKNOWN"));
        ct.record_mut("ORDER").unwrap().set_key("ORDER_ID", 88);
        assert!(ct.set_current_of_run_unit("ORDER"));
        assert_eq!(ct.current_record_name(), "ORDER");
        assert_eq!(ct.current_of_run_unit(), 88);
    }

    #[test]
    fn sync_record_refreshes_snapshots() {
        let mut ct = table();
        let order = ct.record_mut("ORDER").unwrap();
        order.set_key("ORDER_ID", 12);
        order.set_key("CUSTOMER_ID", 4);
        order.set_action(ActionCode::Fetched);
        ct.sync_record("ORDER");
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 12);
        assert_eq!(ct.list_owner_id("CUST-ORDER", false), 4);
    }

    #[test]
    fn sync_record_in_touches_one_set() {
        let mut ct = table();
        ct.register_list(ListCurrency::pair(
            "CUST-ORDER-ARCHIVE",
            "CUSTOMER_ID",
            &customer(),
            &order(),
        ))
        .unwrap();
        ct.record_mut("ORDER").unwrap().set_key("ORDER_ID", 12);
        assert!(ct.sync_record_in("ORDER", "CUST-ORDER"));
        assert!(!ct.sync_record_in("ORDER", "UNKNOWN"));
        assert!(!ct.sync_record_in("UNKNOWN", "CUST-ORDER"));

        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        ct.set_position("CUST-ORDER-ARCHIVE", PositionCode::OnMemberRow, ActionCode::Fetched);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 12);
        assert_eq!(ct.list_member_id("CUST-ORDER-ARCHIVE"), 0);
    }

    #[test]
    fn names_match_case_sensitively() {
        let mut ct = table();
        assert!(ct.record("order").is_none());
        assert_eq!(ct.list_key_name("cust-order"), "");
        ct.register_record(RecordCurrency::new("customer", "customer_v2", "customer_id"))
            .unwrap();
        assert_eq!(ct.record_names().count(), 3);

        ct.record_mut("ORDER").unwrap().set_key("order_id", 3);
        assert_eq!(ct.table_current_id("ORDER"), 0);
        ct.record_mut("ORDER").unwrap().set_key("ORDER_ID", 3);
        assert_eq!(ct.table_current_id("ORDER"), 3);
    }

    #[test]
    fn clear_keeps_shapes() {
        let mut ct = table();
        ct.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 7);
        member_mut(&mut ct, "CUST-ORDER").set_key("ORDER_ID", 15);
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        ct.set_current_of_run_unit("CUSTOMER");

        ct.clear_currency();

        assert_eq!(ct.table_current_id("CUSTOMER"), 0);
        assert_eq!(ct.list_member_id("CUST-ORDER"), 0);
        assert_eq!(ct.list_owner_id("CUST-ORDER", true), 0);
        assert_eq!(ct.current_of_run_unit(), 0);
        let list = ct.list("CUST-ORDER").unwrap();
        assert_eq!(list.position_code, PositionCode::OnNone);
        assert_eq!(list.action_code, ActionCode::NoRow);
        assert_eq!(ct.list_key_name("CUST-ORDER"), "CUSTOMER_ID");
        assert_eq!(ct.list_owner_name("CUST-ORDER"), "CUSTOMER");
    }

    #[test]
    fn clone_is_deep() {
        let mut source = table();
        source.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 1);
        let mut copy = source.clone();

        copy.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 2);
        copy.set_position("CUST-ORDER", PositionCode::OnOwnerRow, ActionCode::Updated);
        owner_mut(&mut copy, "CUST-ORDER").set_key("CUSTOMER_ID", 2);

        assert_eq!(source.table_current_id("CUSTOMER"), 1);
        let list = source.list("CUST-ORDER").unwrap();
        assert_eq!(list.position_code, PositionCode::OnNone);
        assert_eq!(list.owner_currency.as_ref().unwrap().current_id(), 0);

        source.record_mut("CUSTOMER").unwrap().set_action(ActionCode::DeletedRow);
        assert_eq!(
            copy.record("CUSTOMER").unwrap().action_code,
            ActionCode::NoAction
        );
    }

    #[test]
    fn save_and_restore() {
        let mut ct = table();
        ct.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 5);
        ct.save();
        assert_eq!(ct.stack_depth(), 1);
        ct.record_mut("CUSTOMER").unwrap().set_key("CUSTOMER_ID", 6);
        ct.set_position("CUST-ORDER", PositionCode::OnOwnerRow, ActionCode::Fetched);
        assert!(ct.restore());
        assert_eq!(ct.table_current_id("CUSTOMER"), 5);
        assert_eq!(ct.list("CUST-ORDER").unwrap().position_code, PositionCode::OnNone);
        assert!(!ct.restore());
    }

    #[test]
    fn json_snapshot_round_trip() {
        let mut ct = table();
        member_mut(&mut ct, "CUST-ORDER").set_key("ORDER_ID", "A-17");
        ct.set_position("CUST-ORDER", PositionCode::OnMemberRow, ActionCode::Fetched);
        let saved = ct.to_json().unwrap();
        let resumed = CurrencyTable::from_json(&saved).unwrap();
        assert_eq!(resumed, ct);
        assert_eq!(resumed.conversation_name(), "CONV1");
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        assert!(matches!(
            CurrencyTable::from_json("{not json"),
            Err(CurrencyError::Snapshot(_))
        ));
    }
}
