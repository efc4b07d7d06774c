//! List (set) currency -- the current position within one owner/member set.
//!
//! A list currency keeps private snapshots of its owner and member record
//! currencies.  The record-access layer refreshes those snapshots as rows
//! are fetched; they never alias the session's canonical record entries, so
//! a plain `clone()` is already a deep copy.
//!
//! Three set shapes exist:
//!
//! - **Pair** -- one owner record type, one member record type
//! - **Junction** -- many-to-many, realised through a junction table
//! - **Multi-member** -- the member may be one of several record types,
//!   told apart by a type discriminator

use serde::{Deserialize, Serialize};

use crate::codasyl::{ListDuplicates, ListOptions, ListOrder};
use crate::record::{ActionCode, RecordCurrency};

/// Suffix marking a sort key that is fed by a database sequence.
const SEQUENCE_SUFFIX: &str = "SEQ";

// ---------------------------------------------------------------------------
//  Position and shape
// ---------------------------------------------------------------------------

/// Last resolved position within a set occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionCode {
    /// Not positioned.
    #[default]
    OnNone,
    /// Positioned on the owner row.
    OnOwnerRow,
    /// Positioned on a member row.
    OnMemberRow,
}

/// Structural shape of a set, derived from which metadata is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// Single owner/member pair.
    Pair,
    /// Many-to-many through a junction table.
    Junction,
    /// Several possible member record types.
    MultiMember,
}

/// Junction table metadata for many-to-many sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctionTable {
    /// Junction table name.
    pub table_name: Option<String>,
    /// Identity column of the junction table.
    pub junction_id: Option<String>,
    /// Foreign key from the junction table to the member.
    pub foreign_key: Option<String>,
}

/// Member-side metadata for multi-member sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiMember {
    /// One snapshot per possible member record type, in declaration order.
    pub member_list: Vec<RecordCurrency>,
    /// Column ordering members within the set.
    pub sort_key: Option<String>,
    /// Column holding the member type discriminator.
    pub type_key: Option<String>,
}

// ---------------------------------------------------------------------------
//  List currency
// ---------------------------------------------------------------------------

/// Currency of one set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCurrency {
    /// Set name (e.g., `CUSTOMER-ORDER`).
    pub list_name: String,
    /// Foreign-key column linking member rows to their owner.
    pub key_name: String,
    /// Last resolved position.
    pub position_code: PositionCode,
    /// Last action taken within this set.
    pub action_code: ActionCode,
    /// Owner-side snapshot; absent for sets without an owner record type.
    pub owner_currency: Option<RecordCurrency>,
    /// Member-side snapshot.
    pub member_currency: Option<RecordCurrency>,
    /// Junction metadata, for many-to-many sets.
    pub junction: Option<JunctionTable>,
    /// Multi-member metadata.
    pub multi_member: Option<MultiMember>,
    /// Database sequence driving member order, when not using natural keys.
    pub sequence_name: Option<String>,
    /// Membership class.
    pub list_options: ListOptions,
    /// Insertion order.
    pub list_order: ListOrder,
    /// Duplicate key handling.
    pub list_duplicates: ListDuplicates,
}

impl ListCurrency {
    fn base(list_name: &str, key_name: &str) -> Self {
        Self {
            list_name: list_name.to_string(),
            key_name: key_name.to_string(),
            position_code: PositionCode::OnNone,
            action_code: ActionCode::NoAction,
            owner_currency: None,
            member_currency: None,
            junction: None,
            multi_member: None,
            sequence_name: None,
            list_options: ListOptions::default(),
            list_order: ListOrder::default(),
            list_duplicates: ListDuplicates::default(),
        }
    }

    /// Owner/member pair.
    pub fn pair(
        list_name: &str,
        key_name: &str,
        owner: &RecordCurrency,
        member: &RecordCurrency,
    ) -> Self {
        Self {
            owner_currency: Some(owner.clone()),
            member_currency: Some(member.clone()),
            ..Self::base(list_name, key_name)
        }
    }

    /// Owner/member pair ordered by a system-generated sequence.
    pub fn pair_with_sequence(
        list_name: &str,
        key_name: &str,
        owner: &RecordCurrency,
        member: &RecordCurrency,
        sequence_name: &str,
    ) -> Self {
        Self {
            sequence_name: Some(sequence_name.to_string()),
            ..Self::pair(list_name, key_name, owner, member)
        }
    }

    /// Owner/member pair linked through a junction table.
    pub fn pair_with_junction(
        list_name: &str,
        key_name: &str,
        owner: &RecordCurrency,
        member: &RecordCurrency,
        junction_table: &str,
        junction_foreign_key: &str,
    ) -> Self {
        Self {
            junction: Some(JunctionTable {
                table_name: Some(junction_table.to_string()),
                junction_id: None,
                foreign_key: Some(junction_foreign_key.to_string()),
            }),
            ..Self::pair(list_name, key_name, owner, member)
        }
    }

    /// Junction table identified by its own identity column.  Either side
    /// may be missing.
    pub fn junction(
        list_name: &str,
        key_name: &str,
        owner: Option<&RecordCurrency>,
        member: Option<&RecordCurrency>,
        junction_table: &str,
        junction_id: &str,
    ) -> Self {
        Self {
            owner_currency: owner.cloned(),
            member_currency: member.cloned(),
            junction: Some(JunctionTable {
                table_name: Some(junction_table.to_string()),
                junction_id: Some(junction_id.to_string()),
                foreign_key: None,
            }),
            ..Self::base(list_name, key_name)
        }
    }

    /// Multi-member set discriminated by sort and type keys.
    ///
    /// A sort key ending in `SEQ` names the sequence that orders members.
    pub fn multi_member(
        list_name: &str,
        key_name: &str,
        owner: Option<&RecordCurrency>,
        members: &[RecordCurrency],
        sort_key: Option<&str>,
        type_key: Option<&str>,
    ) -> Self {
        let sequence_name = sort_key
            .filter(|k| k.to_ascii_uppercase().ends_with(SEQUENCE_SUFFIX))
            .map(str::to_string);
        Self {
            owner_currency: owner.cloned(),
            multi_member: Some(MultiMember {
                member_list: members.to_vec(),
                sort_key: sort_key.map(str::to_string),
                type_key: type_key.map(str::to_string),
            }),
            sequence_name,
            ..Self::base(list_name, key_name)
        }
    }

    /// Multi-member set whose members are reached through a junction table
    /// and ordered by a sequence.
    pub fn multi_member_with_junction(
        list_name: &str,
        key_name: &str,
        owner: Option<&RecordCurrency>,
        members: &[RecordCurrency],
        junction_id: &str,
        sequence_name: Option<&str>,
    ) -> Self {
        Self {
            owner_currency: owner.cloned(),
            multi_member: Some(MultiMember {
                member_list: members.to_vec(),
                sort_key: None,
                type_key: None,
            }),
            junction: Some(JunctionTable {
                table_name: None,
                junction_id: Some(junction_id.to_string()),
                foreign_key: None,
            }),
            sequence_name: sequence_name.map(str::to_string),
            ..Self::base(list_name, key_name)
        }
    }

    /// Attach the legacy set semantics.
    pub fn with_semantics(
        mut self,
        options: ListOptions,
        order: ListOrder,
        duplicates: ListDuplicates,
    ) -> Self {
        self.list_options = options;
        self.list_order = order;
        self.list_duplicates = duplicates;
        self
    }

    /// Which of the three shapes this set has.
    pub fn shape(&self) -> ListShape {
        if self.multi_member.is_some() {
            ListShape::MultiMember
        } else if self.junction.is_some() {
            ListShape::Junction
        } else {
            ListShape::Pair
        }
    }

    /// Owner record name; `None` for a set without an owner record type.
    pub fn owner_name(&self) -> Option<&str> {
        self.owner_currency.as_ref().map(|r| r.record_name.as_str())
    }

    /// Record name of the current member snapshot.
    pub fn member_name(&self) -> Option<&str> {
        self.member_currency.as_ref().map(|r| r.record_name.as_str())
    }

    /// Record the outcome of a navigational step within this set.
    pub fn set_position(&mut self, position: PositionCode, action: ActionCode) {
        self.position_code = position;
        self.action_code = action;
    }

    /// Member snapshots of a multi-member set; empty for other shapes.
    pub fn member_list(&self) -> &[RecordCurrency] {
        self.multi_member
            .as_ref()
            .map(|m| m.member_list.as_slice())
            .unwrap_or_default()
    }

    /// Member snapshot whose record or table name matches a type
    /// discriminator value.
    pub fn member_for_type(&self, type_value: &str) -> Option<&RecordCurrency> {
        let wanted = type_value.trim();
        self.member_list().iter().find(|m| {
            m.record_name.eq_ignore_ascii_case(wanted) || m.table_name.eq_ignore_ascii_case(wanted)
        })
    }

    /// Mutable form of [`member_for_type`](Self::member_for_type).
    pub fn member_for_type_mut(&mut self, type_value: &str) -> Option<&mut RecordCurrency> {
        let wanted = type_value.trim();
        self.multi_member.as_mut()?.member_list.iter_mut().find(|m| {
            m.record_name.eq_ignore_ascii_case(wanted) || m.table_name.eq_ignore_ascii_case(wanted)
        })
    }

    /// Make the member type named by `type_value` the current member.
    /// Returns `false` if no member type matches.
    pub fn select_member(&mut self, type_value: &str) -> bool {
        match self.member_for_type(type_value).cloned() {
            Some(member) => {
                self.member_currency = Some(member);
                true
            }
            None => false,
        }
    }

    /// Refresh every snapshot of `record` held by this set.
    pub(crate) fn refresh_snapshots(&mut self, record: &RecordCurrency) {
        let name = record.record_name.as_str();
        for snapshot in [self.owner_currency.as_mut(), self.member_currency.as_mut()]
            .into_iter()
            .flatten()
        {
            if snapshot.record_name == name {
                snapshot.absorb(record);
            }
        }
        if let Some(multi) = self.multi_member.as_mut() {
            for snapshot in multi.member_list.iter_mut().filter(|m| m.record_name == name) {
                snapshot.absorb(record);
            }
        }
    }

    /// Drop every snapshot's keys and reset position and action.
    pub(crate) fn clear(&mut self) {
        if let Some(owner) = self.owner_currency.as_mut() {
            owner.drop_currency_keys();
        }
        if let Some(member) = self.member_currency.as_mut() {
            member.drop_currency_keys();
        }
        if let Some(multi) = self.multi_member.as_mut() {
            multi
                .member_list
                .iter_mut()
                .for_each(RecordCurrency::drop_currency_keys);
        }
        self.action_code = ActionCode::NoRow;
        self.position_code = PositionCode::OnNone;
    }
}

// ---------------------------------------------------------------------------
//  Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::KeyValue;

    fn customer() -> RecordCurrency {
        RecordCurrency::new("CUSTOMER", "customer", "CUSTOMER_ID")
    }

    fn order() -> RecordCurrency {
        RecordCurrency::new("ORDER", "orders", "ORDER_ID")
    }

    fn note() -> RecordCurrency {
        RecordCurrency::new("NOTE", "notes", "NOTE_ID")
    }

    #[test]
    fn construction_starts_unpositioned() {
        let list = ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &customer(), &order());
        assert_eq!(list.position_code, PositionCode::OnNone);
        assert_eq!(list.action_code, ActionCode::NoAction);
        assert_eq!(list.shape(), ListShape::Pair);
        assert_eq!(list.owner_name(), Some("CUSTOMER"));
        assert_eq!(list.member_name(), Some("ORDER"));
    }

    #[test]
    fn construction_copies_caller_records() {
        let mut owner = customer();
        let list = ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &owner, &order());
        owner.set_key("CUSTOMER_ID", 99);
        assert_eq!(list.owner_currency.as_ref().unwrap().current_id(), 0);
    }

    #[test]
    fn sequence_and_junction_shapes() {
        let seq = ListCurrency::pair_with_sequence("S", "FK", &customer(), &order(), "ORDER_SEQ");
        assert_eq!(seq.sequence_name.as_deref(), Some("ORDER_SEQ"));
        assert_eq!(seq.shape(), ListShape::Pair);

        let jt = ListCurrency::pair_with_junction("S", "FK", &customer(), &order(), "cust_order", "ORDER_ID");
        assert_eq!(jt.shape(), ListShape::Junction);
        let junction = jt.junction.as_ref().unwrap();
        assert_eq!(junction.table_name.as_deref(), Some("cust_order"));
        assert_eq!(junction.foreign_key.as_deref(), Some("ORDER_ID"));

        let ji = ListCurrency::junction("S", "FK", None, Some(&order()), "cust_order", "CO_ID");
        assert_eq!(ji.shape(), ListShape::Junction);
        assert!(ji.owner_currency.is_none());
        assert_eq!(ji.junction.unwrap().junction_id.as_deref(), Some("CO_ID"));
    }

    #[test]
    fn sort_key_suffix_names_sequence() {
        let members = [order(), note()];
        let list = ListCurrency::multi_member(
            "CUST-ACTIVITY",
            "CUSTOMER_ID",
            Some(&customer()),
            &members,
            Some("ACTIVITY_SEQ"),
            Some("ACTIVITY_TYPE"),
        );
        assert_eq!(list.shape(), ListShape::MultiMember);
        assert_eq!(list.sequence_name.as_deref(), Some("ACTIVITY_SEQ"));

        let plain = ListCurrency::multi_member(
            "CUST-ACTIVITY",
            "CUSTOMER_ID",
            None,
            &members,
            Some("ACTIVITY_DATE"),
            None,
        );
        assert!(plain.sequence_name.is_none());
    }

    #[test]
    fn multi_member_with_junction_shape() {
        let list = ListCurrency::multi_member_with_junction(
            "S",
            "FK",
            Some(&customer()),
            &[order(), note()],
            "LINK_ID",
            Some("LINK_SEQ"),
        );
        assert_eq!(list.shape(), ListShape::MultiMember);
        assert_eq!(list.member_list().len(), 2);
        assert_eq!(list.sequence_name.as_deref(), Some("LINK_SEQ"));
    }

    #[test]
    fn member_selection_by_type() {
        let mut list = ListCurrency::multi_member(
            "CUST-ACTIVITY",
            "CUSTOMER_ID",
            Some(&customer()),
            &[order(), note()],
            None,
            Some("ACTIVITY_TYPE"),
        );
        assert!(list.member_for_type("notes").is_some());
        assert!(list.select_member("NOTE"));
        assert_eq!(list.member_name(), Some("NOTE"));
        assert!(!list.select_member("INVOICE"));
        assert_eq!(list.member_name(), Some("NOTE"));
    }

    #[test]
    fn multi_member_clone_shares_nothing() {
        let mut original = ListCurrency::multi_member(
            "CUST-ACTIVITY",
            "CUSTOMER_ID",
            Some(&customer()),
            &[order(), note()],
            None,
            Some("ACTIVITY_TYPE"),
        );
        original
            .member_for_type_mut("ORDER")
            .unwrap()
            .set_key("ORDER_ID", 10);

        let mut copy = original.clone();
        copy.member_for_type_mut("ORDER")
            .unwrap()
            .set_key("ORDER_ID", 20);
        copy.set_position(PositionCode::OnMemberRow, ActionCode::Fetched);

        assert_eq!(original.member_for_type("ORDER").unwrap().current_id(), 10);
        assert_eq!(original.position_code, PositionCode::OnNone);
        assert_eq!(copy.member_for_type("ORDER").unwrap().current_id(), 20);
    }

    #[test]
    fn clear_resets_snapshots_and_position() {
        let mut list = ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &customer(), &order());
        list.member_currency.as_mut().unwrap().set_key("ORDER_ID", 4);
        list.set_position(PositionCode::OnMemberRow, ActionCode::Fetched);
        list.clear();
        assert_eq!(list.position_code, PositionCode::OnNone);
        assert_eq!(list.action_code, ActionCode::NoRow);
        assert_eq!(
            list.member_currency.as_ref().unwrap().key("ORDER_ID"),
            &KeyValue::Absent
        );
        assert_eq!(list.key_name, "CUSTOMER_ID");
    }

    #[test]
    fn refresh_updates_matching_snapshots_only() {
        let mut list = ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &customer(), &order());
        let mut fetched = order();
        fetched.set_key("ORDER_ID", 77);
        fetched.set_action(ActionCode::Fetched);
        list.refresh_snapshots(&fetched);
        let member = list.member_currency.as_ref().unwrap();
        assert_eq!(member.current_id(), 77);
        assert_eq!(member.action_code, ActionCode::Fetched);
        assert_eq!(list.owner_currency.as_ref().unwrap().current_id(), 0);
    }
}
