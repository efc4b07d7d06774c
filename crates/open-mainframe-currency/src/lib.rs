#![forbid(unsafe_code)]
//! IDMS currency engine for relational backends.
//!
//! Lets navigational (CODASYL) programs run against a relational store by
//! reproducing the run-unit currency the IDMS engine kept.  This crate
//! provides:
//!
//! - **Status Taxonomy** -- IDMS return codes and their predicates
//! - **Record Currency** -- current key values of each record type
//! - **List Currency** -- current position within each set, including
//!   junction-table and multi-member sets
//! - **Currency Table** -- session-scoped owner/member resolution
//! - **Record-Access Hooks** -- default currency maintenance for generated code
//! - **Key Normalizer** -- fixed-width keys matching legacy collation and
//!   packed-decimal ordering
//!
//! # Example
//!
//! ```rust
//! use open_mainframe_currency::{
//!     ActionCode, CurrencyTable, ListCurrency, PositionCode, RecordCurrency, SessionContext,
//! };
//!
//! let customer = RecordCurrency::new("CUSTOMER", "customer", "CUSTOMER_ID");
//! let order = RecordCurrency::new("ORDER", "orders", "ORDER_ID").with_key("CUSTOMER_ID");
//!
//! let mut table = CurrencyTable::new(SessionContext::new("CONV1", "JSMITH", "ORDPGM"));
//! table.register_record(customer.clone()).unwrap();
//! table.register_record(order.clone()).unwrap();
//! table
//!     .register_list(ListCurrency::pair("CUST-ORDER", "CUSTOMER_ID", &customer, &order))
//!     .unwrap();
//!
//! let list = table.list_mut("CUST-ORDER").unwrap();
//! list.member_currency.as_mut().unwrap().set_key("CUSTOMER_ID", 42);
//! list.set_position(PositionCode::OnMemberRow, ActionCode::Fetched);
//!
//! assert_eq!(table.list_owner_id("CUST-ORDER", false), 42);
//! ```

pub mod access;
pub mod codasyl;
pub mod config;
pub mod currency;
pub mod error;
pub mod keys;
pub mod list;
pub mod record;
pub mod session;
pub mod status;
pub mod value;

pub use access::RecordAccess;
pub use codasyl::{CurrencySchema, ListDuplicates, ListOptions, ListOrder, RecordDef, SetDef};
pub use config::{CurrencyConfig, KeyConfig, TargetPlatform};
pub use currency::CurrencyTable;
pub use error::{CurrencyError, Result};
pub use keys::{
    normalize_binary_key, normalize_field, FieldType, KeyNormalizer, KeySegment, SortOrder,
};
pub use list::{JunctionTable, ListCurrency, ListShape, MultiMember, PositionCode};
pub use record::{ActionCode, ListRole, RecordCurrency};
pub use session::SessionContext;
pub use status::{ReturnCode, StatusCode};
pub use value::KeyValue;
