// Entity records - one typed struct per table
//
// Each record has named optional fields for the columns we understand plus
// an `extra` map holding every other non-blank column. Records are built
// from a `RowView`, so header order never matters.

pub mod activity;
pub mod call_list;
pub mod candidate;
pub mod company;
pub mod hire;
pub mod job;

pub use activity::{parse_timestamp, Activity};
pub use call_list::{CallList, CallListItem};
pub use candidate::Candidate;
pub use company::Company;
pub use hire::Hire;
pub use job::Job;

use crate::error::Result;
use crate::store::TableStore;
use crate::table::{self, RowView, Table};

/// Entity - a typed view of one table row
pub trait Entity: Sized {
    /// Backing table
    const TABLE: Table;

    /// Column holding the row's identifier
    const ID_FIELD: &'static str;

    /// Build the record from a row
    fn from_row(row: RowView<'_>) -> Self;

    /// Identifier value (may be empty)
    fn id(&self) -> &str;
}

/// Read the entity's table and convert every row, in table order
pub fn load<E: Entity>(store: &dyn TableStore) -> Result<Vec<E>> {
    let snapshot = table::read(store, E::TABLE)?;
    Ok(snapshot.iter().map(E::from_row).collect())
}

/// Serde helper: skip `None` and empty extras maps
pub(crate) fn is_empty_map(map: &std::collections::BTreeMap<String, String>) -> bool {
    map.is_empty()
}
