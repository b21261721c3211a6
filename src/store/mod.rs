// Table Store - the backing tabular engine behind one small trait
//
// Every component receives a `TableStore` handle explicitly, so the same
// resolver code runs against CSV files, SQLite or an in-memory fake.

pub mod csv_dir;
pub mod memory;
pub mod sqlite;

pub use csv_dir::CsvStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// TableStore - Core trait (minimal, required)
///
/// Storage is a set of named tables. Each table is an ordered sequence of
/// rows, the first of which is the header.
pub trait TableStore: Send + Sync {
    /// Read every row of `table`, header row first.
    ///
    /// # Returns
    /// * `Ok(rows)` - header followed by data rows (may be empty)
    /// * `Err(StoreError::TableNotFound)` - if the table does not exist
    fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>>;

    /// Append one row of ordered values to `table`.
    fn append(&self, table: &str, values: &[String]) -> Result<()>;

    /// Existence check.
    fn exists(&self, table: &str) -> Result<bool>;

    /// Short backend name for logs
    fn backend(&self) -> &str {
        "unknown"
    }
}
