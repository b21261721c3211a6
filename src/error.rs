// Error types for table access and dispatch
//
// Only structural problems are errors. A lookup that finds nothing is a
// normal outcome: `None`, an empty list or a placeholder record.

use thiserror::Error;

/// Errors surfaced by stores, readers, the resolver and the writer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Table not found in the backing store
    #[error("Table '{table}' not found")]
    TableNotFound { table: String },

    /// Dispatcher entity tag not recognised
    #[error("Unknown entity '{0}'")]
    UnknownEntity(String),

    /// Dispatcher request lacks an option the entity needs
    #[error("Entity '{entity}' requires option '{option}'")]
    MissingOption {
        entity: &'static str,
        option: &'static str,
    },

    /// Lock poisoned (RwLock/Mutex poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn table_not_found(table: &str) -> Self {
        StoreError::TableNotFound {
            table: table.to_string(),
        }
    }

    /// True for the "table is missing" case, which optional readers tolerate.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, StoreError::TableNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
