// In-memory table store
//
// Holds tables behind an RwLock so one handle can be shared across
// components. Used as the fake in tests and as a scratch store.

use super::TableStore;
use crate::error::{Result, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<String, Vec<Vec<String>>>>>,
}

impl MemoryStore {
    /// Create new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a table with a header and data rows
    pub fn with_table(self, name: &str, header: &[&str], rows: &[&[&str]]) -> Self {
        // Builder runs before the store is shared, so the lock cannot be poisoned
        if let Ok(mut tables) = self.tables.write() {
            let mut all = Vec::with_capacity(rows.len() + 1);
            all.push(header.iter().map(|h| h.to_string()).collect());
            for row in rows {
                all.push(row.iter().map(|c| c.to_string()).collect());
            }
            tables.insert(name.to_string(), all);
        }
        self
    }

    /// Create (or replace) a table with only a header row
    pub fn create_table(&self, name: &str, header: &[String]) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        tables.insert(name.to_string(), vec![header.to_vec()]);
        Ok(())
    }

    /// Number of data rows (header excluded), or None if the table is missing
    pub fn row_count(&self, name: &str) -> Option<usize> {
        let tables = self.tables.read().ok()?;
        tables.get(name).map(|rows| rows.len().saturating_sub(1))
    }
}

impl TableStore for MemoryStore {
    fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::table_not_found(table))
    }

    fn append(&self, table: &str, values: &[String]) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::table_not_found(table))?;
        rows.push(values.to_vec());
        Ok(())
    }

    fn exists(&self, table: &str) -> Result<bool> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.contains_key(table))
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
