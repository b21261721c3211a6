// Table Reader + Header Index
// Turns raw store rows into a header-indexed snapshot

use crate::error::Result;
use crate::store::TableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// LOGICAL TABLES
// ============================================================================

/// Table - the logical tables this crate knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Table {
    Jobs,
    Companies,
    Candidates,
    CallLists,
    CallListsItems,
    Activities,
    Hires,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Jobs,
        Table::Companies,
        Table::Candidates,
        Table::CallLists,
        Table::CallListsItems,
        Table::Activities,
        Table::Hires,
    ];

    /// Name of the table in the backing store
    pub fn name(&self) -> &'static str {
        match self {
            Table::Jobs => "Jobs",
            Table::Companies => "Companies",
            Table::Candidates => "Candidates",
            Table::CallLists => "CallLists",
            Table::CallListsItems => "CallListsItems",
            Table::Activities => "Activities",
            Table::Hires => "Hires",
        }
    }

    /// Required tables fail with `TableNotFound` when missing; optional
    /// tables read as empty.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Table::Jobs | Table::Companies | Table::Candidates | Table::Activities
        )
    }
}

// ============================================================================
// HEADER INDEX
// ============================================================================

/// Column name → position, built once per table read.
///
/// Names are matched verbatim (case-sensitive). Surrounding whitespace in
/// header cells is ignored, empty header cells are skipped and the first
/// occurrence of a duplicated name wins.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    width: usize,
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn build(header: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(header.len());
        let mut columns = Vec::with_capacity(header.len());

        for (i, raw) in header.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() || positions.contains_key(name) {
                continue;
            }
            positions.insert(name.to_string(), i);
            columns.push(name.to_string());
        }

        HeaderIndex {
            width: header.len(),
            columns,
            positions,
        }
    }

    /// Position of a column, `None` when absent
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Mapped column names in header order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Number of cells in the raw header row, blanks included
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// ROW VIEW
// ============================================================================

/// One raw row seen through its table's header index
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    index: &'a HeaderIndex,
    cells: &'a [String],
}

impl<'a> RowView<'a> {
    pub fn new(index: &'a HeaderIndex, cells: &'a [String]) -> Self {
        RowView { index, cells }
    }

    /// Cell value for a column; absent column or short row → ""
    pub fn get(&self, name: &str) -> &'a str {
        self.index
            .position(name)
            .and_then(|i| self.cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Trimmed cell value, `None` when absent or blank
    pub fn opt(&self, name: &str) -> Option<String> {
        let value = self.get(name).trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    /// First non-blank value among alias columns (e.g. `Notes` / `Comments`)
    pub fn first_of(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.opt(name))
    }

    /// Every non-blank column not listed in `known`
    pub fn extras(&self, known: &[&str]) -> std::collections::BTreeMap<String, String> {
        self.index
            .columns()
            .iter()
            .filter(|name| !known.contains(&name.as_str()))
            .filter_map(|name| {
                let value = self.get(name);
                if value.is_empty() {
                    None
                } else {
                    Some((name.clone(), value.to_string()))
                }
            })
            .collect()
    }

    pub fn index(&self) -> &'a HeaderIndex {
        self.index
    }

    pub fn cells(&self) -> &'a [String] {
        self.cells
    }
}

// ============================================================================
// TABLE SNAPSHOT
// ============================================================================

/// A full read of one table: header index plus data rows (header excluded)
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub name: String,
    pub index: HeaderIndex,
    pub rows: Vec<Vec<String>>,
}

impl TableSnapshot {
    pub fn empty(name: &str) -> Self {
        TableSnapshot {
            name: name.to_string(),
            index: HeaderIndex::default(),
            rows: Vec::new(),
        }
    }

    fn from_raw(name: &str, mut raw: Vec<Vec<String>>) -> Self {
        if raw.is_empty() {
            return Self::empty(name);
        }
        let header = raw.remove(0);
        TableSnapshot {
            name: name.to_string(),
            index: HeaderIndex::build(&header),
            rows: raw,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in table order
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.rows.iter().map(move |cells| RowView::new(&self.index, cells))
    }
}

// ============================================================================
// READERS
// ============================================================================

/// Read a table; a missing table is an error.
pub fn read_table(store: &dyn TableStore, name: &str) -> Result<TableSnapshot> {
    let raw = store.read_all(name)?;
    let snapshot = TableSnapshot::from_raw(name, raw);
    tracing::debug!(
        table = name,
        backend = store.backend(),
        rows = snapshot.len(),
        "table read"
    );
    Ok(snapshot)
}

/// Read a table; a missing table reads as empty.
pub fn read_optional_table(store: &dyn TableStore, name: &str) -> Result<TableSnapshot> {
    match read_table(store, name) {
        Ok(snapshot) => Ok(snapshot),
        Err(e) if e.is_table_not_found() => {
            tracing::warn!(table = name, "optional table missing, treated as empty");
            Ok(TableSnapshot::empty(name))
        }
        Err(e) => Err(e),
    }
}

/// Read a logical table applying its required/optional policy
pub fn read(store: &dyn TableStore, table: Table) -> Result<TableSnapshot> {
    if table.is_required() {
        read_table(store, table.name())
    } else {
        read_optional_table(store, table.name())
    }
}
