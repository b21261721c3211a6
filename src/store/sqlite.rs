// SQLite table store
//
// Each logical table is a SQL table with one TEXT column per header cell.
// Spreadsheet headers may hold blanks and duplicates, so SQL column names
// are made unique and the raw header row is kept in `_talent_headers`.
// Rows come back in rowid order with every value stringified, so the rest
// of the crate never sees SQL types.

use super::TableStore;
use crate::error::{Result, StoreError};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Raw header rows, JSON-encoded, keyed by table name
const HEADERS_TABLE: &str = "_talent_headers";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Quote an identifier for SQL ("a""b" style)
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

/// SQL column names for a header row, one per cell.
///
/// Blank cells become `column_<n>` (1-based). Names are unique ignoring
/// case and never shadow `rowid`; clashes get a `_2`, `_3`.. suffix.
fn column_names(header: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = ["rowid", "oid", "_rowid_"].iter().map(|s| s.to_string()).collect();

    header
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let base = match raw.trim() {
                "" => format!("column_{}", i + 1),
                name => name.to_string(),
            };
            let mut name = base.clone();
            let mut n = 2;
            while !seen.insert(name.to_lowercase()) {
                name = format!("{}_{}", base, n);
                n += 1;
            }
            name
        })
        .collect()
}

/// Values cut or padded with "" to the table width
fn fit_row(values: &[String], width: usize) -> Vec<&str> {
    let mut row: Vec<&str> = values.iter().take(width).map(String::as_str).collect();
    row.resize(width, "");
    row
}

fn insert_sql(table: &str, width: usize) -> String {
    format!(
        "INSERT INTO {} VALUES ({})",
        quote_ident(table),
        vec!["?"; width].join(", ")
    )
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        // Enable WAL mode for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} (name TEXT PRIMARY KEY, header TEXT NOT NULL)",
                HEADERS_TABLE
            ),
            [],
        )?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Create a table for the given header row; no-op if it already exists
    pub fn create_table(&self, table: &str, header: &[String]) -> Result<()> {
        let conn = self.lock()?;
        Self::create_table_in(&conn, table, header)
    }

    /// Drop a table if present
    pub fn drop_table(&self, table: &str) -> Result<()> {
        let conn = self.lock()?;
        Self::drop_table_in(&conn, table)
    }

    /// Copy whole tables from another store (header + rows), replacing any
    /// existing table of the same name.
    ///
    /// Tables missing in the source are skipped. Runs in one transaction:
    /// on error nothing in the target changes. Returns the number of data
    /// rows copied per table.
    pub fn import_from(&self, source: &dyn TableStore, tables: &[&str]) -> Result<Vec<(String, usize)>> {
        let mut staged = Vec::new();
        for table in tables {
            if !source.exists(table)? {
                tracing::warn!(table = *table, "source table missing, skipped");
                continue;
            }
            staged.push((*table, source.read_all(table)?));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut copied = Vec::new();

        for (table, rows) in &staged {
            let Some((header, data)) = rows.split_first() else {
                continue;
            };

            Self::drop_table_in(&tx, table)?;
            Self::create_table_in(&tx, table, header)?;

            let width = header.len();
            let mut stmt = tx.prepare(&insert_sql(table, width))?;
            for row in data {
                stmt.execute(params_from_iter(fit_row(row, width)))?;
            }
            copied.push((table.to_string(), data.len()));
        }

        tx.commit()?;
        Ok(copied)
    }

    fn create_table_in(conn: &Connection, table: &str, header: &[String]) -> Result<()> {
        if Self::table_exists(conn, table)? {
            return Ok(());
        }

        let columns = column_names(header)
            .iter()
            .map(|name| format!("{} TEXT", quote_ident(name)))
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute(&format!("CREATE TABLE {} ({})", quote_ident(table), columns), [])?;
        conn.execute(
            &format!("INSERT OR REPLACE INTO {} (name, header) VALUES (?1, ?2)", HEADERS_TABLE),
            [table, serde_json::to_string(header)?.as_str()],
        )?;
        Ok(())
    }

    fn drop_table_in(conn: &Connection, table: &str) -> Result<()> {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;
        conn.execute(&format!("DELETE FROM {} WHERE name = ?1", HEADERS_TABLE), [table])?;
        Ok(())
    }

    fn columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Recorded raw header, or the SQL column names when none matches
    fn header(conn: &Connection, table: &str) -> Result<Vec<String>> {
        let columns = Self::columns(conn, table)?;
        let stored: Option<String> = conn
            .query_row(
                &format!("SELECT header FROM {} WHERE name = ?1", HEADERS_TABLE),
                [table],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(json) = stored {
            let header: Vec<String> = serde_json::from_str(&json)?;
            if header.len() == columns.len() {
                return Ok(header);
            }
        }
        Ok(columns)
    }

    fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
        let found: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

impl TableStore for SqliteStore {
    fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>> {
        let conn = self.lock()?;
        if !Self::table_exists(&conn, table)? {
            return Err(StoreError::table_not_found(table));
        }

        let header = Self::header(&conn, table)?;
        let width = header.len();

        let mut stmt = conn.prepare(&format!("SELECT * FROM {} ORDER BY rowid", quote_ident(table)))?;
        let mut rows = vec![header];
        let mut query = stmt.query([])?;
        while let Some(row) = query.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(value_to_string(row.get_ref(i)?));
            }
            rows.push(cells);
        }

        Ok(rows)
    }

    fn append(&self, table: &str, values: &[String]) -> Result<()> {
        let conn = self.lock()?;
        if !Self::table_exists(&conn, table)? {
            return Err(StoreError::table_not_found(table));
        }

        let width = Self::columns(&conn, table)?.len();
        conn.execute(&insert_sql(table, width), params_from_iter(fit_row(values, width)))?;
        Ok(())
    }

    fn exists(&self, table: &str) -> Result<bool> {
        let conn = self.lock()?;
        Self::table_exists(&conn, table)
    }

    fn backend(&self) -> &str {
        "sqlite"
    }
}
