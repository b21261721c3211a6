// CSV directory store
//
// One file per table: `<dir>/<Table>.csv`. The first record of each file is
// the header row. Records may have differing lengths.

use super::TableStore;
use crate::error::{Result, StoreError};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the backing file for a table
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }

    /// Create (or truncate) a table file containing only the header row
    pub fn create_table(&self, table: &str, header: &[String]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(self.table_path(table))?;
        writer.write_record(header)?;
        writer.flush()?;
        Ok(())
    }

    /// Names of all tables in the directory (file stems of `*.csv`), sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        if !self.dir.exists() {
            return Ok(names);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// True when the file is non-empty and its last byte is not a newline
fn needs_leading_newline(file: &mut File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl TableStore for CsvStore {
    fn read_all(&self, table: &str) -> Result<Vec<Vec<String>>> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(StoreError::table_not_found(table));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(rows)
    }

    fn append(&self, table: &str, values: &[String]) -> Result<()> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(StoreError::table_not_found(table));
        }

        let mut file = OpenOptions::new().read(true).append(true).open(&path)?;
        if needs_leading_newline(&mut file)? {
            file.write_all(b"\n")?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(values)?;
        writer.flush()?;
        Ok(())
    }

    fn exists(&self, table: &str) -> Result<bool> {
        Ok(self.table_path(table).is_file())
    }

    fn backend(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_quoted_multiline_cells() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("CallLists.csv"),
            "CallListID,JobID,CandidateIDs\nCL1,J7,\"C1; C2,C3\nC4\"\n",
        )
        .unwrap();

        let store = CsvStore::new(dir.path());
        let rows = store.read_all("CallLists").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][2], "C1; C2,C3\nC4");
    }

    #[test]
    fn test_missing_file_is_table_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());

        assert!(store.read_all("Activities").unwrap_err().is_table_not_found());
        assert!(store.append("Activities", &[]).unwrap_err().is_table_not_found());
        assert!(!store.exists("Activities").unwrap());
    }

    #[test]
    fn test_append_after_file_without_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Activities.csv"), "ActivityID,Notes").unwrap();

        let store = CsvStore::new(dir.path());
        store
            .append("Activities", &["A1".to_string(), "called, no answer".to_string()])
            .unwrap();

        let rows = store.read_all("Activities").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["A1", "called, no answer"]);
    }

    #[test]
    fn test_create_table_and_list_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("data"));

        store.create_table("Jobs", &["JobID".to_string()]).unwrap();
        store.create_table("Companies", &["CompanyID".to_string()]).unwrap();

        assert_eq!(store.table_names().unwrap(), vec!["Companies", "Jobs"]);
        assert_eq!(store.read_all("Jobs").unwrap(), vec![vec!["JobID".to_string()]]);
    }
}
