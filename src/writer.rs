// Activity Writer - the only mutating path
//
// Appends exactly one row per call, laid out in the Activities table's own
// header order. Never updates or deletes. Saving the same payload twice
// creates two rows.

use crate::entities::activity::{NOTES_COLUMNS, OUTCOME_COLUMNS, TYPE_COLUMNS};
use crate::error::Result;
use crate::ids::normalize_job_id;
use crate::projection::Record;
use crate::store::TableStore;
use crate::table::{self, Table};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Fixed Activities column set, used as the layout when the table has no header
pub const ACTIVITY_COLUMNS: &[&str] = &[
    "ActivityID",
    "CreatedAt",
    "UpdatedAt",
    "Type",
    "CandidateID",
    "JobID",
    "CallListID",
    "CompanyID",
    "RecruiterID",
    "RecruiterName",
    "Outcome",
    "Notes",
];

pub const DEFAULT_ACTIVITY_TYPE: &str = "Note";
pub const DEFAULT_RECRUITER_ID: &str = "USR01";
pub const DEFAULT_RECRUITER_NAME: &str = "Default Recruiter";

const RELATIONAL_COLUMNS: &[&str] = &["CandidateID", "CallListID", "CompanyID"];

/// Values used when the caller leaves a field out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefaults {
    pub activity_type: String,
    pub recruiter_id: String,
    pub recruiter_name: String,
}

impl Default for ActivityDefaults {
    fn default() -> Self {
        ActivityDefaults {
            activity_type: DEFAULT_ACTIVITY_TYPE.to_string(),
            recruiter_id: DEFAULT_RECRUITER_ID.to_string(),
            recruiter_name: DEFAULT_RECRUITER_NAME.to_string(),
        }
    }
}

/// Result of `save_activity`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedActivity {
    pub success: bool,
    pub id: String,
}

#[derive(Clone)]
pub struct ActivityWriter {
    store: Arc<dyn TableStore>,
    defaults: ActivityDefaults,
}

/// First non-blank input among the given keys
fn field<'a>(fields: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

impl ActivityWriter {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self::with_defaults(store, ActivityDefaults::default())
    }

    pub fn with_defaults(store: Arc<dyn TableStore>, defaults: ActivityDefaults) -> Self {
        ActivityWriter { store, defaults }
    }

    pub fn defaults(&self) -> &ActivityDefaults {
        &self.defaults
    }

    /// Append one activity built from `fields`.
    ///
    /// Generates the id and timestamps. Fails with `TableNotFound` when the
    /// Activities table does not exist.
    pub fn save_activity(&self, fields: &HashMap<String, String>) -> Result<SavedActivity> {
        let snapshot = table::read_table(self.store.as_ref(), Table::Activities.name())?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let values = self.activity_values(fields, &id, &now);

        let row: Vec<String> = if snapshot.index.is_empty() {
            ACTIVITY_COLUMNS
                .iter()
                .map(|column| values.get(*column).cloned().unwrap_or_default())
                .collect()
        } else {
            layout_by_header(&snapshot.index, |column| {
                values
                    .get(column)
                    .cloned()
                    .or_else(|| fields.get(column).cloned())
            })
        };

        self.store.append(Table::Activities.name(), &row)?;

        tracing::info!(
            activity_id = %id,
            activity_type = values.get("Type").map(String::as_str).unwrap_or(""),
            "activity saved"
        );

        Ok(SavedActivity { success: true, id })
    }

    /// Column → value for every column the writer owns, aliases included
    fn activity_values(&self, fields: &HashMap<String, String>, id: &str, now: &str) -> HashMap<String, String> {
        let mut values = HashMap::new();
        let mut set = |column: &str, value: &str| {
            values.insert(column.to_string(), value.to_string());
        };

        set("ActivityID", id);
        set("CreatedAt", now);
        set("Timestamp", now);
        set("CreatedDate", now);
        set("UpdatedAt", now);

        let activity_type = field(fields, TYPE_COLUMNS).unwrap_or(self.defaults.activity_type.as_str());
        for &column in TYPE_COLUMNS {
            set(column, activity_type);
        }

        for &column in RELATIONAL_COLUMNS {
            set(column, field(fields, &[column]).unwrap_or(""));
        }
        let job_id = field(fields, &["JobID"]).map(normalize_job_id).unwrap_or_default();
        set("JobID", job_id.as_str());

        set(
            "RecruiterID",
            field(fields, &["RecruiterID"]).unwrap_or(self.defaults.recruiter_id.as_str()),
        );
        set(
            "RecruiterName",
            field(fields, &["RecruiterName"]).unwrap_or(self.defaults.recruiter_name.as_str()),
        );

        let outcome = field(fields, OUTCOME_COLUMNS).unwrap_or("");
        for &column in OUTCOME_COLUMNS {
            set(column, outcome);
        }
        let notes = field(fields, NOTES_COLUMNS).unwrap_or("");
        for &column in NOTES_COLUMNS {
            set(column, notes);
        }

        values
    }

    /// Generic writer: append a pre-shaped record to any existing table.
    pub fn append_record(&self, table: &str, record: &Record) -> Result<()> {
        append_record(self.store.as_ref(), table, record)
    }
}

/// One value per header cell, in header order; unknown or blank columns → ""
fn layout_by_header<F>(index: &table::HeaderIndex, mut lookup: F) -> Vec<String>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut row = vec![String::new(); index.width()];
    for column in index.columns() {
        if let (Some(pos), Some(value)) = (index.position(column), lookup(column.as_str())) {
            row[pos] = value;
        }
    }
    row
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Append `record` to `table`, mapping each header name to the record key of
/// the same name (or "" when absent).
pub fn append_record(store: &dyn TableStore, table: &str, record: &Record) -> Result<()> {
    let snapshot = table::read_table(store, table)?;
    let row = layout_by_header(&snapshot.index, |column| record.get(column).map(value_to_cell));
    store.append(table, &row)?;
    tracing::debug!(table, columns = row.len(), "record appended");
    Ok(())
}
