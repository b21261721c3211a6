// Row Projector
// Raw row + header index → field-keyed record

use crate::table::{HeaderIndex, RowView};
use serde_json::{Map, Value};

/// Field-keyed record; keys keep header (or requested) order
pub type Record = Map<String, Value>;

/// Display name used when a referenced row does not exist
pub const NOT_FOUND_NAME: &str = "(not found)";

/// Contact-list-safe subset of a candidate row
pub const CANDIDATE_SUMMARY_FIELDS: &[&str] = &[
    "CandidateID",
    "FullName",
    "Email",
    "Phone",
    "Status",
    "Location",
];

/// Project a raw row.
///
/// * `fields = None` - every header-mapped column, in header order (deep load)
/// * `fields = Some(..)` - only the named columns, in the order given;
///   columns missing from the table come back as `""` (summary)
pub fn project(row: &[String], index: &HeaderIndex, fields: Option<&[&str]>) -> Record {
    let view = RowView::new(index, row);
    let mut record = Record::new();

    match fields {
        None => {
            for name in index.columns() {
                record.insert(name.clone(), Value::String(view.get(name).to_string()));
            }
        }
        Some(fields) => {
            for name in fields {
                record.insert(name.to_string(), Value::String(view.get(name).to_string()));
            }
        }
    }

    record
}

/// Placeholder for an id that resolved to no row
pub fn placeholder(id_field: &str, id: &str) -> Record {
    let mut record = Record::new();
    record.insert(id_field.to_string(), Value::String(id.to_string()));
    record.insert("FullName".to_string(), Value::String(NOT_FOUND_NAME.to_string()));
    record
}

/// Summary projection of a candidate row.
///
/// `FullName` falls back to `FirstName LastName` when the table has no
/// usable full-name column.
pub fn candidate_summary(row: &[String], index: &HeaderIndex) -> Record {
    let mut record = project(row, index, Some(CANDIDATE_SUMMARY_FIELDS));
    let view = RowView::new(index, row);

    if view.opt("FullName").is_none() {
        if let Some(name) = joined_name(&view) {
            record.insert("FullName".to_string(), Value::String(name));
        }
    }

    record
}

/// `FirstName LastName`, skipping blanks
pub(crate) fn joined_name(view: &RowView<'_>) -> Option<String> {
    let parts: Vec<String> = ["FirstName", "LastName"]
        .iter()
        .filter_map(|f| view.opt(f))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_projection_uses_header_order() {
        let index = HeaderIndex::build(&strings(&["Status", "JobID"]));
        let record = project(&strings(&["Open", "JOB0001"]), &index, None);

        let keys: Vec<&String> = record.keys().collect();
        assert_eq!(keys, vec!["Status", "JobID"]);
        assert_eq!(record["JobID"], "JOB0001");
    }

    #[test]
    fn test_subset_projection_fills_missing_columns() {
        let index = HeaderIndex::build(&strings(&["CandidateID", "Email"]));
        let record = project(&strings(&["C1", "a@b.c"]), &index, Some(&["CandidateID", "Phone"]));

        assert_eq!(record.len(), 2);
        assert_eq!(record["CandidateID"], "C1");
        assert_eq!(record["Phone"], "");
        assert!(record.get("Email").is_none());
    }

    #[test]
    fn test_placeholder_shape() {
        let record = placeholder("CandidateID", "C404");
        assert_eq!(record["CandidateID"], "C404");
        assert_eq!(record["FullName"], NOT_FOUND_NAME);
    }

    #[test]
    fn test_candidate_summary_name_fallback() {
        let index = HeaderIndex::build(&strings(&["CandidateID", "FirstName", "LastName"]));
        let record = candidate_summary(&strings(&["C1", "Ada", "Lovelace"]), &index);

        assert_eq!(record["FullName"], "Ada Lovelace");
        assert_eq!(record["Email"], "");
        assert!(record.get("FirstName").is_none());
    }

    #[test]
    fn test_candidate_summary_prefers_full_name() {
        let index = HeaderIndex::build(&strings(&["CandidateID", "FullName", "FirstName"]));
        let record = candidate_summary(&strings(&["C1", "Grace Hopper", "G"]), &index);
        assert_eq!(record["FullName"], "Grace Hopper");
    }
}
