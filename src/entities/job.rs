// Job Entity
//
// JobID is stored in canonical form ("JOB0007") no matter how the sheet
// spelled it ("J7", "JOB007").

use super::{is_empty_map, Entity};
use crate::ids::normalize_job_id;
use crate::table::{RowView, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status value counted as an open role
pub const OPEN_STATUS: &str = "Open";

const KNOWN_FIELDS: &[&str] = &["JobID", "CompanyID", "Title", "Status", "Location"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "JobID")]
    pub job_id: String,

    #[serde(rename = "CompanyID", default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Columns not listed above
    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Job {
    /// Status is exactly "Open"
    pub fn is_open(&self) -> bool {
        self.status.as_deref() == Some(OPEN_STATUS)
    }

    pub fn belongs_to(&self, company_id: &str) -> bool {
        let wanted = company_id.trim();
        !wanted.is_empty() && self.company_id.as_deref() == Some(wanted)
    }
}

impl Entity for Job {
    const TABLE: Table = Table::Jobs;
    const ID_FIELD: &'static str = "JobID";

    fn from_row(row: RowView<'_>) -> Self {
        Job {
            job_id: normalize_job_id(row.get("JobID")),
            company_id: row.opt("CompanyID"),
            title: row.opt("Title"),
            status: row.opt("Status"),
            location: row.opt("Location"),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.job_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HeaderIndex;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_job_from_row_normalizes_id() {
        let index = HeaderIndex::build(&strings(&["Status", "JobID", "CompanyID", "Salary"]));
        let cells = strings(&["Open", "J7", "CO1", "100k"]);
        let job = Job::from_row(RowView::new(&index, &cells));

        assert_eq!(job.job_id, "JOB0007");
        assert_eq!(job.company_id.as_deref(), Some("CO1"));
        assert!(job.is_open());
        assert_eq!(job.extra.get("Salary").map(String::as_str), Some("100k"));
    }

    #[test]
    fn test_job_open_is_exact() {
        let index = HeaderIndex::build(&strings(&["JobID", "Status"]));
        let cells = strings(&["JOB0001", "open"]);
        let job = Job::from_row(RowView::new(&index, &cells));
        assert!(!job.is_open());
    }

    #[test]
    fn test_job_serializes_with_column_names() {
        let index = HeaderIndex::build(&strings(&["JobID", "Title", "Team"]));
        let cells = strings(&["JOB0002", "Engineer", "Core"]);
        let job = Job::from_row(RowView::new(&index, &cells));

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["JobID"], "JOB0002");
        assert_eq!(json["Title"], "Engineer");
        assert_eq!(json["Team"], "Core");
        assert!(json.get("CompanyID").is_none());
    }
}
