use super::{is_empty_map, Entity};
use crate::table::{RowView, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role label used when a hire names neither a role nor a job
pub const UNKNOWN_ROLE: &str = "Unknown";

const KNOWN_FIELDS: &[&str] = &["CompanyID", "JobID", "Role", "CandidateID", "CandidateName", "HireDate"];

/// One row of the optional Hires table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hire {
    #[serde(rename = "CompanyID")]
    pub company_id: String,

    #[serde(rename = "JobID", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(rename = "Role", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(rename = "CandidateID", default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,

    #[serde(rename = "CandidateName", default, skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,

    #[serde(rename = "HireDate", default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Hire {
    /// Grouping key: Role, else JobID, else "Unknown"
    pub fn role_label(&self) -> &str {
        self.role
            .as_deref()
            .or(self.job_id.as_deref())
            .unwrap_or(UNKNOWN_ROLE)
    }
}

impl Entity for Hire {
    const TABLE: Table = Table::Hires;
    const ID_FIELD: &'static str = "CandidateID";

    fn from_row(row: RowView<'_>) -> Self {
        Hire {
            company_id: row.get("CompanyID").trim().to_string(),
            job_id: row.opt("JobID"),
            role: row.opt("Role"),
            candidate_id: row.opt("CandidateID"),
            candidate_name: row.opt("CandidateName"),
            hire_date: row.opt("HireDate"),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        self.candidate_id.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HeaderIndex;

    fn hire(role: &str, job: &str) -> Hire {
        let header: Vec<String> = ["CompanyID", "Role", "JobID"].iter().map(|s| s.to_string()).collect();
        let index = HeaderIndex::build(&header);
        let cells = vec!["CO1".to_string(), role.to_string(), job.to_string()];
        Hire::from_row(RowView::new(&index, &cells))
    }

    #[test]
    fn test_role_label_fallbacks() {
        assert_eq!(hire("Engineer", "JOB0001").role_label(), "Engineer");
        assert_eq!(hire("", "JOB0001").role_label(), "JOB0001");
        assert_eq!(hire(" ", "").role_label(), UNKNOWN_ROLE);
    }
}
