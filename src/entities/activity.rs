// Activity Entity - immutable log entry
//
// Sheets disagree on a few column names, so each of these reads the first
// non-blank alias:
// - Type / ActivityType
// - Outcome / Result
// - Notes / Comments
// - CreatedAt / Timestamp / CreatedDate

use super::{is_empty_map, Entity};
use crate::ids::{job_ids_match, normalize_job_id};
use crate::table::{RowView, Table};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub(crate) const TYPE_COLUMNS: &[&str] = &["Type", "ActivityType"];
pub(crate) const OUTCOME_COLUMNS: &[&str] = &["Outcome", "Result"];
pub(crate) const NOTES_COLUMNS: &[&str] = &["Notes", "Comments"];
pub(crate) const CREATED_COLUMNS: &[&str] = &["CreatedAt", "Timestamp", "CreatedDate"];

const KNOWN_FIELDS: &[&str] = &[
    "ActivityID",
    "CreatedAt",
    "Timestamp",
    "CreatedDate",
    "UpdatedAt",
    "Type",
    "ActivityType",
    "CandidateID",
    "JobID",
    "CallListID",
    "CompanyID",
    "RecruiterID",
    "RecruiterName",
    "Outcome",
    "Result",
    "Notes",
    "Comments",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "ActivityID")]
    pub activity_id: String,

    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,

    #[serde(rename = "CandidateID", default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,

    #[serde(rename = "JobID", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(rename = "CallListID", default, skip_serializing_if = "Option::is_none")]
    pub call_list_id: Option<String>,

    #[serde(rename = "CompanyID", default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(rename = "RecruiterID", default, skip_serializing_if = "Option::is_none")]
    pub recruiter_id: Option<String>,

    #[serde(rename = "RecruiterName", default, skip_serializing_if = "Option::is_none")]
    pub recruiter_name: Option<String>,

    #[serde(rename = "Outcome", default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    #[serde(rename = "Notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Activity {
    /// Parsed creation time, `None` when blank or unparseable
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn is_for_candidate(&self, candidate_id: &str) -> bool {
        let wanted = candidate_id.trim();
        !wanted.is_empty() && self.candidate_id.as_deref() == Some(wanted)
    }

    pub fn is_for_job(&self, job_id: &str) -> bool {
        self.job_id
            .as_deref()
            .map(|own| job_ids_match(own, job_id))
            .unwrap_or(false)
    }
}

impl Entity for Activity {
    const TABLE: Table = Table::Activities;
    const ID_FIELD: &'static str = "ActivityID";

    fn from_row(row: RowView<'_>) -> Self {
        Activity {
            activity_id: row.get("ActivityID").trim().to_string(),
            created_at: row.first_of(CREATED_COLUMNS),
            updated_at: row.opt("UpdatedAt"),
            activity_type: row.first_of(TYPE_COLUMNS),
            candidate_id: row.opt("CandidateID"),
            job_id: row.opt("JobID").map(|id| normalize_job_id(&id)),
            call_list_id: row.opt("CallListID"),
            company_id: row.opt("CompanyID"),
            recruiter_id: row.opt("RecruiterID"),
            recruiter_name: row.opt("RecruiterName"),
            outcome: row.first_of(OUTCOME_COLUMNS),
            notes: row.first_of(NOTES_COLUMNS),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.activity_id
    }
}

/// Parse the timestamp spellings found in the Activities sheet.
///
/// RFC 3339 first, then naive date-times and dates (read as UTC) in ISO and
/// US order.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const DATE_TIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}
