// Candidate Entity - deep load of a Candidates row
//
// Summary projections for list views live in `projection::candidate_summary`.

use super::{is_empty_map, Entity};
use crate::projection::joined_name;
use crate::table::{RowView, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const KNOWN_FIELDS: &[&str] = &["CandidateID", "FullName", "Email", "Phone", "Status", "Location"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "CandidateID")]
    pub candidate_id: String,

    /// `FullName`, or `FirstName LastName` when the sheet splits names
    #[serde(rename = "FullName", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "Location", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Entity for Candidate {
    const TABLE: Table = Table::Candidates;
    const ID_FIELD: &'static str = "CandidateID";

    fn from_row(row: RowView<'_>) -> Self {
        Candidate {
            candidate_id: row.get("CandidateID").trim().to_string(),
            full_name: row.opt("FullName").or_else(|| joined_name(&row)),
            email: row.opt("Email"),
            phone: row.opt("Phone"),
            status: row.opt("Status"),
            location: row.opt("Location"),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.candidate_id
    }
}
