// CallList Entity + CallListsItems rows
//
// A call list points at one job and carries its candidates as a delimited
// string in a single cell. The separate CallListsItems table, when a sheet
// has one, lists the same membership one row per candidate.

use super::{is_empty_map, Entity};
use crate::ids::{call_list_ids_match, normalize_job_id, parse_candidate_ids};
use crate::table::{RowView, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const KNOWN_FIELDS: &[&str] = &["CallListID", "JobID", "Name", "CandidateIDs"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallList {
    /// Stored spelling, never rewritten
    #[serde(rename = "CallListID")]
    pub call_list_id: String,

    /// Canonical JobID ("J7" in the sheet comes back as "JOB0007")
    #[serde(rename = "JobID", default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw denormalized candidate list
    #[serde(rename = "CandidateIDs", default)]
    pub candidate_ids: String,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl CallList {
    /// Fuzzy id match ("CL1" == "CL001")
    pub fn matches(&self, call_list_id: &str) -> bool {
        call_list_ids_match(&self.call_list_id, call_list_id)
    }

    /// Parsed candidate ids, order and duplicates preserved
    pub fn candidate_id_list(&self) -> Vec<String> {
        parse_candidate_ids(&self.candidate_ids)
    }
}

impl Entity for CallList {
    const TABLE: Table = Table::CallLists;
    const ID_FIELD: &'static str = "CallListID";

    fn from_row(row: RowView<'_>) -> Self {
        CallList {
            call_list_id: row.get("CallListID").trim().to_string(),
            job_id: row.opt("JobID").map(|id| normalize_job_id(&id)),
            name: row.opt("Name"),
            candidate_ids: row.get("CandidateIDs").to_string(),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.call_list_id
    }
}

const ITEM_KNOWN_FIELDS: &[&str] = &["CallListID", "CandidateID", "Status", "Notes"];

/// One row of the optional CallListsItems table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallListItem {
    #[serde(rename = "CallListID")]
    pub call_list_id: String,

    #[serde(rename = "CandidateID")]
    pub candidate_id: String,

    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(rename = "Notes", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Entity for CallListItem {
    const TABLE: Table = Table::CallListsItems;
    const ID_FIELD: &'static str = "CandidateID";

    fn from_row(row: RowView<'_>) -> Self {
        CallListItem {
            call_list_id: row.get("CallListID").trim().to_string(),
            candidate_id: row.get("CandidateID").trim().to_string(),
            status: row.opt("Status"),
            notes: row.opt("Notes"),
            extra: row.extras(ITEM_KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.candidate_id
    }
}
