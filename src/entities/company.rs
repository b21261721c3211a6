use super::{is_empty_map, Entity};
use crate::table::{RowView, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const KNOWN_FIELDS: &[&str] = &["CompanyID", "CompanyName", "Name", "Industry", "Website"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "CompanyID")]
    pub company_id: String,

    /// Display name
    #[serde(rename = "CompanyName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "Industry", default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,

    #[serde(rename = "Website", default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(flatten, skip_serializing_if = "is_empty_map")]
    pub extra: BTreeMap<String, String>,
}

impl Entity for Company {
    const TABLE: Table = Table::Companies;
    const ID_FIELD: &'static str = "CompanyID";

    fn from_row(row: RowView<'_>) -> Self {
        Company {
            company_id: row.get("CompanyID").trim().to_string(),
            // some sheets label the display column "Name"
            name: row.first_of(&["CompanyName", "Name"]),
            industry: row.opt("Industry"),
            website: row.opt("Website"),
            extra: row.extras(KNOWN_FIELDS),
        }
    }

    fn id(&self) -> &str {
        &self.company_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HeaderIndex;

    #[test]
    fn test_company_name_alias() {
        let header: Vec<String> = ["Name", "CompanyID"].iter().map(|s| s.to_string()).collect();
        let index = HeaderIndex::build(&header);
        let cells: Vec<String> = ["Acme", " CO1 "].iter().map(|s| s.to_string()).collect();

        let company = Company::from_row(RowView::new(&index, &cells));
        assert_eq!(company.company_id, "CO1");
        assert_eq!(company.name.as_deref(), Some("Acme"));
        assert!(company.extra.is_empty());
    }
}
