// Join Resolver - relationship queries without a query planner
//
// Every join is a fixed chain of linear scans over fresh table reads:
// - CallList → Job → Company
// - CallList → Candidates (one ID→row map per call)
// - Company → Jobs + Hires (KPIs, talent map)
// - Candidate / Job → Activities
//
// A missing row is never an error: lookups return None, an empty list or a
// placeholder record. Only a missing required table fails.

use crate::entities::{self, Activity, CallList, CallListItem, Candidate, Company, Entity, Hire, Job};
use crate::error::Result;
use crate::ids::{call_list_ids_match, job_ids_match};
use crate::kpis::{self, CompanyKpis, RoleCount};
use crate::projection::{self, Record};
use crate::store::TableStore;
use crate::table::{self, Table, TableSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// BUNDLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyBundle {
    pub company: Company,
    pub jobs: Vec<Job>,
    pub kpis: CompanyKpis,
    pub talent: Vec<RoleCount>,
}

/// Either side may be missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAndCompany {
    pub job: Option<Job>,
    pub company: Option<Company>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallListBundle {
    pub call_list: CallList,
    pub job: Option<Job>,
    pub company: Option<Company>,
    pub candidates: Vec<Record>,
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Clone)]
pub struct JoinResolver {
    store: Arc<dyn TableStore>,
}

impl JoinResolver {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        JoinResolver { store }
    }

    pub fn store(&self) -> &dyn TableStore {
        self.store.as_ref()
    }

    fn load<E: Entity>(&self) -> Result<Vec<E>> {
        entities::load::<E>(self.store.as_ref())
    }

    fn snapshot(&self, table: Table) -> Result<TableSnapshot> {
        table::read(self.store.as_ref(), table)
    }

    // ------------------------------------------------------------------
    // Jobs & companies
    // ------------------------------------------------------------------

    /// First job whose canonical JobID equals the canonical `job_id`
    pub fn job_by_id(&self, job_id: &str) -> Result<Option<Job>> {
        let found = self
            .load::<Job>()?
            .into_iter()
            .find(|job| job_ids_match(&job.job_id, job_id));
        tracing::debug!(job_id, found = found.is_some(), "job lookup");
        Ok(found)
    }

    pub fn company_by_id(&self, company_id: &str) -> Result<Option<Company>> {
        let wanted = company_id.trim();
        if wanted.is_empty() {
            return Ok(None);
        }
        let found = self
            .load::<Company>()?
            .into_iter()
            .find(|company| company.company_id == wanted);
        tracing::debug!(company_id = wanted, found = found.is_some(), "company lookup");
        Ok(found)
    }

    /// All jobs of a company, in table order
    pub fn jobs_by_company(&self, company_id: &str) -> Result<Vec<Job>> {
        Ok(self
            .load::<Job>()?
            .into_iter()
            .filter(|job| job.belongs_to(company_id))
            .collect())
    }

    /// Company + jobs + KPIs + talent map. `None` when the company is unknown.
    pub fn company_bundle(&self, company_id: &str) -> Result<Option<CompanyBundle>> {
        let Some(company) = self.company_by_id(company_id)? else {
            return Ok(None);
        };

        let jobs = self.jobs_by_company(&company.company_id)?;
        let hires: Vec<Hire> = self
            .load::<Hire>()?
            .into_iter()
            .filter(|hire| hire.company_id == company.company_id)
            .collect();

        let kpis = kpis::compute(&jobs, &hires);
        let talent = kpis.role_distribution.clone();

        Ok(Some(CompanyBundle {
            company,
            jobs,
            kpis,
            talent,
        }))
    }

    pub fn list_jobs(&self) -> Result<Vec<Job>> {
        self.load::<Job>()
    }

    pub fn list_companies(&self) -> Result<Vec<Company>> {
        self.load::<Company>()
    }

    // ------------------------------------------------------------------
    // Call lists
    // ------------------------------------------------------------------

    /// Fuzzy lookup ("CL1" finds "CL001"); JobID comes back canonical
    pub fn call_list_by_id(&self, call_list_id: &str) -> Result<Option<CallList>> {
        let found = self
            .load::<CallList>()?
            .into_iter()
            .find(|list| list.matches(call_list_id));
        tracing::debug!(call_list_id, found = found.is_some(), "call list lookup");
        Ok(found)
    }

    pub fn list_call_lists(&self) -> Result<Vec<CallList>> {
        self.load::<CallList>()
    }

    /// CallList → Job → Company, stopping at the first missing hop
    pub fn job_and_company_for_call_list(&self, call_list_id: &str) -> Result<JobAndCompany> {
        match self.call_list_by_id(call_list_id)? {
            Some(list) => self.job_and_company_for(&list),
            None => Ok(JobAndCompany::default()),
        }
    }

    fn job_and_company_for(&self, list: &CallList) -> Result<JobAndCompany> {
        let Some(job_id) = list.job_id.as_deref() else {
            return Ok(JobAndCompany::default());
        };
        let Some(job) = self.job_by_id(job_id)? else {
            return Ok(JobAndCompany::default());
        };
        let company = match job.company_id.as_deref() {
            Some(company_id) => self.company_by_id(company_id)?,
            None => None,
        };
        Ok(JobAndCompany {
            job: Some(job),
            company,
        })
    }

    /// Call list with its job, company and candidate summaries
    pub fn call_list_bundle(&self, call_list_id: &str) -> Result<Option<CallListBundle>> {
        let Some(call_list) = self.call_list_by_id(call_list_id)? else {
            return Ok(None);
        };

        let JobAndCompany { job, company } = self.job_and_company_for(&call_list)?;
        let candidates = self.resolve_candidates(&call_list.candidate_id_list())?;

        Ok(Some(CallListBundle {
            call_list,
            job,
            company,
            candidates,
        }))
    }

    /// One summary per id in the call list's CandidateIDs cell.
    ///
    /// Unknown ids get a placeholder, so the result always has one entry per
    /// listed id. Unknown call list → empty.
    pub fn candidates_for_call_list(&self, call_list_id: &str) -> Result<Vec<Record>> {
        match self.call_list_by_id(call_list_id)? {
            Some(list) => self.resolve_candidates(&list.candidate_id_list()),
            None => Ok(Vec::new()),
        }
    }

    fn resolve_candidates(&self, ids: &[String]) -> Result<Vec<Record>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = self.snapshot(Table::Candidates)?;
        let mut by_id: HashMap<&str, &[String]> = HashMap::with_capacity(snapshot.len());
        for row in snapshot.iter() {
            let id = row.get(Candidate::ID_FIELD).trim();
            if !id.is_empty() {
                by_id.entry(id).or_insert(row.cells());
            }
        }

        let resolved: Vec<Record> = ids
            .iter()
            .map(|id| match by_id.get(id.as_str()) {
                Some(cells) => projection::candidate_summary(cells, &snapshot.index),
                None => projection::placeholder(Candidate::ID_FIELD, id),
            })
            .collect();

        tracing::debug!(
            requested = ids.len(),
            unresolved = ids.iter().filter(|id| !by_id.contains_key(id.as_str())).count(),
            "candidates resolved"
        );
        Ok(resolved)
    }

    /// Rows of the optional CallListsItems table for one call list
    pub fn call_list_items(&self, call_list_id: &str) -> Result<Vec<CallListItem>> {
        Ok(self
            .load::<CallListItem>()?
            .into_iter()
            .filter(|item| call_list_ids_match(&item.call_list_id, call_list_id))
            .collect())
    }

    // ------------------------------------------------------------------
    // Candidates
    // ------------------------------------------------------------------

    /// Deep load of one candidate
    pub fn candidate_by_id(&self, candidate_id: &str) -> Result<Option<Candidate>> {
        let wanted = candidate_id.trim();
        if wanted.is_empty() {
            return Ok(None);
        }
        Ok(self
            .load::<Candidate>()?
            .into_iter()
            .find(|candidate| candidate.candidate_id == wanted))
    }

    // ------------------------------------------------------------------
    // Activities
    // ------------------------------------------------------------------

    /// Activities for the candidate OR the job, newest first.
    ///
    /// Rows with unparseable timestamps sort last; ties keep table order.
    pub fn activities_for_context(&self, candidate_id: &str, job_id: &str) -> Result<Vec<Activity>> {
        let mut matched: Vec<_> = self
            .load::<Activity>()?
            .into_iter()
            .filter(|activity| activity.is_for_candidate(candidate_id) || activity.is_for_job(job_id))
            .map(|activity| (activity.created_time(), activity))
            .collect();

        // Vec::sort_by is stable
        matched.sort_by(|(a, _), (b, _)| b.cmp(a));

        tracing::debug!(candidate_id, job_id, matched = matched.len(), "activity context");
        Ok(matched.into_iter().map(|(_, activity)| activity).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::NOT_FOUND_NAME;
    use crate::store::MemoryStore;

    fn fixture() -> MemoryStore {
        MemoryStore::new()
            .with_table(
                "Companies",
                &["CompanyID", "CompanyName", "Industry"],
                &[&["CO1", "Acme", "Robotics"], &["CO2", "Globex", "Energy"]],
            )
            .with_table(
                "Jobs",
                &["Title", "JobID", "CompanyID", "Status"],
                &[
                    &["Engineer", "JOB0007", "CO1", "Open"],
                    &["Designer", "J8", "CO1", "Closed"],
                    &["Analyst", "JOB009", "CO2", "Open"],
                    &["Orphan", "JOB0010", "CO404", "Open"],
                ],
            )
            .with_table(
                "Candidates",
                &["CandidateID", "FullName", "Email", "Phone", "Status", "Location", "Salary"],
                &[
                    &["C1", "Ada Lovelace", "ada@example.com", "1", "Active", "London", "x"],
                    &["C2", "Grace Hopper", "grace@example.com", "2", "Active", "NYC", "y"],
                    &["C3", "Alan Turing", "alan@example.com", "3", "Placed", "Wilmslow", "z"],
                    &["C4", "Edsger Dijkstra", "ewd@example.com", "4", "Active", "Austin", "w"],
                ],
            )
            .with_table(
                "CallLists",
                &["CallListID", "Name", "JobID", "CandidateIDs"],
                &[
                    &["CL001", "Backend push", "J7", "C1; C2,C3\nC4"],
                    &["CL2", "Design", "JOB008", "\"C2, C404,\""],
                    &["CL3", "Dangling", "JOB0999", ""],
                    &["CL4", "Orphan", "JOB0010", "C1"],
                ],
            )
            .with_table(
                "Activities",
                &["ActivityID", "CreatedAt", "Type", "CandidateID", "JobID", "Notes"],
                &[
                    &["A1", "2024-01-01T09:00:00Z", "Call", "C1", "JOB0001", "first"],
                    &["A2", "2024-03-01T09:00:00Z", "Email", "C2", "JOB0007", "second"],
                    &["A3", "2024-02-01T09:00:00Z", "Note", "C1", "", "third"],
                    &["A4", "2024-03-01T09:00:00Z", "Call", "C9", "J7", "tie"],
                    &["A5", "not a date", "Note", "C1", "", "undated"],
                    &["A6", "2024-05-01T09:00:00Z", "Note", "C2", "JOB0002", "other"],
                ],
            )
            .with_table(
                "Hires",
                &["CompanyID", "CandidateID", "Role", "JobID"],
                &[
                    &["CO1", "H1", "Engineer", "JOB0007"],
                    &["CO1", "H2", "", "JOB0008"],
                    &["CO2", "H3", "Analyst", "JOB0009"],
                    &["CO1", "H4", "Engineer", ""],
                    &["CO1", "H5", "", ""],
                    &["CO1", "H6", "Engineer", ""],
                    &["CO1", "H7", "Designer", ""],
                    &["CO1", "H8", "Engineer", ""],
                ],
            )
    }

    fn resolver() -> JoinResolver {
        JoinResolver::new(Arc::new(fixture()))
    }

    #[test]
    fn test_job_by_id_canonical_forms() {
        let resolver = resolver();

        for form in ["JOB0007", "J7", "JOB007"] {
            let job = resolver.job_by_id(form).unwrap().expect("job");
            assert_eq!(job.title.as_deref(), Some("Engineer"));
        }

        // stored as "J8", returned canonical
        let job = resolver.job_by_id("JOB0008").unwrap().unwrap();
        assert_eq!(job.job_id, "JOB0008");
    }

    #[test]
    fn test_job_by_id_not_found_is_none() {
        assert!(resolver().job_by_id("JOB4242").unwrap().is_none());
        assert!(resolver().job_by_id("").unwrap().is_none());
    }

    #[test]
    fn test_company_by_id() {
        let resolver = resolver();
        let company = resolver.company_by_id("CO2").unwrap().unwrap();
        assert_eq!(company.name.as_deref(), Some("Globex"));
        assert!(resolver.company_by_id("CO3").unwrap().is_none());
    }

    #[test]
    fn test_jobs_by_company_table_order() {
        let jobs = resolver().jobs_by_company("CO1").unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["JOB0007", "JOB0008"]);
    }

    #[test]
    fn test_company_bundle_kpis() {
        let bundle = resolver().company_bundle("CO1").unwrap().unwrap();

        assert_eq!(bundle.company.company_id, "CO1");
        assert_eq!(bundle.jobs.len(), 2);
        assert_eq!(bundle.kpis.open_roles, 1);
        assert_eq!(bundle.kpis.hires, 7);

        let recent: Vec<&str> = bundle.kpis.recent_hires.iter().map(|h| h.id()).collect();
        assert_eq!(recent, vec!["H8", "H7", "H6", "H5", "H4"]);

        let roles: Vec<(&str, usize)> = bundle
            .talent
            .iter()
            .map(|rc| (rc.role.as_str(), rc.count))
            .collect();
        assert_eq!(
            roles,
            vec![("Engineer", 4), ("JOB0008", 1), ("Unknown", 1), ("Designer", 1)]
        );
        assert_eq!(bundle.talent, bundle.kpis.role_distribution);
    }

    #[test]
    fn test_company_bundle_unknown_company() {
        assert!(resolver().company_bundle("CO404").unwrap().is_none());
    }

    #[test]
    fn test_company_bundle_without_hires_table() {
        let store = MemoryStore::new()
            .with_table("Companies", &["CompanyID"], &[&["CO1"]])
            .with_table("Jobs", &["JobID", "CompanyID", "Status"], &[&["JOB0001", "CO1", "Open"]]);
        let resolver = JoinResolver::new(Arc::new(store));

        let bundle = resolver.company_bundle("CO1").unwrap().unwrap();
        assert_eq!(bundle.kpis.open_roles, 1);
        assert_eq!(bundle.kpis.hires, 0);
        assert!(bundle.talent.is_empty());
    }

    #[test]
    fn test_call_list_by_id_all_paddings_same_row() {
        let resolver = resolver();
        for form in ["CL1", "CL01", "CL001", "CL0001"] {
            let list = resolver.call_list_by_id(form).unwrap().expect("call list");
            assert_eq!(list.call_list_id, "CL001");
            assert_eq!(list.job_id.as_deref(), Some("JOB0007"));
        }
    }

    #[test]
    fn test_call_lists_table_missing_is_empty() {
        let store = MemoryStore::new().with_table("Jobs", &["JobID"], &[]);
        let resolver = JoinResolver::new(Arc::new(store));

        assert!(resolver.call_list_by_id("CL1").unwrap().is_none());
        assert!(resolver.list_call_lists().unwrap().is_empty());
        assert!(resolver.candidates_for_call_list("CL1").unwrap().is_empty());
        assert!(resolver.call_list_items("CL1").unwrap().is_empty());
    }

    #[test]
    fn test_job_and_company_for_call_list() {
        let resolver = resolver();

        let both = resolver.job_and_company_for_call_list("CL1").unwrap();
        assert_eq!(both.job.unwrap().job_id, "JOB0007");
        assert_eq!(both.company.unwrap().company_id, "CO1");

        // job exists, company does not
        let orphan = resolver.job_and_company_for_call_list("CL4").unwrap();
        assert!(orphan.job.is_some());
        assert!(orphan.company.is_none());

        // job missing
        let dangling = resolver.job_and_company_for_call_list("CL3").unwrap();
        assert_eq!(dangling, JobAndCompany::default());

        // call list missing
        let missing = resolver.job_and_company_for_call_list("CL99").unwrap();
        assert_eq!(missing, JobAndCompany::default());
    }

    #[test]
    fn test_candidates_for_call_list_in_order() {
        let candidates = resolver().candidates_for_call_list("CL1").unwrap();

        let ids: Vec<&str> = candidates
            .iter()
            .map(|c| c["CandidateID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["C1", "C2", "C3", "C4"]);
        assert_eq!(candidates[0]["FullName"], "Ada Lovelace");
        // summary projection only
        assert!(candidates[0].get("Salary").is_none());
    }

    #[test]
    fn test_candidates_for_call_list_placeholder() {
        let candidates = resolver().candidates_for_call_list("CL02").unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0]["FullName"], "Grace Hopper");
        assert_eq!(candidates[1]["CandidateID"], "C404");
        assert_eq!(candidates[1]["FullName"], NOT_FOUND_NAME);
    }

    #[test]
    fn test_candidates_for_call_list_keeps_duplicate_ids() {
        let store = fixture().with_table(
            "CallLists",
            &["CallListID", "JobID", "CandidateIDs"],
            &[&["CL5", "J7", "C1,C1;C404;C404"]],
        );
        let candidates = JoinResolver::new(Arc::new(store))
            .candidates_for_call_list("CL05")
            .unwrap();

        let ids: Vec<&str> = candidates
            .iter()
            .map(|c| c["CandidateID"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["C1", "C1", "C404", "C404"]);
        assert_eq!(candidates[0], candidates[1]);
        assert_eq!(candidates[1]["FullName"], "Ada Lovelace");
        assert_eq!(candidates[3]["FullName"], NOT_FOUND_NAME);
    }

    #[test]
    fn test_candidates_for_call_list_empty_cell() {
        assert!(resolver().candidates_for_call_list("CL3").unwrap().is_empty());
    }

    #[test]
    fn test_call_list_bundle() {
        let bundle = resolver().call_list_bundle("CL0002").unwrap().unwrap();

        assert_eq!(bundle.call_list.name.as_deref(), Some("Design"));
        assert_eq!(bundle.job.as_ref().unwrap().job_id, "JOB0008");
        assert_eq!(bundle.company.as_ref().unwrap().company_id, "CO1");
        assert_eq!(bundle.candidates.len(), 2);

        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["callList"]["CallListID"], "CL2");
    }

    #[test]
    fn test_activities_for_context_is_union_sorted_desc() {
        let activities = resolver().activities_for_context("C1", "JOB0007").unwrap();
        let ids: Vec<&str> = activities.iter().map(|a| a.activity_id.as_str()).collect();

        // A2 and A4 tie on time and keep table order; A5 is undated
        assert_eq!(ids, vec!["A2", "A4", "A3", "A1", "A5"]);
    }

    #[test]
    fn test_activities_for_context_job_only() {
        let activities = resolver().activities_for_context("", "J7").unwrap();
        let ids: Vec<&str> = activities.iter().map(|a| a.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["A2", "A4"]);
    }

    #[test]
    fn test_activities_for_context_candidate_only() {
        let activities = resolver().activities_for_context("C2", "").unwrap();
        let ids: Vec<&str> = activities.iter().map(|a| a.activity_id.as_str()).collect();
        assert_eq!(ids, vec!["A6", "A2"]);
    }

    #[test]
    fn test_activities_table_missing_fails() {
        let store = MemoryStore::new();
        let resolver = JoinResolver::new(Arc::new(store));
        let err = resolver.activities_for_context("C1", "").unwrap_err();
        assert!(err.is_table_not_found());
    }

    #[test]
    fn test_call_list_items() {
        let store = fixture().with_table(
            "CallListsItems",
            &["CallListID", "CandidateID", "Status"],
            &[&["CL1", "C1", "Called"], &["CL0002", "C2", ""], &["CL01", "C3", "New"]],
        );
        let resolver = JoinResolver::new(Arc::new(store));

        let items = resolver.call_list_items("CL001").unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C3"]);
    }

    #[test]
    fn test_candidate_by_id() {
        let resolver = resolver();
        let candidate = resolver.candidate_by_id("C3").unwrap().unwrap();
        assert_eq!(candidate.extra.get("Salary").map(String::as_str), Some("z"));
        assert!(resolver.candidate_by_id("C404").unwrap().is_none());
    }
}
