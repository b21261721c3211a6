// Company KPIs + talent map
// Plain aggregation over already-loaded rows, recomputed on every call

use crate::entities::{Hire, Job};
use serde::{Deserialize, Serialize};

/// How many hires the bundle lists as "recent"
pub const RECENT_HIRES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyKpis {
    /// Jobs whose Status is exactly "Open"
    pub open_roles: usize,
    pub total_jobs: usize,
    /// Hires rows for the company
    pub hires: usize,
    /// Last five hires in table order, newest first
    pub recent_hires: Vec<Hire>,
    /// Hires grouped by Role → JobID → "Unknown", first-seen order
    pub role_distribution: Vec<RoleCount>,
}

/// Group hires by role label, keeping first-seen order
pub fn role_distribution(hires: &[Hire]) -> Vec<RoleCount> {
    let mut counts: Vec<RoleCount> = Vec::new();

    for hire in hires {
        let label = hire.role_label();
        match counts.iter_mut().find(|rc| rc.role == label) {
            Some(existing) => existing.count += 1,
            None => counts.push(RoleCount {
                role: label.to_string(),
                count: 1,
            }),
        }
    }

    counts
}

/// The last `RECENT_HIRES` rows, reversed so the newest comes first
pub fn recent_hires(hires: &[Hire]) -> Vec<Hire> {
    let start = hires.len().saturating_sub(RECENT_HIRES);
    hires[start..].iter().rev().cloned().collect()
}

/// Compute KPIs for one company's jobs and hires
pub fn compute(jobs: &[Job], hires: &[Hire]) -> CompanyKpis {
    CompanyKpis {
        open_roles: jobs.iter().filter(|job| job.is_open()).count(),
        total_jobs: jobs.len(),
        hires: hires.len(),
        recent_hires: recent_hires(hires),
        role_distribution: role_distribution(hires),
    }
}
