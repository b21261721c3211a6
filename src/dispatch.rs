// Generic dispatcher
// Routes an entity tag plus loose options to the matching resolver call

use crate::error::{Result, StoreError};
use crate::resolver::JoinResolver;
use crate::store::TableStore;
use crate::writer::{ActivityDefaults, ActivityWriter, SavedActivity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// ENTITY TAGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Jobs,
    Job,
    Companies,
    Company,
    CompanyBundle,
    CompanyJobs,
    CallLists,
    CallList,
    CallListBundle,
    CallListCandidates,
    CallListJob,
    CallListItems,
    Candidate,
    Activities,
}

impl EntityTag {
    pub const ALL: [EntityTag; 14] = [
        EntityTag::Jobs,
        EntityTag::Job,
        EntityTag::Companies,
        EntityTag::Company,
        EntityTag::CompanyBundle,
        EntityTag::CompanyJobs,
        EntityTag::CallLists,
        EntityTag::CallList,
        EntityTag::CallListBundle,
        EntityTag::CallListCandidates,
        EntityTag::CallListJob,
        EntityTag::CallListItems,
        EntityTag::Candidate,
        EntityTag::Activities,
    ];

    /// Canonical spelling, also the form `from_str` compares against
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTag::Jobs => "jobs",
            EntityTag::Job => "job",
            EntityTag::Companies => "companies",
            EntityTag::Company => "company",
            EntityTag::CompanyBundle => "companybundle",
            EntityTag::CompanyJobs => "companyjobs",
            EntityTag::CallLists => "calllists",
            EntityTag::CallList => "calllist",
            EntityTag::CallListBundle => "calllistbundle",
            EntityTag::CallListCandidates => "calllistcandidates",
            EntityTag::CallListJob => "calllistjob",
            EntityTag::CallListItems => "calllistitems",
            EntityTag::Candidate => "candidate",
            EntityTag::Activities => "activities",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive; `-` and `_` are ignored (`call-list_bundle` → `calllistbundle`)
impl FromStr for EntityTag {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self> {
        let key: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        EntityTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == key)
            .ok_or_else(|| StoreError::UnknownEntity(raw.to_string()))
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Loose request options. `id` stands in for whichever id the entity needs
/// when the specific field is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataOptions {
    pub id: Option<String>,
    pub candidate_id: Option<String>,
    pub job_id: Option<String>,
    pub company_id: Option<String>,
    pub call_list_id: Option<String>,
}

impl DataOptions {
    pub fn with_id(id: impl Into<String>) -> Self {
        DataOptions {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// First non-blank of the specific option, then `id`
    fn pick<'a>(&'a self, specific: &'a Option<String>) -> Option<&'a str> {
        [specific, &self.id]
            .into_iter()
            .filter_map(|value| value.as_deref())
            .map(str::trim)
            .find(|value| !value.is_empty())
    }

    fn require<'a>(
        &'a self,
        tag: EntityTag,
        specific: &'a Option<String>,
        option: &'static str,
    ) -> Result<&'a str> {
        self.pick(specific).ok_or(StoreError::MissingOption {
            entity: tag.as_str(),
            option,
        })
    }

    /// Non-blank specific option only, no `id` fallback
    fn exact<'a>(&'a self, specific: &'a Option<String>) -> Option<&'a str> {
        specific
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

// ============================================================================
// DATA SERVICE
// ============================================================================

/// Resolver and writer over one shared store handle
#[derive(Clone)]
pub struct DataService {
    resolver: JoinResolver,
    writer: ActivityWriter,
}

impl DataService {
    pub fn new(store: Arc<dyn TableStore>, defaults: ActivityDefaults) -> Self {
        DataService {
            resolver: JoinResolver::new(store.clone()),
            writer: ActivityWriter::with_defaults(store, defaults),
        }
    }

    pub fn resolver(&self) -> &JoinResolver {
        &self.resolver
    }

    pub fn writer(&self) -> &ActivityWriter {
        &self.writer
    }

    /// Parse `entity` and dispatch. Unknown tags fail with `UnknownEntity`.
    pub fn get_data_by_name(&self, entity: &str, options: &DataOptions) -> Result<Value> {
        let tag: EntityTag = entity.parse()?;
        self.get_data(tag, options)
    }

    /// Entity-specific payload as JSON. Not-found lookups yield `null` or `[]`.
    pub fn get_data(&self, tag: EntityTag, options: &DataOptions) -> Result<Value> {
        tracing::debug!(entity = tag.as_str(), ?options, "get_data");
        let r = &self.resolver;

        let value = match tag {
            EntityTag::Jobs => serde_json::to_value(r.list_jobs()?)?,
            EntityTag::Job => {
                let id = options.require(tag, &options.job_id, "jobId")?;
                serde_json::to_value(r.job_by_id(id)?)?
            }
            EntityTag::Companies => serde_json::to_value(r.list_companies()?)?,
            EntityTag::Company => {
                let id = options.require(tag, &options.company_id, "companyId")?;
                serde_json::to_value(r.company_by_id(id)?)?
            }
            EntityTag::CompanyBundle => {
                let id = options.require(tag, &options.company_id, "companyId")?;
                serde_json::to_value(r.company_bundle(id)?)?
            }
            EntityTag::CompanyJobs => {
                let id = options.require(tag, &options.company_id, "companyId")?;
                serde_json::to_value(r.jobs_by_company(id)?)?
            }
            EntityTag::CallLists => serde_json::to_value(r.list_call_lists()?)?,
            EntityTag::CallList => {
                let id = options.require(tag, &options.call_list_id, "callListId")?;
                serde_json::to_value(r.call_list_by_id(id)?)?
            }
            EntityTag::CallListBundle => {
                let id = options.require(tag, &options.call_list_id, "callListId")?;
                serde_json::to_value(r.call_list_bundle(id)?)?
            }
            EntityTag::CallListCandidates => {
                let id = options.require(tag, &options.call_list_id, "callListId")?;
                serde_json::to_value(r.candidates_for_call_list(id)?)?
            }
            EntityTag::CallListJob => {
                let id = options.require(tag, &options.call_list_id, "callListId")?;
                serde_json::to_value(r.job_and_company_for_call_list(id)?)?
            }
            EntityTag::CallListItems => {
                let id = options.require(tag, &options.call_list_id, "callListId")?;
                serde_json::to_value(r.call_list_items(id)?)?
            }
            EntityTag::Candidate => {
                let id = options.require(tag, &options.candidate_id, "candidateId")?;
                serde_json::to_value(r.candidate_by_id(id)?)?
            }
            EntityTag::Activities => {
                let candidate_id = options.exact(&options.candidate_id);
                let job_id = options.exact(&options.job_id);
                if candidate_id.is_none() && job_id.is_none() {
                    return Err(StoreError::MissingOption {
                        entity: tag.as_str(),
                        option: "candidateId or jobId",
                    });
                }
                let activities = r.activities_for_context(
                    candidate_id.unwrap_or(""),
                    job_id.unwrap_or(""),
                )?;
                serde_json::to_value(activities)?
            }
        };

        Ok(value)
    }

    pub fn save_activity(&self, fields: &HashMap<String, String>) -> Result<SavedActivity> {
        self.writer.save_activity(fields)
    }
}
