// Talent Tables - Core Library
// Schema-less recruiting tables: readers, id normalization, joins, activity log
// Exposes all modules for use in CLI, API server, and tests

pub mod error;
pub mod store;       // Backing tabular engines (CSV dir, SQLite, memory)
pub mod table;       // Table Reader + Header Index
pub mod ids;         // Identifier Normalizer
pub mod projection;  // Row Projector
pub mod entities;    // Typed rows: Job, Company, Candidate, CallList, Activity, Hire
pub mod kpis;        // Company KPIs + talent map
pub mod resolver;    // Join Resolver
pub mod writer;      // Activity Writer
pub mod dispatch;    // getData dispatcher
pub mod config;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use store::{CsvStore, MemoryStore, SqliteStore, TableStore};
pub use table::{HeaderIndex, RowView, Table, TableSnapshot};
pub use ids::{
    call_list_ids_match, call_list_key, job_ids_match, normalize_job_id, parse_candidate_ids,
};
pub use projection::{candidate_summary, placeholder, project, Record, NOT_FOUND_NAME};
pub use entities::{Activity, CallList, CallListItem, Candidate, Company, Entity, Hire, Job};
pub use kpis::{CompanyKpis, RoleCount};
pub use resolver::{CallListBundle, CompanyBundle, JobAndCompany, JoinResolver};
pub use writer::{ActivityDefaults, ActivityWriter, SavedActivity};
pub use dispatch::{DataOptions, DataService, EntityTag};
pub use config::{Backend, Config};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
