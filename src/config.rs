// Runtime configuration
// Picks the backing store and the recruiter defaults for written activities

use crate::error::Result;
use crate::store::{CsvStore, SqliteStore, TableStore};
use crate::writer::{ActivityDefaults, DEFAULT_ACTIVITY_TYPE, DEFAULT_RECRUITER_ID, DEFAULT_RECRUITER_NAME};
use std::path::PathBuf;
use std::sync::Arc;

pub const ENV_DATA_DIR: &str = "TALENT_DATA_DIR";
pub const ENV_SQLITE_PATH: &str = "TALENT_SQLITE_PATH";
pub const ENV_RECRUITER_ID: &str = "TALENT_RECRUITER_ID";
pub const ENV_RECRUITER_NAME: &str = "TALENT_RECRUITER_NAME";

pub const DEFAULT_DATA_DIR: &str = "./data";

/// Where the tables live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// One `<Table>.csv` per table in a directory
    Csv(PathBuf),
    /// One SQLite table per table in a database file
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub recruiter_id: String,
    pub recruiter_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: Backend::Csv(PathBuf::from(DEFAULT_DATA_DIR)),
            recruiter_id: DEFAULT_RECRUITER_ID.to_string(),
            recruiter_name: DEFAULT_RECRUITER_NAME.to_string(),
        }
    }
}

impl Config {
    /// Defaults overridden by `TALENT_*` environment variables.
    /// `TALENT_SQLITE_PATH` wins over `TALENT_DATA_DIR` when both are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get(ENV_SQLITE_PATH) {
            config.backend = Backend::Sqlite(PathBuf::from(path));
        } else if let Some(dir) = get(ENV_DATA_DIR) {
            config.backend = Backend::Csv(PathBuf::from(dir));
        }
        if let Some(id) = get(ENV_RECRUITER_ID) {
            config.recruiter_id = id;
        }
        if let Some(name) = get(ENV_RECRUITER_NAME) {
            config.recruiter_name = name;
        }

        config
    }

    pub fn activity_defaults(&self) -> ActivityDefaults {
        ActivityDefaults {
            activity_type: DEFAULT_ACTIVITY_TYPE.to_string(),
            recruiter_id: self.recruiter_id.clone(),
            recruiter_name: self.recruiter_name.clone(),
        }
    }

    /// Open the configured backend as a shared store handle
    pub fn open_store(&self) -> Result<Arc<dyn TableStore>> {
        let store: Arc<dyn TableStore> = match &self.backend {
            Backend::Csv(dir) => Arc::new(CsvStore::new(dir.clone())),
            Backend::Sqlite(path) => Arc::new(SqliteStore::open(path)?),
        };
        tracing::info!(backend = store.backend(), "store opened");
        Ok(store)
    }
}
