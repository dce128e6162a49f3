//! Repository adapters for persistence layer

use std::path::PathBuf;

use sitecheck_infra::persistence::KvInspectionRepository;
use sitecheck_store::FileKeyValueStore;
use sitecheck_types::Result;

use crate::config::Config;

/// Inspection repository backed by the on-disk store
pub type FileInspectionRepository = KvInspectionRepository<FileKeyValueStore>;

/// Open the store directory named by the configuration
pub fn open_store(config: &Config) -> Result<FileKeyValueStore> {
    FileKeyValueStore::open(config.store_dir()?)
}

/// Open the inspection repository named by the configuration
pub fn open_inspection_repo(config: &Config) -> Result<FileInspectionRepository> {
    let store = open_store(config)?;
    Ok(KvInspectionRepository::with_key(store, config.store_key.clone()))
}

/// Open the inspection repository at a custom directory
pub fn open_inspection_repo_at(store_dir: PathBuf, key: &str) -> Result<FileInspectionRepository> {
    let store = FileKeyValueStore::open(store_dir)?;
    Ok(KvInspectionRepository::with_key(store, key))
}
