//! Inspection repository over a key-value store

use sitecheck_domain::repository::InspectionRepository;
use sitecheck_store::KeyValueStore;
use sitecheck_types::{Error, Inspection, Result, StoreError};

use super::codec::{decode_inspections, encode_inspections};

/// Key under which the collection is stored
pub const DEFAULT_INSPECTIONS_KEY: &str = "bcs-inspections";

/// Stores the whole inspection collection, newest first, under one key
///
/// Every call reads the current collection from the store and every write
/// replaces it; there is no in-memory cache to go stale.
pub struct KvInspectionRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvInspectionRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_INSPECTIONS_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the collection, seeding an empty one when the key is missing
    pub fn load(&self) -> Result<Vec<Inspection>> {
        match self.store.get(&self.key)? {
            Some(raw) => decode_inspections(&raw).map_err(|e| {
                StoreError::Decode {
                    key: self.key.clone(),
                    reason: e.to_string(),
                }
                .into()
            }),
            None => {
                tracing::info!(key = %self.key, "no stored inspections, starting empty collection");
                self.persist(&[])?;
                Ok(Vec::new())
            }
        }
    }

    fn persist(&self, inspections: &[Inspection]) -> Result<()> {
        let raw = encode_inspections(inspections)?;
        self.store.set(&self.key, &raw)
    }
}

impl<S: KeyValueStore> InspectionRepository for KvInspectionRepository<S> {
    fn save(&self, inspection: &Inspection) -> std::result::Result<(), Error> {
        let mut inspections = self.load()?;
        if inspections.iter().any(|i| i.id == inspection.id) {
            return Err(Error::Validation(format!(
                "inspection id {} already exists",
                inspection.id
            )));
        }
        inspections.insert(0, inspection.clone());
        self.persist(&inspections)?;

        tracing::info!(
            id = %inspection.id,
            client = %inspection.client_id,
            total = inspections.len(),
            "saved inspection"
        );
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> std::result::Result<Option<Inspection>, Error> {
        Ok(self.load()?.into_iter().find(|i| i.id == id))
    }

    fn find_all(&self) -> std::result::Result<Vec<Inspection>, Error> {
        self.load()
    }
}
