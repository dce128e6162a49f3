//! Persistence implementations
//!
//! The inspection collection is stored as one JSON array under a single key
//! of a [`sitecheck_store::KeyValueStore`].

mod codec;
mod kv_inspection_repo;

pub use codec::{decode_inspections, encode_inspections};
pub use kv_inspection_repo::{KvInspectionRepository, DEFAULT_INSPECTIONS_KEY};
