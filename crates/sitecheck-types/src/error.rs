//! Error types for sitecheck

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to parse client roster {path}: {reason}")]
    Roster { path: String, reason: String },
}

/// Key-value store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store file corrupted ({path}): {reason}")]
    Corrupted { path: String, reason: String },

    #[error("Stored collection under '{key}' could not be decoded: {reason}")]
    Decode { key: String, reason: String },

    #[error("Store IO error: {0}")]
    IoError(String),
}

/// Checklist import errors
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// The file content could not be interpreted as its declared kind
    #[error("Failed to parse checklist {file}: {reason}")]
    Parse { file: String, reason: String },

    #[error("Unsupported checklist file (expected .csv, .txt or .json): {0}")]
    UnsupportedKind(String),

    #[error("Failed to read checklist: {0}")]
    Io(#[from] std::io::Error),
}

/// Photo compression errors
#[derive(Debug, Error)]
pub enum PhotoError {
    /// Input is not a decodable image
    #[error("Cannot decode photo {photo}: {reason}")]
    Decode { photo: String, reason: String },

    #[error("Failed to encode photo: {0}")]
    Encode(String),

    #[error("Invalid compression options: {0}")]
    InvalidOptions(String),

    #[error("Failed to read photo: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Checklist error: {0}")]
    Checklist(#[from] ChecklistError),

    #[error("Photo error: {0}")]
    Photo(#[from] PhotoError),

    /// Scoring was asked to average an empty area list
    #[error("Inspection has no areas to score")]
    NoAreas,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
