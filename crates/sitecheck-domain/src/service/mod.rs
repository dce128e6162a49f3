//! Domain services

pub mod scorer;

pub use scorer::{compute_metrics, metrics, score_inspection, InspectionScore};
