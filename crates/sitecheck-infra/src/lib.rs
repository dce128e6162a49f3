//! Infrastructure layer - checklist import, photo compression, persistence

pub mod checklist;
pub mod persistence;
pub mod photo;
