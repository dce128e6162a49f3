//! Domain layer - scoring services and repository traits

pub mod repository;
pub mod service;
