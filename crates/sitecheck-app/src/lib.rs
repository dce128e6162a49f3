//! Application service layer - config, roster, drafts, submission, queries

pub mod app;
pub mod auth;
pub mod config;
pub mod repository;
pub mod roster;
pub mod scanner;
