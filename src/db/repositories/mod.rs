//! Repositories over the SQLite store

pub mod admin;
pub mod agent;
pub mod prompt;
