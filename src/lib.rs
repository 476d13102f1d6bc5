//! Sukhi admin - backend for managing AI agent profiles and their prompts

pub mod auth;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod server;
pub mod storage;

pub use error::{Error, Result};
