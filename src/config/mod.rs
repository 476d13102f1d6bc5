//! Configuration module
//! Handles loading the config file and environment overrides

pub mod config;

pub use config::{Config, PhotoConfig, S3Config, ServerConfig};
