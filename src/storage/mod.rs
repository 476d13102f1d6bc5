//! Photo storage for agent pictures
//!
//! A store takes the uploaded bytes and returns the URL they are served from.
//! The backing store is chosen from config at startup.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::PhotoConfig;
use crate::error::{Error, Result};

/// Directory (under the store root) that agent photos are written to
pub const PHOTO_PREFIX: &str = "agent-photos";

/// Route the local store's files are served from
pub const PHOTO_ROUTE: &str = "/photos";

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Persist `bytes` and return the URL they can be fetched from
    async fn put(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Used when no photo directory is configured; every upload fails
pub struct DisabledPhotoStore;

#[async_trait]
impl PhotoStore for DisabledPhotoStore {
    async fn put(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<String> {
        Err(Error::StorageNotConfigured)
    }
}

/// Writes photos to a local directory served under [`PHOTO_ROUTE`]
pub struct LocalPhotoStore {
    root: PathBuf,
    base_url: String,
}

impl LocalPhotoStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PhotoStore for LocalPhotoStore {
    async fn put(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let object_name = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let dir = self.root.join(PHOTO_PREFIX);

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Storage(format!("cannot create {:?}: {}", dir, e)))?;
        tokio::fs::write(dir.join(&object_name), bytes)
            .await
            .map_err(|e| Error::Storage(format!("cannot write {}: {}", object_name, e)))?;

        tracing::debug!("Stored photo {}/{}", PHOTO_PREFIX, object_name);
        Ok(format!(
            "{}{}/{}/{}",
            self.base_url, PHOTO_ROUTE, PHOTO_PREFIX, object_name
        ))
    }
}

/// Pick the store described by `config`
pub fn from_config(config: &PhotoConfig) -> Arc<dyn PhotoStore> {
    match &config.dir {
        Some(dir) if !dir.is_empty() => Arc::new(LocalPhotoStore::new(dir, &config.base_url)),
        _ => Arc::new(DisabledPhotoStore),
    }
}

/// Keep only characters that are safe in a single path segment
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    match cleaned.trim_start_matches('.') {
        "" => "photo".to_string(),
        rest => rest.to_string(),
    }
}
