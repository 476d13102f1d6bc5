//! Database connection management
//!
//! rusqlite is synchronous, so every call borrows a pooled connection on a
//! blocking worker thread and hands it back when the closure returns.

use std::path::Path;

use anyhow::Context;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

use super::schema::SCHEMA;
use crate::error::{Error, Result};

const MAX_CONNECTIONS: u32 = 8;

#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
    path: String,
}

impl Database {
    /// Open (or create) the database file and initialize the schema
    pub fn new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {:?}", parent))?;
            }
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA journal_mode = WAL;
                 PRAGMA busy_timeout = 5000;",
            )
        });

        let pool = Pool::builder()
            .max_size(MAX_CONNECTIONS)
            .build(manager)
            .with_context(|| format!("Failed to open database at {:?}", path))?;

        pool.get()?
            .execute_batch(SCHEMA)
            .context("Failed to initialize schema")?;

        info!("Database initialized at {:?}", path);

        Ok(Self {
            pool,
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Get the database path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run `f` against a pooled connection off the async runtime
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| Error::Internal(format!("database task failed: {}", e)))?
    }

    /// Run `f` inside a `BEGIN IMMEDIATE` transaction, committing on success
    pub async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.run(move |conn| {
            let tx = Transaction::new(conn, TransactionBehavior::Immediate)?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
    }

    /// Check if database is accessible (for health checks)
    pub async fn health_check(&self) -> bool {
        let result = self
            .run(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map_err(Error::from)
            })
            .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                false
            }
        }
    }
}
