//! Admin credential store

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::auth::password;
use crate::db::Database;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip)]
    pub hashed_password: String,
}

#[derive(Clone)]
pub struct AdminRepository {
    db: Database,
}

impl AdminRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Look up an admin by exact (case-sensitive) username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let username = username.to_string();
        self.db.run(move |conn| find(conn, &username)).await
    }

    /// Create an admin, hashing the password with a fresh salt
    pub async fn create(&self, username: &str, password: &str) -> Result<Admin> {
        if username.trim().is_empty() {
            return Err(Error::Validation("Username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::Validation("Password must not be empty".into()));
        }

        // Hashed before the write lock is taken
        let password = password.to_string();
        let hashed_password = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| Error::Internal(format!("password hashing task failed: {}", e)))??;
        let username = username.to_string();
        self.db
            .transaction(move |tx| {
                if find(tx, &username)?.is_some() {
                    return Err(Error::DuplicateUsername(username));
                }

                // The UNIQUE constraint still backs up the pre-read above
                if let Err(e) = tx.execute(
                    "INSERT INTO admins (username, hashed_password) VALUES (?1, ?2)",
                    params![username, hashed_password],
                ) {
                    let e = Error::from(e);
                    return Err(if e.is_constraint_violation() {
                        Error::DuplicateUsername(username)
                    } else {
                        e
                    });
                }

                let id = tx.last_insert_rowid();
                tracing::info!("Created admin: {}", username);
                Ok(Admin {
                    id,
                    username,
                    hashed_password,
                })
            })
            .await
    }

    /// Return the admin when the username exists and the password matches.
    /// Unknown users and wrong passwords are not distinguished.
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<Admin>> {
        let username = username.to_string();
        let password = password.to_string();
        self.db
            .run(move |conn| {
                let admin = find(conn, &username)?;
                Ok(admin.filter(|a| password::verify_password(&password, &a.hashed_password)))
            })
            .await
    }
}

fn find(conn: &Connection, username: &str) -> Result<Option<Admin>> {
    let admin = conn
        .query_row(
            "SELECT id, username, hashed_password FROM admins WHERE username = ?1",
            params![username],
            |row| {
                Ok(Admin {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    hashed_password: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(admin)
}
