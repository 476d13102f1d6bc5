//! Error types shared by the repositories, auth and HTTP layers

/// Errors surfaced by the admin backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing, malformed, expired or otherwise unusable credentials
    #[error("{0}")]
    Unauthenticated(String),

    /// The named entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A caller-supplied key is already taken
    #[error("{0}")]
    Conflict(String),

    #[error("Admin with username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("{0}")]
    Validation(String),

    #[error("Photo storage is not configured on the server")]
    StorageNotConfigured,

    #[error("Photo storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when a SQLite UNIQUE/PRIMARY KEY constraint rejected a write
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Error::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}
