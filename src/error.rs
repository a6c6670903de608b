use rusqlite::ErrorCode;
use thiserror::Error;

/// All possible errors from the store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("{table} #{id} not found")]
    RecordNotFound { table: &'static str, id: i64 },

    #[error("Unknown column `{column}` on table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Database worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Session connection lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// True when SQLite refused a write because of a NOT NULL, CHECK or
    /// FOREIGN KEY constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Db(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, StoreError>;
