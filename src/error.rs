use thiserror::Error;

/// Why a report query did not run to completion.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The store refused the connection or the statement.
    #[error("Database Error: {0}")]
    Store(#[from] rusqlite::Error),
    /// Anything else raised while reading or formatting rows.
    #[error("Error: {0:#}")]
    Unexpected(anyhow::Error),
}

impl QueryError {
    /// The SQLite extended result code, when the store supplied one.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            QueryError::Store(rusqlite::Error::SqliteFailure(err, _)) => Some(err.extended_code),
            _ => None,
        }
    }
}
