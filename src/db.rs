use rusqlite::{Connection, OpenFlags, Row};
use tracing::debug;

use std::path::{Path, PathBuf};

use crate::{error::QueryError, query::Query};

/// Read-only access to the inventory database.
///
/// Holds only the location of the store. Every call to [`Database::stream`]
/// opens its own connection and drops it before returning, whatever the
/// outcome.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Runs `query` and calls `on_row` once per result row, in order.
    ///
    /// Rows are stepped one at a time; nothing is buffered. Returns the
    /// number of rows seen.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] if the database cannot be opened, or
    /// rejects or fails the statement, and [`QueryError::Unexpected`] with
    /// the first error returned by `on_row`, after which no further rows
    /// are read.
    pub fn stream<F>(&self, query: &Query, mut on_row: F) -> Result<usize, QueryError>
    where
        F: FnMut(&Row<'_>) -> anyhow::Result<()>,
    {
        debug!(query = query.name, params = ?query.params, "executing");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(query.sql)?;
        let bindings = query.bindings();
        let mut rows = stmt.query(bindings.as_slice())?;
        let mut count = 0;
        while let Some(row) = rows.next()? {
            on_row(row).map_err(QueryError::Unexpected)?;
            count += 1;
        }
        debug!(query = query.name, rows = count, "done");
        Ok(count)
    }
}
