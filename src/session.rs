use rusqlite::Row;
use tracing::warn;

use crate::{
    db::Database,
    error::QueryError,
    layout::{Column, Field, Layout, Style},
    present::{Level, Presenter},
    query::Query,
};

/// Everything a report needs to run: the store, somewhere to write, and
/// the output style.
///
/// All report queries go through [`Session::tabulate`] or [`Session::list`],
/// which is where failures are caught and turned into messages.
pub struct Session<'a> {
    pub db: &'a Database,
    pub out: &'a mut dyn Presenter,
    pub style: Style,
}

impl<'a> Session<'a> {
    pub fn new(db: &'a Database, out: &'a mut dyn Presenter, style: Style) -> Self {
        Self { db, out, style }
    }

    /// Runs `query`, rendering each row produced by `on_row` under
    /// `columns`.
    ///
    /// Returns the row count, or `None` if the query failed; the failure
    /// has already been shown to the user.
    pub fn tabulate<F>(&mut self, query: &Query, columns: &[Column], mut on_row: F) -> Option<usize>
    where
        F: FnMut(&Row<'_>) -> anyhow::Result<Vec<Field>>,
    {
        let layout = Layout::new(self.style, columns);
        let out = &mut *self.out;
        let mut started = false;
        let result = self.db.stream(query, |row| {
            let fields = on_row(row)?;
            // no header for an empty or failed result
            if !started {
                layout.header(out);
                started = true;
            }
            layout.row(out, &fields);
            Ok(())
        });
        self.finish(query, result, Some(&layout))
    }

    /// Runs `query`, writing the line produced by `on_row` for each row.
    pub fn list<F>(&mut self, query: &Query, mut on_row: F) -> Option<usize>
    where
        F: FnMut(&Row<'_>) -> anyhow::Result<String>,
    {
        let out = &mut *self.out;
        let result = self.db.stream(query, |row| {
            out.line(&on_row(row)?);
            Ok(())
        });
        self.finish(query, result, None)
    }

    fn finish(
        &mut self,
        query: &Query,
        result: Result<usize, QueryError>,
        layout: Option<&Layout<'_>>,
    ) -> Option<usize> {
        match result {
            Ok(0) => {
                self.out.emphasize("No records found.", Level::Warning);
                Some(0)
            }
            Ok(count) => {
                if let Some(layout) = layout {
                    layout.footer(self.out);
                }
                self.out.blank();
                self.out.emphasize(&format!("Total records: {count}"), Level::Muted);
                Some(count)
            }
            Err(err) => {
                warn!(query = query.name, error = %err, "query failed");
                self.report(&err);
                None
            }
        }
    }

    fn report(&mut self, err: &QueryError) {
        self.out.blank();
        self.out.emphasize(&format!("❌ {err}"), Level::Critical);
        if let Some(code) = err.code() {
            self.out.emphasize(&format!("Error Code: {code}"), Level::Critical);
        }
    }

    /// Shows the empty state for a report whose filter input could not be
    /// used, without touching the database.
    pub fn skip(&mut self) {
        self.out.emphasize("No records found.", Level::Warning);
    }

    pub fn title(&mut self, title: &str) {
        let rule = "═".repeat(60);
        self.out.emphasize(&rule, Level::Title);
        self.out.emphasize(&format!("{title:^60}").trim_end(), Level::Title);
        self.out.emphasize(&rule, Level::Title);
        self.out.blank();
    }

    pub fn heading(&mut self, heading: &str) {
        self.out.blank();
        self.out.emphasize(heading, Level::Heading);
        self.out.blank();
    }
}
