use rusqlite::types::ToSqlOutput;
use rusqlite::ToSql;

/// A value bound to a named placeholder such as `:store_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Param {
    Int(i64),
    Text(String),
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Param::Int(value) => ToSqlOutput::from(*value),
            Param::Text(value) => ToSqlOutput::from(value.as_str()),
        })
    }
}

/// A fixed statement template together with its bindings.
///
/// Report filters build these; user input only ever reaches the database
/// through [`Param`] values, never by editing `sql`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    /// Short label used in log output.
    pub name: &'static str,
    pub sql: &'static str,
    pub params: Vec<(&'static str, Param)>,
}

impl Query {
    #[must_use]
    pub fn new(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            sql,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn bind(mut self, placeholder: &'static str, value: Param) -> Self {
        self.params.push((placeholder, value));
        self
    }

    #[must_use]
    pub fn bind_id(self, placeholder: &'static str, id: i64) -> Self {
        self.bind(placeholder, Param::Int(id))
    }

    /// Returns the value bound to `placeholder`, if any.
    #[must_use]
    pub fn param(&self, placeholder: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|(name, _)| *name == placeholder)
            .map(|(_, value)| value)
    }

    pub(crate) fn bindings(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (*name, value as &dyn ToSql))
            .collect()
    }
}
