use anyhow::{bail, Context};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    ops::AddAssign,
    str::FromStr,
};

use crate::layout::thousands;

/// Represents an amount of money in USD currency.
///
/// The amount is stored internally as an integer number of cents, but the
/// [`Display`] implementation formats it for display as dollars to 2 decimal
/// places, with thousands separators: `$1,234.50`.
///
/// SQLite may hand a `NUMERIC(10,2)` column back as an integer (whole
/// dollars), a real, or text, so [`FromSql`] accepts all three.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(i64);

impl Usd {
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", thousands(cents / 100), cents % 100)
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let cleaned = s.trim().replace(['$', ','], "");
        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };
        let (dollars, cents) = digits.split_once('.').unwrap_or((digits, "0"));
        if cents.len() > 2 {
            bail!("{s:?}: more than two decimal places");
        }
        let dollars: i64 = dollars.parse().with_context(|| format!("{s:?}: bad amount"))?;
        let cents: i64 = format!("{cents:0<2}")
            .parse()
            .with_context(|| format!("{s:?}: bad cents"))?;
        let total = dollars * 100 + cents;
        Ok(Self(if negative { -total } else { total }))
    }
}

impl FromSql for Usd {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(dollars) => Ok(Self(dollars * 100)),
            #[allow(clippy::cast_possible_truncation)]
            ValueRef::Real(amount) => Ok(Self((amount * 100.0).round() as i64)),
            ValueRef::Text(_) => value
                .as_str()?
                .parse()
                .map_err(|e: anyhow::Error| FromSqlError::Other(e.into())),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl AddAssign for Usd {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
