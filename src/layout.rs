use clap::ValueEnum;

use std::fmt::Display;

use crate::present::{Level, Presenter};

const RULE_WIDTH: usize = 60;

/// How report rows are rendered. Chosen once, at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Style {
    /// One labelled block per row, followed by a divider.
    #[default]
    Record,
    /// A header, one fixed-width line per row, and a closing divider.
    Table,
}

/// A report column: its label, and its width in table style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub width: usize,
    pub numeric: bool,
}

impl Column {
    #[must_use]
    pub const fn text(label: &'static str, width: usize) -> Self {
        Self {
            label,
            width,
            numeric: false,
        }
    }

    #[must_use]
    pub const fn number(label: &'static str, width: usize) -> Self {
        Self {
            label,
            width,
            numeric: true,
        }
    }
}

/// One formatted value in a row. `None` means the value is absent: record
/// style leaves the line out, table style shows `-`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Field {
    pub value: Option<String>,
    pub level: Level,
}

impl Field {
    pub fn new(value: impl Display) -> Self {
        Self {
            value: Some(value.to_string()),
            level: Level::Plain,
        }
    }

    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn maybe(value: Option<impl Display>) -> Self {
        value.map_or_else(Self::absent, Self::new)
    }

    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

/// Renders rows for a fixed set of columns in the chosen [`Style`].
#[derive(Clone, Copy, Debug)]
pub struct Layout<'a> {
    style: Style,
    columns: &'a [Column],
}

impl<'a> Layout<'a> {
    #[must_use]
    pub fn new(style: Style, columns: &'a [Column]) -> Self {
        Self { style, columns }
    }

    fn table_width(&self) -> usize {
        self.columns.iter().map(|c| c.width + 1).sum::<usize>().saturating_sub(1)
    }

    /// Written before the first row.
    pub fn header(&self, out: &mut dyn Presenter) {
        if self.style == Style::Table {
            let labels: Vec<_> = self
                .columns
                .iter()
                .map(|c| cell(c.label, c.width, c.numeric))
                .collect();
            out.emphasize(labels.join(" ").trim_end(), Level::Heading);
            out.line(&"─".repeat(self.table_width()));
        }
    }

    pub fn row(&self, out: &mut dyn Presenter, fields: &[Field]) {
        debug_assert_eq!(fields.len(), self.columns.len());
        match self.style {
            Style::Record => {
                for (column, field) in self.columns.iter().zip(fields) {
                    if let Some(value) = &field.value {
                        out.emphasize(&format!("{}: {value}", column.label), field.level);
                    }
                }
                out.line(&"─".repeat(RULE_WIDTH));
            }
            Style::Table => {
                let last = self.columns.len().saturating_sub(1);
                for (i, (column, field)) in self.columns.iter().zip(fields).enumerate() {
                    let text = field.value.as_deref().unwrap_or("-");
                    let mut text = cell(text, column.width, column.numeric);
                    if i == last {
                        text.truncate(text.trim_end().len());
                    } else {
                        text.push(' ');
                    }
                    out.write(&text, field.level);
                }
                out.blank();
            }
        }
    }

    /// Written after the last row, if there was one.
    pub fn footer(&self, out: &mut dyn Presenter) {
        if self.style == Style::Table {
            out.line(&"─".repeat(self.table_width()));
        }
    }
}

/// Fits `text` into exactly `width` characters, cutting it short with `…`
/// when it is too long.
#[must_use]
pub fn cell(text: &str, width: usize, right: bool) -> String {
    let fitted = if text.chars().count() > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        text.to_string()
    };
    if right {
        format!("{fitted:>width$}")
    } else {
        format!("{fitted:<width$}")
    }
}

/// Formats `n` with comma thousands separators.
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Like [`thousands`], for signed quantities.
#[must_use]
pub fn units(n: i64) -> String {
    if n < 0 {
        format!("-{}", thousands(n.unsigned_abs()))
    } else {
        thousands(n.unsigned_abs())
    }
}
