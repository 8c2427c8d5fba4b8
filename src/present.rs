use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize as _;
use tracing::debug;

use std::io::{self, Write as _};

/// How strongly a piece of text should stand out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Level {
    #[default]
    Plain,
    /// Report titles and the banner.
    Title,
    /// Section headings such as `SALES:`.
    Heading,
    /// Healthy values.
    Good,
    /// Needs attention soon.
    Warning,
    /// Needs attention now, and errors.
    Critical,
    /// Derived figures and summaries.
    Accent,
    /// Bookkeeping lines like record counts.
    Muted,
}

/// Where the console writes its output.
///
/// Colour is treated as a hint: implementations are free to ignore
/// `level`, and [`Capture`] does.
pub trait Presenter {
    /// Writes `text` with no trailing newline.
    fn write(&mut self, text: &str, level: Level);

    /// Clears the screen, if there is one.
    fn clear(&mut self) {}

    /// Makes any pending output visible, for prompts.
    fn flush(&mut self) {}

    fn line(&mut self, text: &str) {
        self.emphasize(text, Level::Plain);
    }

    fn emphasize(&mut self, text: &str, level: Level) {
        self.write(text, level);
        self.write("\n", Level::Plain);
    }

    fn blank(&mut self) {
        self.write("\n", Level::Plain);
    }
}

/// Writes to standard output with ANSI colours.
#[derive(Debug, Default)]
pub struct Terminal;

impl Presenter for Terminal {
    fn write(&mut self, text: &str, level: Level) {
        let mut stdout = io::stdout().lock();
        let result = match level {
            Level::Plain => write!(stdout, "{text}"),
            Level::Title => write!(stdout, "{}", text.cyan().bold()),
            Level::Heading => write!(stdout, "{}", text.green().bold()),
            Level::Good => write!(stdout, "{}", text.green()),
            Level::Warning => write!(stdout, "{}", text.yellow()),
            Level::Critical => write!(stdout, "{}", text.red()),
            Level::Accent => write!(stdout, "{}", text.cyan()),
            Level::Muted => write!(stdout, "{}", text.dimmed()),
        };
        // stdout may be a closed pipe, as with `| head`
        if let Err(err) = result {
            debug!(error = %err, "write to stdout failed");
        }
    }

    fn clear(&mut self) {
        // a failed clear only leaves old output on screen
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    fn flush(&mut self) {
        let _ = io::stdout().flush();
    }
}

/// Collects output as plain text, dropping colour.
#[derive(Debug, Default)]
pub struct Capture {
    text: String,
}

impl Capture {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Empties the buffer, returning what it held.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

impl Presenter for Capture {
    fn write(&mut self, text: &str, _level: Level) {
        self.text.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_writes_every_level() {
        let mut out = Terminal;
        for level in [Level::Plain, Level::Title, Level::Critical, Level::Muted] {
            out.emphasize("status", level);
        }
        out.flush();
    }

    #[test]
    fn capture_ignores_levels_and_joins_lines() {
        let mut out = Capture::default();
        out.emphasize("Low Stock", Level::Warning);
        out.line("done");
        out.blank();
        assert_eq!(out.text(), "Low Stock\ndone\n\n");
        assert_eq!(out.take(), "Low Stock\ndone\n\n");
        assert_eq!(out.text(), "");
    }
}
