use anyhow::Result;
use tracing::debug;

use std::io::BufRead;

use crate::{
    config::Config,
    db::Database,
    layout::Style,
    present::{Level, Presenter},
    reports::Report,
    session::Session,
};

/// What the user picked from the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Report(Report),
    Exit,
}

impl MenuChoice {
    /// Maps a trimmed menu entry, exactly `"1"` to `"9"`, to a choice.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        if input == "9" {
            return Some(Self::Exit);
        }
        Report::ALL
            .iter()
            .zip(1..)
            .find(|(_, n)| n.to_string() == input)
            .map(|(report, _)| Self::Report(*report))
    }
}

/// The interactive reporting console.
///
/// Reads menu selections and filter values from `input` and writes
/// everything to `out`. Runs until the user picks Exit or `input` ends.
pub struct Console<R, P> {
    input: R,
    out: P,
    db: Database,
    style: Style,
}

impl<R: BufRead, P: Presenter> Console<R, P> {
    pub fn new(input: R, out: P, config: &Config) -> Self {
        Self {
            input,
            out,
            db: Database::new(&config.database),
            style: config.style,
        }
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.out
    }

    /// Runs the menu loop.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input fails. Query failures are
    /// shown to the user and the loop carries on.
    pub fn run(&mut self) -> Result<()> {
        self.banner();
        loop {
            self.menu();
            let Some(line) = self.prompt("\nEnter your choice (1-9): ")? else {
                break;
            };
            self.out.clear();
            match MenuChoice::parse(line.trim()) {
                Some(MenuChoice::Exit) => {
                    self.out.blank();
                    self.out.emphasize(
                        "Thank you for using the Inventory Control System!",
                        Level::Warning,
                    );
                    break;
                }
                Some(MenuChoice::Report(report)) => {
                    debug!(?report, "running report");
                    report.run(self)?;
                }
                None => {
                    self.out.blank();
                    self.out
                        .emphasize("❌ Invalid choice. Please select 1-9.", Level::Critical);
                }
            }
            self.out.blank();
            self.out.line(&"─".repeat(60));
            if self.prompt("Press Enter to continue...")?.is_none() {
                break;
            }
            self.out.clear();
        }
        Ok(())
    }

    fn banner(&mut self) {
        self.out.emphasize(&format!("╔{}╗", "═".repeat(60)), Level::Title);
        self.out.emphasize(
            &format!("║{:^60}║", "INVENTORY CONTROL SYSTEM - REPORTING PORTAL"),
            Level::Title,
        );
        self.out.emphasize(&format!("╚{}╝", "═".repeat(60)), Level::Title);
        self.out.blank();
    }

    fn menu(&mut self) {
        self.out.emphasize(&format!("┌{}┐", "─".repeat(60)), Level::Heading);
        self.out.emphasize(&format!("│{:^60}│", "MAIN MENU"), Level::Heading);
        self.out.emphasize(&format!("└{}┘", "─".repeat(60)), Level::Heading);
        self.out.blank();
        for (i, report) in Report::ALL.iter().enumerate() {
            self.out.line(&format!("  {}. {}", i + 1, report.menu_label()));
        }
        self.out.line("  9. Exit");
    }

    /// A [`Session`] over this console's database and output.
    pub fn session(&mut self) -> Session<'_> {
        Session::new(&self.db, &mut self.out, self.style)
    }

    /// Shows `text` and reads one line, without its line ending. Returns
    /// `None` at end of input.
    ///
    /// Bytes that are not UTF-8 are replaced rather than rejected, so they
    /// read as an unrecognised answer.
    ///
    /// # Errors
    ///
    /// Returns any error from reading `input`.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.out.write(text, Level::Plain);
        self.out.flush();
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Shows a numbered sub-menu and returns the option picked, counting
    /// from 1, or `None` at end of input. Any other unrecognised answer
    /// picks the first option.
    ///
    /// # Errors
    ///
    /// Returns any error from reading `input`.
    pub fn choose(&mut self, heading: &str, options: &[&str]) -> Result<Option<usize>> {
        self.out.line(heading);
        for (i, option) in options.iter().enumerate() {
            self.out.line(&format!("  {}. {option}", i + 1));
        }
        let Some(answer) = self.prompt(&format!("\nEnter your choice (1-{}): ", options.len()))?
        else {
            return Ok(None);
        };
        let answer = answer.trim();
        Ok(Some(
            (1..=options.len())
                .find(|n| n.to_string() == answer)
                .unwrap_or(1),
        ))
    }

    /// Shows a pick list with `lookup`, then asks for an id.
    ///
    /// Returns `None` if the pick list failed or the answer is not an
    /// integer. Such input is deliberately not re-prompted: the report just
    /// comes out empty.
    ///
    /// # Errors
    ///
    /// Returns any error from reading `input`.
    pub fn pick(&mut self, lookup: fn(&mut Session<'_>) -> bool, label: &str) -> Result<Option<i64>> {
        if !lookup(&mut self.session()) {
            return Ok(None);
        }
        let answer = self.prompt(&format!("\nEnter {label}: "))?;
        Ok(answer.and_then(|a| a.trim().parse().ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixture::Fixture, present::Capture};

    use std::{io::Cursor, path::PathBuf};

    fn config(db: &Database, style: Style) -> Config {
        Config {
            database: db.path().to_path_buf(),
            style,
        }
    }

    fn run(db: &Database, style: Style, script: &str) -> String {
        let mut console = Console::new(Cursor::new(script.to_string()), Capture::default(), &config(db, style));
        console.run().unwrap();
        console.presenter().text().to_string()
    }

    #[test]
    fn parse_maps_digits_to_reports_and_exit() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Report(Report::Stores)));
        assert_eq!(MenuChoice::parse("8"), Some(MenuChoice::Report(Report::TopSuppliers)));
        assert_eq!(MenuChoice::parse("9"), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("10"), None);
        assert_eq!(MenuChoice::parse("abc"), None);
        assert_eq!(MenuChoice::parse(""), None);
        assert_eq!(MenuChoice::parse("01"), None);
        assert_eq!(MenuChoice::parse("+1"), None);
        assert_eq!(MenuChoice::parse("09"), None);
    }

    #[test]
    fn exit_prints_farewell_and_stops() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "9\n");
        assert!(text.contains("MAIN MENU"));
        assert!(text.contains("Thank you for using the Inventory Control System!"));
        assert!(!text.contains("Press Enter"));
    }

    #[test]
    fn invalid_choice_shows_error_and_redisplays_menu() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "x\n\n9\n");
        assert!(text.contains("Invalid choice. Please select 1-9."));
        assert_eq!(text.matches("MAIN MENU").count(), 2);
        assert!(text.contains("Thank you"));
    }

    #[test]
    fn end_of_input_ends_the_loop() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "1\n");
        assert!(text.contains("STORES REPORT"));
        assert!(!text.contains("Thank you"));
    }

    #[test]
    fn report_runs_then_pauses_then_returns_to_menu() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Table, "1\n\n9\n");
        assert!(text.contains("Downtown Market"));
        assert!(text.contains("Total records: 3"));
        assert!(text.contains("Press Enter to continue..."));
        assert_eq!(text.matches("MAIN MENU").count(), 2);
    }

    #[test]
    fn non_numeric_store_id_runs_no_query() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "4\n2\nabc\n\n9\n");
        assert!(text.contains("Available Stores:"));
        assert!(!text.contains("PRODUCTS:"));
        assert!(text.contains("No records found."));
        assert!(text.contains("Thank you"));
    }

    #[test]
    fn store_failure_is_reported_and_menu_continues() {
        let db = Database::new(PathBuf::from("testdata/no-such.db"));
        let text = run(&db, Style::Record, "1\n\n9\n");
        assert!(text.contains("❌ Database Error:"));
        assert!(text.contains("Error Code:"));
        assert!(text.contains("Thank you"));
    }

    #[test]
    fn same_report_twice_gives_identical_output() {
        let fx = Fixture::new();
        let first = run(&fx.db, Style::Table, "7\n2\n1\n");
        let second = run(&fx.db, Style::Table, "7\n2\n1\n");
        assert_eq!(first, second);
    }

    #[test]
    fn sales_by_date_range_reads_both_dates() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "6\n4\n2024-01-15\n2024-01-15\n\n9\n");
        assert!(text.contains("Enter Start Date (yyyy-MM-dd): "));
        assert!(text.contains("Transaction ID: TXN-1001"));
        assert!(text.contains("Total Revenue: $9.98"));
    }

    #[test]
    fn bad_date_skips_the_sales_query() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "6\n4\n2024-01-15\nlater\n\n9\n");
        assert!(!text.contains("SALES:"));
        assert!(text.contains("No records found."));
        assert!(text.contains("Thank you"));
    }

    #[test]
    fn low_stock_by_store_and_category_asks_for_both() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "7\n4\n1\n1\n\n9\n");
        assert!(text.contains("Available Stores:"));
        assert!(text.contains("Available Categories:"));
        assert!(text.contains("Product: Sparkling Water"));
        assert!(text.contains("Total Units Needed to Restock: 2"));
    }

    #[test]
    fn most_delayed_suppliers_from_the_menu() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "8\n4\n\n9\n");
        assert!(text.contains("TOP-PERFORMING SUPPLIERS REPORT"));
        assert!(text.contains("Supplier: Cascade Foods"));
        assert!(!text.contains("Supplier: Pacific Goods"));
    }

    #[test]
    fn choose_defaults_to_first_option() {
        let fx = Fixture::new();
        let mut console = Console::new(
            Cursor::new("7\n\n3\n02\n".to_string()),
            Capture::default(),
            &config(&fx.db, Style::Record),
        );
        assert_eq!(console.choose("Filter by:", &["All", "Some"]).unwrap(), Some(1));
        assert_eq!(console.choose("Filter by:", &["All", "Some"]).unwrap(), Some(1));
        assert_eq!(console.choose("Filter by:", &["All", "Some", "Other"]).unwrap(), Some(3));
        assert_eq!(console.choose("Filter by:", &["All", "Some"]).unwrap(), Some(1));
        assert_eq!(console.choose("Filter by:", &["All", "Some"]).unwrap(), None);
    }

    #[test]
    fn non_utf8_input_is_an_invalid_choice() {
        let fx = Fixture::new();
        let mut console = Console::new(
            Cursor::new(b"\xff\xfe\n\n9\n".to_vec()),
            Capture::default(),
            &config(&fx.db, Style::Record),
        );
        console.run().unwrap();
        let text = console.presenter().text();
        assert!(text.contains("Invalid choice. Please select 1-9."));
        assert!(text.contains("Thank you for using the Inventory Control System!"));
    }

    #[test]
    fn zero_padded_menu_choice_is_invalid() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "01\n\n9\n");
        assert!(text.contains("Invalid choice. Please select 1-9."));
        assert!(!text.contains("STORES REPORT"));
    }

    #[test]
    fn end_of_input_at_a_sub_menu_runs_no_query() {
        let fx = Fixture::new();
        let text = run(&fx.db, Style::Record, "6\n");
        assert!(text.contains("SALES REPORT"));
        assert!(!text.contains("SALES:"));
        assert!(!text.contains("Total records"));
    }
}
