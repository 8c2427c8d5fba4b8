use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

use std::io::BufRead;

use crate::{
    console::Console,
    layout::{units, Column, Field},
    lookup,
    present::{Level, Presenter},
    query::{Param, Query},
    session::Session,
    usd::Usd,
};

const ALL_SQL: &str = "
    SELECT
        s.SaleID, s.SaleDate, st.StoreName, p.ProductName, p.SKU, c.CategoryName,
        s.QuantitySold, s.SalePrice, s.TotalAmount, s.TransactionID
    FROM Sales s
    INNER JOIN Products p ON s.ProductID = p.ProductID
    INNER JOIN Stores st ON s.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    ORDER BY s.SaleDate DESC
    LIMIT 30";

const BY_PRODUCT_SQL: &str = "
    SELECT
        s.SaleID, s.SaleDate, st.StoreName, p.ProductName, p.SKU, c.CategoryName,
        s.QuantitySold, s.SalePrice, s.TotalAmount, s.TransactionID
    FROM Sales s
    INNER JOIN Products p ON s.ProductID = p.ProductID
    INNER JOIN Stores st ON s.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    WHERE s.ProductID = :product_id
    ORDER BY s.SaleDate DESC";

const BY_STORE_SQL: &str = "
    SELECT
        s.SaleID, s.SaleDate, st.StoreName, p.ProductName, p.SKU, c.CategoryName,
        s.QuantitySold, s.SalePrice, s.TotalAmount, s.TransactionID
    FROM Sales s
    INNER JOIN Products p ON s.ProductID = p.ProductID
    INNER JOIN Stores st ON s.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    WHERE s.StoreID = :store_id
    ORDER BY s.SaleDate DESC";

const BY_DATE_SQL: &str = "
    SELECT
        s.SaleID, s.SaleDate, st.StoreName, p.ProductName, p.SKU, c.CategoryName,
        s.QuantitySold, s.SalePrice, s.TotalAmount, s.TransactionID
    FROM Sales s
    INNER JOIN Products p ON s.ProductID = p.ProductID
    INNER JOIN Stores st ON s.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    WHERE s.SaleDate BETWEEN :start AND :end
    ORDER BY s.SaleDate DESC";

const COLUMNS: &[Column] = &[
    Column::number("Sale ID", 7),
    Column::text("Date", 19),
    Column::text("Store", 16),
    Column::text("Product", 18),
    Column::text("SKU", 8),
    Column::text("Category", 10),
    Column::number("Quantity Sold", 13),
    Column::number("Sale Price", 10),
    Column::number("Total Amount", 12),
    Column::text("Transaction ID", 14),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SalesFilter {
    /// The 30 most recent sales.
    All,
    Product(i64),
    Store(i64),
    /// Both days inclusive.
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl SalesFilter {
    #[must_use]
    pub fn query(self) -> Query {
        match self {
            SalesFilter::All => Query::new("sales", ALL_SQL),
            SalesFilter::Product(id) => {
                Query::new("sales_by_product", BY_PRODUCT_SQL).bind_id(":product_id", id)
            }
            SalesFilter::Store(id) => {
                Query::new("sales_by_store", BY_STORE_SQL).bind_id(":store_id", id)
            }
            SalesFilter::DateRange { start, end } => Query::new("sales_by_date", BY_DATE_SQL)
                .bind(":start", Param::Text(format!("{start} 00:00:00")))
                .bind(":end", Param::Text(format!("{end} 23:59:59"))),
        }
    }

    /// Builds a date range from two `yyyy-MM-dd` strings. Returns `None`
    /// if either is empty or not a date.
    #[must_use]
    pub fn date_range(start: &str, end: &str) -> Option<Self> {
        let parse = |s: &str| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok();
        Some(SalesFilter::DateRange {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

/// Units and revenue over the sales shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub units: i64,
    pub revenue: Usd,
}

/// Asks how to filter, then renders.
///
/// # Errors
///
/// Returns an error only if reading input fails.
pub fn run<R: BufRead, P: Presenter>(console: &mut Console<R, P>) -> Result<()> {
    console.session().title("SALES REPORT");
    let Some(choice) = console.choose(
        "Filter by:",
        &["All Sales", "By Product", "By Store", "By Date Range"],
    )? else {
        return Ok(());
    };
    let filter = match choice {
        2 => console.pick(lookup::products, "Product ID")?.map(SalesFilter::Product),
        3 => console.pick(lookup::stores, "Store ID")?.map(SalesFilter::Store),
        4 => {
            let start = console.prompt("\nEnter Start Date (yyyy-MM-dd): ")?;
            let end = console.prompt("Enter End Date (yyyy-MM-dd): ")?;
            start
                .zip(end)
                .and_then(|(start, end)| SalesFilter::date_range(&start, &end))
        }
        _ => Some(SalesFilter::All),
    };
    let mut session = console.session();
    match filter {
        Some(filter) => {
            render(&mut session, filter);
        }
        None => session.skip(),
    }
    Ok(())
}

/// Sale lines, newest first, followed by unit and revenue totals.
///
/// Returns `None` if the query failed.
pub fn render(session: &mut Session<'_>, filter: SalesFilter) -> Option<SalesSummary> {
    let mut summary = SalesSummary::default();
    session.heading("SALES:");
    let rows = session.tabulate(&filter.query(), COLUMNS, |row| {
        let date: NaiveDateTime = row.get("SaleDate")?;
        let quantity: i64 = row.get("QuantitySold")?;
        let total: Usd = row.get("TotalAmount")?;
        summary.units += quantity;
        summary.revenue += total;
        Ok(vec![
            Field::new(row.get::<_, i64>("SaleID")?),
            Field::new(date.format("%Y-%m-%d %H:%M:%S")),
            Field::new(row.get::<_, String>("StoreName")?),
            Field::new(row.get::<_, String>("ProductName")?),
            Field::new(row.get::<_, String>("SKU")?),
            Field::new(row.get::<_, String>("CategoryName")?),
            Field::new(units(quantity)),
            Field::new(row.get::<_, Usd>("SalePrice")?),
            Field::new(total),
            Field::new(row.get::<_, String>("TransactionID")?),
        ])
    })?;
    if rows > 0 {
        session.out.blank();
        session.out.emphasize("SUMMARY:", Level::Accent);
        session.out.emphasize(
            &format!("Total Units Sold: {}", units(summary.units)),
            Level::Accent,
        );
        session
            .out
            .emphasize(&format!("Total Revenue: {}", summary.revenue), Level::Accent);
    }
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixture::Fixture, layout::Style, present::Capture};

    use serde::Deserialize;

    fn rendered(filter: SalesFilter) -> (Option<SalesSummary>, String) {
        let fx = Fixture::new();
        let mut out = Capture::default();
        let summary = render(&mut Session::new(&fx.db, &mut out, Style::Record), filter);
        (summary, out.take())
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[derive(Debug, Deserialize)]
    struct SaleRecord {
        #[serde(rename = "QuantitySold")]
        qty: i64,
        #[serde(rename = "TotalAmount")]
        total: Usd,
    }

    #[test]
    fn date_range_parses_both_ends_or_nothing() {
        assert_eq!(
            SalesFilter::date_range("2024-01-15", " 2024-01-16 "),
            Some(SalesFilter::DateRange {
                start: day("2024-01-15"),
                end: day("2024-01-16")
            })
        );
        assert_eq!(SalesFilter::date_range("", "2024-01-16"), None);
        assert_eq!(SalesFilter::date_range("2024-01-15", "soon"), None);
        assert_eq!(SalesFilter::date_range("2024-13-01", "2024-01-16"), None);
    }

    #[test]
    fn date_range_query_covers_the_whole_end_day() {
        let query = SalesFilter::DateRange {
            start: day("2024-01-15"),
            end: day("2024-01-15"),
        }
        .query();
        assert_eq!(
            query.param(":start"),
            Some(&Param::Text("2024-01-15 00:00:00".into()))
        );
        assert_eq!(
            query.param(":end"),
            Some(&Param::Text("2024-01-15 23:59:59".into()))
        );
    }

    #[test]
    fn all_sales_totals_match_the_fixture() {
        let mut rdr = csv::Reader::from_path("testdata/Sales.csv").unwrap();
        let mut expected = SalesSummary::default();
        for record in rdr.deserialize() {
            let record: SaleRecord = record.unwrap();
            expected.units += record.qty;
            expected.revenue += record.total;
        }
        let (summary, text) = rendered(SalesFilter::All);
        assert_eq!(summary, Some(expected));
        assert_eq!(summary.unwrap().revenue, Usd::from_cents(4445));
        assert!(text.contains("Total records: 5"));
        assert!(text.contains("SUMMARY:\nTotal Units Sold: 13\nTotal Revenue: $44.45\n"));
    }

    #[test]
    fn sales_come_newest_first() {
        let (_, text) = rendered(SalesFilter::All);
        let ids: Vec<_> = text.lines().filter_map(|l| l.strip_prefix("Sale ID: ")).collect();
        assert_eq!(ids, vec!["3", "5", "1", "2", "4"]);
    }

    #[test]
    fn single_day_range_includes_only_that_day() {
        let (summary, text) = rendered(SalesFilter::DateRange {
            start: day("2024-01-15"),
            end: day("2024-01-15"),
        });
        assert_eq!(
            summary,
            Some(SalesSummary {
                units: 2,
                revenue: Usd::from_cents(998)
            })
        );
        assert!(text.contains(
            "Sale ID: 1\nDate: 2024-01-15 10:30:00\nStore: Downtown Market\nProduct: Cold Brew Coffee\n\
             SKU: BEV-001\nCategory: Beverages\nQuantity Sold: 2\nSale Price: $4.99\nTotal Amount: $9.98\n\
             Transaction ID: TXN-1001\n"
        ));
        assert!(text.contains("Total Revenue: $9.98\n"));
        assert!(text.contains("Total records: 1"));
    }

    #[test]
    fn range_end_includes_its_final_second() {
        let (summary, _) = rendered(SalesFilter::DateRange {
            start: day("2024-01-16"),
            end: day("2024-01-16"),
        });
        assert_eq!(summary.unwrap().units, 4);
    }

    #[test]
    fn by_store_and_by_product_filter_lines() {
        let (summary, _) = rendered(SalesFilter::Store(2));
        assert_eq!(
            summary,
            Some(SalesSummary {
                units: 10,
                revenue: Usd::from_cents(3118)
            })
        );
        let (summary, text) = rendered(SalesFilter::Product(1));
        assert_eq!(summary.unwrap().units, 3);
        assert!(text.contains("Total records: 2"));
    }

    #[test]
    fn empty_result_prints_no_summary() {
        let (summary, text) = rendered(SalesFilter::Store(3));
        assert_eq!(summary, Some(SalesSummary::default()));
        assert!(text.contains("No records found."));
        assert!(!text.contains("SUMMARY:"));
    }

    #[test]
    fn unreadable_amount_reports_an_error_and_skips_the_summary() {
        let fx = Fixture::new();
        fx.execute("UPDATE Sales SET TotalAmount = 'n/a' WHERE SaleID = 3;");
        let mut out = Capture::default();
        let summary = render(&mut Session::new(&fx.db, &mut out, Style::Record), SalesFilter::All);
        assert_eq!(summary, None);
        let text = out.text();
        assert!(text.contains("❌ Error:"));
        assert!(!text.contains("Database Error"));
        assert!(!text.contains("Error Code:"));
        assert!(!text.contains("SUMMARY:"));
        assert!(!text.contains("Total records"));
    }

    #[test]
    fn only_the_thirty_most_recent_sales_are_listed() {
        let fx = Fixture::new();
        let mut extra = String::new();
        for id in 100..140 {
            extra.push_str(&format!(
                "INSERT INTO Sales VALUES ({id}, 1, 1, 1, 1.00, 1.00, '2023-06-01 12:00:00', 'TXN-{id}');"
            ));
        }
        fx.execute(&extra);
        let mut out = Capture::default();
        let summary = render(&mut Session::new(&fx.db, &mut out, Style::Table), SalesFilter::All);
        assert_eq!(summary.unwrap().units, 13 + 25);
        assert!(out.text().contains("Total records: 30"));
    }
}
