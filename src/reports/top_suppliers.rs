use anyhow::Result;
use rusqlite::Row;

use std::io::BufRead;

use crate::{
    console::Console,
    layout::{units, Column, Field},
    present::{Level, Presenter},
    query::Query,
    session::Session,
    usd::Usd,
};

// Product counts and delivery totals are aggregated separately and joined
// on supplier, so neither is multiplied by the other's row count. The
// inner join on `active` drops suppliers with no active products.
macro_rules! ranked_by {
    ($order:literal) => {
        concat!(
            "
    WITH active AS (
        SELECT SupplierID, COUNT(*) AS ProductCount
        FROM Products
        WHERE IsActive = 1
        GROUP BY SupplierID
    ),
    delivered AS (
        SELECT
            SupplierID,
            SUM(QuantityDelivered) AS Units,
            COUNT(*) AS Deliveries,
            AVG(UnitCost) AS AvgCost,
            SUM(TotalCost) AS TotalCost
        FROM ProductDeliveries
        WHERE DeliveryStatus = 'Delivered'
        GROUP BY SupplierID
    )
    SELECT
        s.SupplierName, s.ContactName, s.Email, s.Phone, s.City, s.Country, s.Rating,
        a.ProductCount,
        COALESCE(d.Units, 0) AS TotalStockDelivered,
        COALESCE(d.Deliveries, 0) AS TotalDeliveries,
        COALESCE(d.AvgCost, 0) AS AvgDeliveryCost,
        COALESCE(d.TotalCost, 0) AS TotalValue
    FROM Suppliers s
    INNER JOIN active a ON s.SupplierID = a.SupplierID
    LEFT JOIN delivered d ON s.SupplierID = d.SupplierID
    ORDER BY ",
            $order,
            "
    LIMIT 10"
        )
    };
}

const BY_UNITS_SQL: &str = ranked_by!("TotalStockDelivered DESC, s.SupplierName");

const BY_PRODUCTS_SQL: &str =
    ranked_by!("a.ProductCount DESC, TotalStockDelivered DESC, s.SupplierName");

const BY_RATING_SQL: &str = ranked_by!("s.Rating DESC, TotalStockDelivered DESC, s.SupplierName");

const MOST_DELAYED_SQL: &str = "
    WITH active AS (
        SELECT SupplierID, COUNT(*) AS ProductCount
        FROM Products
        WHERE IsActive = 1
        GROUP BY SupplierID
    ),
    -- delayed means more than 4 whole days from order to delivery
    leads AS (
        SELECT
            SupplierID,
            QuantityDelivered,
            TotalCost,
            (strftime('%s', DeliveryDate) - strftime('%s', OrderDate)) / 86400 AS LeadDays
        FROM ProductDeliveries
        WHERE DeliveryStatus = 'Delivered'
            AND OrderDate IS NOT NULL
            AND DeliveryDate IS NOT NULL
    ),
    delays AS (
        SELECT
            SupplierID,
            COUNT(*) AS Deliveries,
            SUM(LeadDays > 4) AS Delayed,
            AVG(LeadDays) AS AvgLead,
            MAX(LeadDays) AS MaxLead,
            SUM(QuantityDelivered) AS Units,
            SUM(TotalCost) AS TotalCost
        FROM leads
        GROUP BY SupplierID
    )
    SELECT
        s.SupplierName, s.ContactName, s.Email, s.Phone, s.City, s.Country, s.Rating,
        a.ProductCount,
        d.Units AS TotalStockDelivered,
        d.Deliveries AS TotalDeliveries,
        d.Delayed AS DelayedDeliveries,
        d.AvgLead AS AvgLeadTimeDays,
        d.MaxLead AS MaxLeadTimeDays,
        d.TotalCost AS TotalValue
    FROM Suppliers s
    INNER JOIN active a ON s.SupplierID = a.SupplierID
    INNER JOIN delays d ON s.SupplierID = d.SupplierID
    WHERE d.Delayed > 0
    ORDER BY d.Delayed DESC, d.AvgLead DESC, s.SupplierName
    LIMIT 3";

const COLUMNS: &[Column] = &[
    Column::text("Rank", 4),
    Column::text("Supplier", 14),
    Column::text("Contact", 12),
    Column::text("Location", 14),
    Column::text("Email", 26),
    Column::text("Phone", 12),
    Column::text("Rating", 20),
    Column::number("Units Delivered", 15),
    Column::number("Deliveries", 10),
    Column::number("Products", 8),
    Column::number("Avg Unit Cost", 13),
    Column::number("Total Value", 12),
];

const DELAY_COLUMNS: &[Column] = &[
    Column::text("Rank", 4),
    Column::text("Supplier", 14),
    Column::text("Contact", 12),
    Column::text("Location", 14),
    Column::text("Email", 26),
    Column::text("Phone", 12),
    Column::text("Rating", 20),
    Column::text("Delayed Deliveries", 18),
    Column::number("Avg Lead Time", 13),
    Column::number("Longest Lead Time", 17),
    Column::number("Units Delivered", 15),
    Column::number("Products", 8),
    Column::number("Total Value", 12),
];

/// How to order suppliers. Only suppliers with at least one active
/// product take part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ranking {
    UnitsDelivered,
    ProductCount,
    Rating,
    /// Top 3 by delayed deliveries, then by average lead time.
    MostDelayed,
}

impl Ranking {
    /// Maps a sub-menu pick, counting from 1, to a ranking.
    #[must_use]
    pub fn from_choice(choice: usize) -> Self {
        match choice {
            2 => Ranking::ProductCount,
            3 => Ranking::Rating,
            4 => Ranking::MostDelayed,
            _ => Ranking::UnitsDelivered,
        }
    }

    #[must_use]
    pub fn query(self) -> Query {
        match self {
            Ranking::UnitsDelivered => Query::new("top_suppliers_by_units", BY_UNITS_SQL),
            Ranking::ProductCount => Query::new("top_suppliers_by_products", BY_PRODUCTS_SQL),
            Ranking::Rating => Query::new("top_suppliers_by_rating", BY_RATING_SQL),
            Ranking::MostDelayed => Query::new("most_delayed_suppliers", MOST_DELAYED_SQL),
        }
    }

    fn heading(self) -> String {
        let by = match self {
            Ranking::UnitsDelivered => "Total Stock Delivered",
            Ranking::ProductCount => "Number of Products",
            Ranking::Rating => "Supplier Rating",
            Ranking::MostDelayed => return "⚠️  TOP 3 SUPPLIERS - Most Delayed Deliveries:".into(),
        };
        format!("🏆 TOP 10 SUPPLIERS - Ranked by {by}:")
    }
}

/// Grand totals over the suppliers shown.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SupplierTotals {
    pub suppliers: usize,
    pub units: i64,
    pub products: i64,
    /// Most-delayed ranking only.
    pub delayed: i64,
    /// Sum of each supplier's average lead time. Most-delayed ranking only.
    pub lead_days: f64,
}

impl SupplierTotals {
    #[must_use]
    pub fn mean_lead_days(&self) -> f64 {
        if self.suppliers == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.suppliers as f64;
        self.lead_days / n
    }

    #[must_use]
    pub fn units_per_supplier(&self) -> i64 {
        match i64::try_from(self.suppliers) {
            Ok(n) if n > 0 => self.units / n,
            _ => 0,
        }
    }
}

/// `4.80/5.00 ⭐⭐⭐⭐⭐`, one star per rounded point.
#[must_use]
pub fn stars(rating: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = rating.round().clamp(0.0, 5.0) as usize;
    format!("{rating:.2}/5.00 {}", "⭐".repeat(count))
}

fn medal(rank: usize) -> Level {
    match rank {
        1 => Level::Warning,
        2 => Level::Muted,
        3 => Level::Accent,
        _ => Level::Plain,
    }
}

/// Asks for a ranking, then renders.
///
/// # Errors
///
/// Returns an error only if reading input fails.
pub fn run<R: BufRead, P: Presenter>(console: &mut Console<R, P>) -> Result<()> {
    console.session().title("TOP-PERFORMING SUPPLIERS REPORT");
    let Some(choice) = console.choose(
        "Rank suppliers by:",
        &[
            "Total Stock Delivered (All-Time)",
            "Number of Products Supplied",
            "Supplier Rating",
            "Most Delayed Deliveries (Top 3)",
        ],
    )?
    else {
        return Ok(());
    };
    render(&mut console.session(), Ranking::from_choice(choice));
    Ok(())
}

fn contact_fields(rank: usize, row: &Row<'_>) -> rusqlite::Result<Vec<Field>> {
    let city: Option<String> = row.get("City")?;
    let country: Option<String> = row.get("Country")?;
    let location = match (city, country) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (city, country) => city.or(country),
    };
    Ok(vec![
        Field::new(format!("#{rank}")).level(medal(rank)),
        Field::new(row.get::<_, String>("SupplierName")?),
        Field::maybe(row.get::<_, Option<String>>("ContactName")?),
        Field::maybe(location),
        Field::maybe(row.get::<_, Option<String>>("Email")?),
        Field::maybe(row.get::<_, Option<String>>("Phone")?),
        Field::new(stars(row.get("Rating")?)).level(Level::Warning),
    ])
}

/// Ranked suppliers with their delivery record, then grand totals.
///
/// Returns `None` if the query failed.
pub fn render(session: &mut Session<'_>, ranking: Ranking) -> Option<SupplierTotals> {
    let delayed_only = ranking == Ranking::MostDelayed;
    let columns = if delayed_only { DELAY_COLUMNS } else { COLUMNS };
    let mut totals = SupplierTotals::default();
    session.heading(&ranking.heading());
    let rows = session.tabulate(&ranking.query(), columns, |row| {
        let rank = totals.suppliers + 1;
        let mut fields = contact_fields(rank, row)?;
        let units_delivered: i64 = row.get("TotalStockDelivered")?;
        let products: i64 = row.get("ProductCount")?;
        let deliveries: i64 = row.get("TotalDeliveries")?;
        let value: Usd = row.get("TotalValue")?;
        if delayed_only {
            let delayed: i64 = row.get("DelayedDeliveries")?;
            let lead: f64 = row.get("AvgLeadTimeDays")?;
            let longest: i64 = row.get("MaxLeadTimeDays")?;
            #[allow(clippy::cast_precision_loss)]
            let share = delayed as f64 * 100.0 / deliveries as f64;
            fields.extend([
                Field::new(format!("{delayed} of {deliveries} ({share:.1}%)")).level(Level::Critical),
                Field::new(format!("{lead:.1} days")).level(Level::Warning),
                Field::new(format!("{longest} days")).level(Level::Warning),
                Field::new(units(units_delivered)),
                Field::new(products),
                Field::new(value),
            ]);
            totals.delayed += delayed;
            totals.lead_days += lead;
        } else {
            fields.extend([
                Field::new(units(units_delivered)).level(Level::Accent),
                Field::new(deliveries),
                Field::new(products),
                Field::new(row.get::<_, Usd>("AvgDeliveryCost")?),
                Field::new(value),
            ]);
        }
        totals.suppliers = rank;
        totals.units += units_delivered;
        totals.products += products;
        Ok(fields)
    })?;
    if rows > 0 {
        let out = &mut *session.out;
        out.blank();
        out.emphasize("OVERALL SUMMARY:", Level::Accent);
        if delayed_only {
            out.emphasize(
                &format!("Total Delayed Deliveries (Top 3): {}", totals.delayed),
                Level::Critical,
            );
            out.emphasize(
                &format!("Average Lead Time Across Top 3: {:.1} days", totals.mean_lead_days()),
                Level::Warning,
            );
            out.emphasize(
                &format!("Total Stock from These Suppliers: {} units", units(totals.units)),
                Level::Accent,
            );
            out.emphasize(
                &format!("Total Products from These Suppliers: {}", totals.products),
                Level::Accent,
            );
        } else {
            out.emphasize(
                &format!("Total Stock from Top Suppliers: {} units", units(totals.units)),
                Level::Accent,
            );
            out.emphasize(
                &format!("Total Products from Top Suppliers: {}", totals.products),
                Level::Accent,
            );
            out.emphasize(
                &format!(
                    "Average Stock per Supplier: {} units",
                    units(totals.units_per_supplier())
                ),
                Level::Accent,
            );
        }
    }
    Some(totals)
}
