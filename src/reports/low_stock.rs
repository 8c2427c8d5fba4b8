use anyhow::Result;
use chrono::NaiveDateTime;

use std::io::BufRead;

use crate::{
    console::Console,
    layout::{units, Column, Field},
    lookup,
    present::{Level, Presenter},
    query::Query,
    session::Session,
};

const ALL_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityAvailable, i.MinimumStock,
        i.MinimumStock - i.QuantityAvailable AS UnitsNeeded,
        s.SupplierName, s.Phone AS SupplierPhone, s.Email AS SupplierEmail,
        i.LastRestocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    WHERE i.QuantityAvailable <= i.MinimumStock
        AND p.IsActive = 1
    ORDER BY i.QuantityAvailable ASC, st.StoreName, p.ProductName";

const BY_STORE_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityAvailable, i.MinimumStock,
        i.MinimumStock - i.QuantityAvailable AS UnitsNeeded,
        s.SupplierName, s.Phone AS SupplierPhone, s.Email AS SupplierEmail,
        i.LastRestocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    WHERE i.QuantityAvailable <= i.MinimumStock
        AND p.IsActive = 1
        AND i.StoreID = :store_id
    ORDER BY i.QuantityAvailable ASC, st.StoreName, p.ProductName";

const BY_CATEGORY_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityAvailable, i.MinimumStock,
        i.MinimumStock - i.QuantityAvailable AS UnitsNeeded,
        s.SupplierName, s.Phone AS SupplierPhone, s.Email AS SupplierEmail,
        i.LastRestocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    WHERE i.QuantityAvailable <= i.MinimumStock
        AND p.IsActive = 1
        AND p.CategoryID = :category_id
    ORDER BY i.QuantityAvailable ASC, st.StoreName, p.ProductName";

const BY_STORE_AND_CATEGORY_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityAvailable, i.MinimumStock,
        i.MinimumStock - i.QuantityAvailable AS UnitsNeeded,
        s.SupplierName, s.Phone AS SupplierPhone, s.Email AS SupplierEmail,
        i.LastRestocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    WHERE i.QuantityAvailable <= i.MinimumStock
        AND p.IsActive = 1
        AND i.StoreID = :store_id
        AND p.CategoryID = :category_id
    ORDER BY i.QuantityAvailable ASC, st.StoreName, p.ProductName";

const COLUMNS: &[Column] = &[
    Column::text("Store", 16),
    Column::text("City", 10),
    Column::text("Product", 18),
    Column::text("SKU", 8),
    Column::text("Category", 10),
    Column::number("Available", 9),
    Column::number("Minimum", 7),
    Column::number("Units Needed", 12),
    Column::text("Supplier", 14),
    Column::text("Supplier Phone", 14),
    Column::text("Supplier Email", 26),
    Column::text("Last Restocked", 16),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LowStockFilter {
    All,
    Store(i64),
    Category(i64),
    StoreAndCategory { store: i64, category: i64 },
}

impl LowStockFilter {
    #[must_use]
    pub fn query(self) -> Query {
        match self {
            LowStockFilter::All => Query::new("low_stock", ALL_SQL),
            LowStockFilter::Store(id) => {
                Query::new("low_stock_by_store", BY_STORE_SQL).bind_id(":store_id", id)
            }
            LowStockFilter::Category(id) => {
                Query::new("low_stock_by_category", BY_CATEGORY_SQL).bind_id(":category_id", id)
            }
            LowStockFilter::StoreAndCategory { store, category } => {
                Query::new("low_stock_by_store_and_category", BY_STORE_AND_CATEGORY_SQL)
                    .bind_id(":store_id", store)
                    .bind_id(":category_id", category)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowStockSummary {
    pub lines: usize,
    pub units_needed: i64,
}

/// Asks how to filter, then renders.
///
/// # Errors
///
/// Returns an error only if reading input fails.
pub fn run<R: BufRead, P: Presenter>(console: &mut Console<R, P>) -> Result<()> {
    console.session().title("LOW-STOCK PRODUCTS REPORT");
    let Some(choice) = console.choose(
        "Filter by:",
        &[
            "All Low-Stock Products",
            "By Store",
            "By Category",
            "By Store AND Category",
        ],
    )? else {
        return Ok(());
    };
    let filter = match choice {
        2 => console.pick(lookup::stores, "Store ID")?.map(LowStockFilter::Store),
        3 => console.pick(lookup::categories, "Category ID")?.map(LowStockFilter::Category),
        4 => match console.pick(lookup::stores, "Store ID")? {
            Some(store) => console
                .pick(lookup::categories, "Category ID")?
                .map(|category| LowStockFilter::StoreAndCategory { store, category }),
            None => None,
        },
        _ => Some(LowStockFilter::All),
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

/// Active products at or below their minimum stock, emptiest first, with
/// who to call to restock them.
///
/// Returns `None` if the query failed.
pub fn render(session: &mut Session<'_>, filter: LowStockFilter) -> Option<LowStockSummary> {
    let mut units_needed = 0;
    session.heading("⚠️  LOW-STOCK ALERTS:");
    let lines = session.tabulate(&filter.query(), COLUMNS, |row| {
        let available: i64 = row.get("QuantityAvailable")?;
        let needed: i64 = row.get("UnitsNeeded")?;
        let restocked: Option<NaiveDateTime> = row.get("LastRestocked")?;
        units_needed += needed;
        let urgency = if available <= 0 {
            Level::Critical
        } else {
            Level::Warning
        };
        Ok(vec![
            Field::new(row.get::<_, String>("StoreName")?).level(urgency),
            Field::new(row.get::<_, String>("City")?),
            Field::new(row.get::<_, String>("ProductName")?),
            Field::new(row.get::<_, String>("SKU")?),
            Field::new(row.get::<_, String>("CategoryName")?),
            Field::new(units(available)).level(Level::Critical),
            Field::new(units(row.get("MinimumStock")?)),
            Field::new(units(needed)).level(Level::Accent),
            Field::new(row.get::<_, String>("SupplierName")?),
            Field::maybe(row.get::<_, Option<String>>("SupplierPhone")?),
            Field::maybe(row.get::<_, Option<String>>("SupplierEmail")?),
            Field::maybe(restocked.map(|t| t.format("%Y-%m-%d %H:%M"))),
        ])
    })?;
    if lines > 0 {
        session.out.blank();
        session.out.emphasize("SUMMARY:", Level::Accent);
        session
            .out
            .emphasize(&format!("Total Low-Stock Products: {lines}"), Level::Accent);
        session.out.emphasize(
            &format!("Total Units Needed to Restock: {}", units(units_needed)),
            Level::Accent,
        );
    }
    Some(LowStockSummary {
        lines,
        units_needed,
    })
}
