use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Row;

use std::{fmt::Display, io::BufRead};

use crate::{
    console::Console,
    layout::{units, Column, Field},
    lookup,
    present::{Level, Presenter},
    query::Query,
    session::Session,
};

/// Where one product stands at one store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
    /// The store has no inventory record for the product at all.
    NotStocked,
}

impl StockStatus {
    /// Classifies an inventory record's `(available, minimum)` pair, or the
    /// lack of a record.
    #[must_use]
    pub fn derive(record: Option<(i64, i64)>) -> Self {
        match record {
            None => StockStatus::NotStocked,
            Some((available, _)) if available <= 0 => StockStatus::OutOfStock,
            Some((available, minimum)) if available <= minimum => StockStatus::LowStock,
            Some(_) => StockStatus::InStock,
        }
    }

    #[must_use]
    pub fn level(self) -> Level {
        match self {
            StockStatus::InStock => Level::Good,
            StockStatus::LowStock => Level::Warning,
            StockStatus::OutOfStock => Level::Critical,
            StockStatus::NotStocked => Level::Muted,
        }
    }
}

impl Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::NotStocked => "Not Stocked",
        })
    }
}

// Every query yields the same columns. `Stocked` is 0 where the cross join
// found no inventory record.

const ALL_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityOnHand, i.QuantityReserved, i.QuantityAvailable, i.MinimumStock,
        i.LastRestocked,
        1 AS Stocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    ORDER BY st.StoreName, p.ProductName
    LIMIT 50";

const BY_STORE_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        COALESCE(i.QuantityOnHand, 0) AS QuantityOnHand,
        COALESCE(i.QuantityReserved, 0) AS QuantityReserved,
        COALESCE(i.QuantityAvailable, 0) AS QuantityAvailable,
        COALESCE(i.MinimumStock, 0) AS MinimumStock,
        i.LastRestocked,
        i.InventoryID IS NOT NULL AS Stocked
    FROM Stores st
    CROSS JOIN Products p
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    LEFT JOIN Inventory i ON i.StoreID = st.StoreID AND i.ProductID = p.ProductID
    WHERE st.StoreID = :store_id
    ORDER BY c.CategoryName, p.ProductName";

const BY_CATEGORY_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        COALESCE(i.QuantityOnHand, 0) AS QuantityOnHand,
        COALESCE(i.QuantityReserved, 0) AS QuantityReserved,
        COALESCE(i.QuantityAvailable, 0) AS QuantityAvailable,
        COALESCE(i.MinimumStock, 0) AS MinimumStock,
        i.LastRestocked,
        i.InventoryID IS NOT NULL AS Stocked
    FROM Stores st
    CROSS JOIN Products p
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    LEFT JOIN Inventory i ON i.StoreID = st.StoreID AND i.ProductID = p.ProductID
    WHERE p.CategoryID = :category_id
    ORDER BY st.StoreName, p.ProductName";

const BY_PRODUCT_SQL: &str = "
    SELECT
        st.StoreName, st.City, p.ProductName, p.SKU, c.CategoryName,
        i.QuantityOnHand, i.QuantityReserved, i.QuantityAvailable, i.MinimumStock,
        i.LastRestocked,
        1 AS Stocked
    FROM Inventory i
    INNER JOIN Products p ON i.ProductID = p.ProductID
    INNER JOIN Stores st ON i.StoreID = st.StoreID
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    WHERE p.ProductID = :product_id
    ORDER BY st.StoreName";

const COLUMNS: &[Column] = &[
    Column::text("Store", 16),
    Column::text("City", 10),
    Column::text("Product", 18),
    Column::text("SKU", 8),
    Column::text("Category", 10),
    Column::number("On Hand", 7),
    Column::number("Reserved", 8),
    Column::number("Available", 9),
    Column::number("Minimum Stock", 13),
    Column::text("Status", 12),
];

const PRODUCT_COLUMNS: &[Column] = &[
    Column::text("Store", 16),
    Column::text("City", 10),
    Column::text("Product", 18),
    Column::text("SKU", 8),
    Column::text("Category", 10),
    Column::number("On Hand", 7),
    Column::number("Reserved", 8),
    Column::number("Available", 9),
    Column::number("Minimum Stock", 13),
    Column::text("Status", 12),
    Column::text("Last Restocked", 16),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryFilter {
    /// Stocked lines only, first 50.
    All,
    /// Every product at one store, stocked or not.
    Store(i64),
    /// Every store for one category's products, stocked or not.
    Category(i64),
    /// Stocked lines for one product.
    Product(i64),
}

impl InventoryFilter {
    #[must_use]
    pub fn query(self) -> Query {
        match self {
            InventoryFilter::All => Query::new("inventory", ALL_SQL),
            InventoryFilter::Store(id) => {
                Query::new("inventory_by_store", BY_STORE_SQL).bind_id(":store_id", id)
            }
            InventoryFilter::Category(id) => {
                Query::new("inventory_by_category", BY_CATEGORY_SQL).bind_id(":category_id", id)
            }
            InventoryFilter::Product(id) => {
                Query::new("inventory_by_product", BY_PRODUCT_SQL).bind_id(":product_id", id)
            }
        }
    }
}

/// One inventory row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryLine {
    pub store: String,
    pub city: String,
    pub product: String,
    pub sku: String,
    pub category: String,
    pub on_hand: i64,
    pub reserved: i64,
    pub available: i64,
    pub minimum: i64,
    pub last_restocked: Option<NaiveDateTime>,
    pub status: StockStatus,
}

impl InventoryLine {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let stocked: bool = row.get("Stocked")?;
        let available = row.get("QuantityAvailable")?;
        let minimum = row.get("MinimumStock")?;
        Ok(Self {
            store: row.get("StoreName")?,
            city: row.get("City")?,
            product: row.get("ProductName")?,
            sku: row.get("SKU")?,
            category: row.get("CategoryName")?,
            on_hand: row.get("QuantityOnHand")?,
            reserved: row.get("QuantityReserved")?,
            available,
            minimum,
            last_restocked: row.get("LastRestocked")?,
            status: StockStatus::derive(stocked.then_some((available, minimum))),
        })
    }
}

/// Asks how to filter, then renders.
///
/// # Errors
///
/// Returns an error only if reading input fails.
pub fn run<R: BufRead, P: Presenter>(console: &mut Console<R, P>) -> Result<()> {
    console.session().title("INVENTORY REPORT");
    let Some(choice) = console.choose(
        "Filter by:",
        &["All Inventory", "By Store", "By Category", "By Product ID"],
    )? else {
        return Ok(());
    };
    let filter = match choice {
        2 => console.pick(lookup::stores, "Store ID")?.map(InventoryFilter::Store),
        3 => console.pick(lookup::categories, "Category ID")?.map(InventoryFilter::Category),
        4 => console.pick(lookup::products, "Product ID")?.map(InventoryFilter::Product),
        _ => Some(InventoryFilter::All),
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

/// Quantities and stock status per store and product.
pub fn render(session: &mut Session<'_>, filter: InventoryFilter) -> Option<usize> {
    let by_product = matches!(filter, InventoryFilter::Product(_));
    let columns = if by_product { PRODUCT_COLUMNS } else { COLUMNS };
    session.heading("INVENTORY:");
    session.tabulate(&filter.query(), columns, |row| {
        let line = InventoryLine::from_row(row)?;
        let mut fields = vec![
            Field::new(line.store),
            Field::new(line.city),
            Field::new(line.product),
            Field::new(line.sku),
            Field::new(line.category),
            Field::new(units(line.on_hand)),
            Field::new(units(line.reserved)),
            Field::new(units(line.available)),
            Field::new(units(line.minimum)),
            Field::new(line.status).level(line.status.level()),
        ];
        if by_product {
            fields.push(Field::maybe(
                line.last_restocked.map(|t| t.format("%Y-%m-%d %H:%M")),
            ));
        }
        Ok(fields)
    })
}
