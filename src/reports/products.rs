use anyhow::Result;

use std::io::BufRead;

use crate::{
    console::Console,
    layout::{units, Column, Field},
    lookup,
    present::{Level, Presenter},
    query::Query,
    session::Session,
    usd::Usd,
};

const ALL_SQL: &str = "
    SELECT
        p.ProductID,
        p.ProductName,
        p.SKU,
        p.UnitPrice,
        c.CategoryName,
        s.SupplierName,
        COALESCE(SUM(i.QuantityAvailable), 0) AS Available,
        p.IsActive
    FROM Products p
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    LEFT JOIN Inventory i ON p.ProductID = i.ProductID
    GROUP BY p.ProductID, p.ProductName, p.SKU, p.UnitPrice, c.CategoryName, s.SupplierName, p.IsActive
    ORDER BY p.ProductName";

const BY_STORE_SQL: &str = "
    SELECT
        p.ProductID,
        p.ProductName,
        p.SKU,
        p.UnitPrice,
        c.CategoryName,
        s.SupplierName,
        COALESCE(i.QuantityAvailable, 0) AS Available,
        p.IsActive
    FROM Products p
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    LEFT JOIN Inventory i ON p.ProductID = i.ProductID AND i.StoreID = :store_id
    ORDER BY p.ProductName";

const BY_CATEGORY_SQL: &str = "
    SELECT
        p.ProductID,
        p.ProductName,
        p.SKU,
        p.UnitPrice,
        c.CategoryName,
        s.SupplierName,
        COALESCE(SUM(i.QuantityAvailable), 0) AS Available,
        p.IsActive
    FROM Products p
    INNER JOIN Categories c ON p.CategoryID = c.CategoryID
    INNER JOIN Suppliers s ON p.SupplierID = s.SupplierID
    LEFT JOIN Inventory i ON p.ProductID = i.ProductID
    WHERE p.CategoryID = :category_id
    GROUP BY p.ProductID, p.ProductName, p.SKU, p.UnitPrice, c.CategoryName, s.SupplierName, p.IsActive
    ORDER BY p.ProductName";

const fn columns(available: &'static str) -> [Column; 8] {
    [
        Column::number("Product ID", 10),
        Column::text("Name", 18),
        Column::text("SKU", 8),
        Column::number("Price", 9),
        Column::text("Category", 12),
        Column::text("Supplier", 14),
        Column::number(available, 18),
        Column::text("Status", 8),
    ]
}

const COLUMNS: [Column; 8] = columns("Total Available");

const STORE_COLUMNS: [Column; 8] = columns("Available at Store");

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductFilter {
    All,
    Store(i64),
    Category(i64),
}

impl ProductFilter {
    #[must_use]
    pub fn query(self) -> Query {
        match self {
            ProductFilter::All => Query::new("products", ALL_SQL),
            ProductFilter::Store(id) => {
                Query::new("products_by_store", BY_STORE_SQL).bind_id(":store_id", id)
            }
            ProductFilter::Category(id) => {
                Query::new("products_by_category", BY_CATEGORY_SQL).bind_id(":category_id", id)
            }
        }
    }
}

/// Asks how to filter, then renders.
///
/// # Errors
///
/// Returns an error only if reading input fails.
pub fn run<R: BufRead, P: Presenter>(console: &mut Console<R, P>) -> Result<()> {
    console.session().title("PRODUCTS REPORT");
    let options = ["All Products", "By Store", "By Category"];
    let Some(choice) = console.choose("Filter by:", &options)? else {
        return Ok(());
    };
    let filter = match choice {
        2 => console.pick(lookup::stores, "Store ID")?.map(ProductFilter::Store),
        3 => console.pick(lookup::categories, "Category ID")?.map(ProductFilter::Category),
        _ => Some(ProductFilter::All),
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

/// Products with price, category, supplier and available units: at one
/// store when filtered by store (zero where not stocked), otherwise summed
/// over all stores.
pub fn render(session: &mut Session<'_>, filter: ProductFilter) -> Option<usize> {
    let columns = match filter {
        ProductFilter::Store(_) => &STORE_COLUMNS,
        _ => &COLUMNS,
    };
    session.heading("PRODUCTS:");
    session.tabulate(&filter.query(), columns, |row| {
        let active: bool = row.get("IsActive")?;
        Ok(vec![
            Field::new(row.get::<_, i64>("ProductID")?),
            Field::new(row.get::<_, String>("ProductName")?),
            Field::new(row.get::<_, String>("SKU")?),
            Field::new(row.get::<_, Usd>("UnitPrice")?),
            Field::new(row.get::<_, String>("CategoryName")?),
            Field::new(row.get::<_, String>("SupplierName")?),
            Field::new(units(row.get("Available")?)),
            if active {
                Field::new("Active").level(Level::Good)
            } else {
                Field::new("Inactive").level(Level::Muted)
            },
        ])
    })
}
