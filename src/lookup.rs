//! Pick lists shown before a filter prompt, so the user can see which ids
//! are valid.
//!
//! Each returns `false` if its query failed, in which case the caller
//! should abandon the prompt.

use crate::{query::Query, session::Session};

const STORES: &str = "SELECT StoreID, StoreName, City FROM Stores ORDER BY StoreName";

const CATEGORIES: &str = "SELECT CategoryID, CategoryName FROM Categories ORDER BY CategoryName";

const PRODUCTS: &str = "SELECT ProductID, ProductName, SKU FROM Products ORDER BY ProductName LIMIT 20";

pub fn stores(session: &mut Session<'_>) -> bool {
    session.out.blank();
    session.out.line("Available Stores:");
    session
        .list(&Query::new("lookup_stores", STORES), |row| {
            let id: i64 = row.get("StoreID")?;
            let name: String = row.get("StoreName")?;
            let city: String = row.get("City")?;
            Ok(format!("  [{id}] {name} - {city}"))
        })
        .is_some()
}

pub fn categories(session: &mut Session<'_>) -> bool {
    session.out.blank();
    session.out.line("Available Categories:");
    session
        .list(&Query::new("lookup_categories", CATEGORIES), |row| {
            let id: i64 = row.get("CategoryID")?;
            let name: String = row.get("CategoryName")?;
            Ok(format!("  [{id}] {name}"))
        })
        .is_some()
}

pub fn products(session: &mut Session<'_>) -> bool {
    session.out.blank();
    session.out.line("Available Products (first 20):");
    session
        .list(&Query::new("lookup_products", PRODUCTS), |row| {
            let id: i64 = row.get("ProductID")?;
            let name: String = row.get("ProductName")?;
            let sku: String = row.get("SKU")?;
            Ok(format!("  [{id}] {name} ({sku})"))
        })
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::Database, fixture::Fixture, layout::Style, present::Capture};

    #[test]
    fn stores_lists_every_store_by_name() {
        let fx = Fixture::new();
        let mut out = Capture::default();
        assert!(stores(&mut Session::new(&fx.db, &mut out, Style::Record)));
        let text = out.text();
        assert!(text.contains("Available Stores:"));
        assert!(text.contains("  [1] Downtown Market - Portland\n  [2] Eastside Depot - Seattle\n  [3] Harbor Outlet - San Diego\n"));
        assert!(text.contains("Total records: 3"));
    }

    #[test]
    fn categories_lists_empty_categories_too() {
        let fx = Fixture::new();
        let mut out = Capture::default();
        assert!(categories(&mut Session::new(&fx.db, &mut out, Style::Record)));
        assert!(out.text().contains("  [4] Seasonal\n"));
    }

    #[test]
    fn products_caps_the_list_at_twenty() {
        let fx = Fixture::new();
        let mut extra = String::new();
        for id in 100..130 {
            extra.push_str(&format!(
                "INSERT INTO Products VALUES ({id}, 'Zz Item {id}', 'ZZ-{id}', 1, 1, 1.00, 1);"
            ));
        }
        fx.execute(&extra);
        let mut out = Capture::default();
        assert!(products(&mut Session::new(&fx.db, &mut out, Style::Record)));
        let text = out.text();
        assert!(text.contains("  [1] Cold Brew Coffee (BEV-001)"));
        assert!(text.contains("Total records: 20"));
    }

    #[test]
    fn failure_is_reported_and_returns_false() {
        let db = Database::new("testdata/missing.db");
        let mut out = Capture::default();
        assert!(!stores(&mut Session::new(&db, &mut out, Style::Record)));
        assert!(out.text().contains("Database Error:"));
    }
}
