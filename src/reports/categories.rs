use crate::{
    layout::{units, Column, Field},
    query::Query,
    session::Session,
};

const SQL: &str = "
    SELECT
        c.CategoryID,
        c.CategoryName,
        c.Description,
        COUNT(DISTINCT p.ProductID) AS ProductCount,
        COALESCE(SUM(i.QuantityOnHand), 0) AS TotalStock
    FROM Categories c
    LEFT JOIN Products p ON c.CategoryID = p.CategoryID
    LEFT JOIN Inventory i ON p.ProductID = i.ProductID
    GROUP BY c.CategoryID, c.CategoryName, c.Description
    ORDER BY c.CategoryName";

const COLUMNS: &[Column] = &[
    Column::number("Category ID", 11),
    Column::text("Name", 16),
    Column::text("Description", 30),
    Column::number("Number of Products", 18),
    Column::number("Total Stock Units", 17),
];

/// Every category, with its product count and the units on hand across all
/// stores. Categories with no products show zeros.
pub fn render(session: &mut Session<'_>) -> Option<usize> {
    session.title("CATEGORIES REPORT");
    session.tabulate(&Query::new("categories", SQL), COLUMNS, |row| {
        Ok(vec![
            Field::new(row.get::<_, i64>("CategoryID")?),
            Field::new(row.get::<_, String>("CategoryName")?),
            Field::maybe(row.get::<_, Option<String>>("Description")?),
            Field::new(row.get::<_, i64>("ProductCount")?),
            Field::new(units(row.get("TotalStock")?)),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixture::Fixture, layout::Style, present::Capture};

    #[test]
    fn counts_products_and_stock_per_category() {
        let fx = Fixture::new();
        let mut out = Capture::default();
        assert_eq!(render(&mut Session::new(&fx.db, &mut out, Style::Record)), Some(4));
        let text = out.text();
        assert!(text.contains("Name: Beverages\nDescription: Drinks and mixers\nNumber of Products: 2\nTotal Stock Units: 60\n"));
        assert!(text.contains("Name: Household\nDescription: Cleaning and paper goods\nNumber of Products: 2\nTotal Stock Units: 22\n"));
        assert!(text.contains("Name: Snacks\nDescription: Chips nuts and bars\nNumber of Products: 2\nTotal Stock Units: 50\n"));
    }

    #[test]
    fn category_without_products_shows_zeros() {
        let fx = Fixture::new();
        let mut out = Capture::default();
        render(&mut Session::new(&fx.db, &mut out, Style::Record));
        assert!(out.text().contains(
            "Category ID: 4\nName: Seasonal\nDescription: Holiday lines\nNumber of Products: 0\nTotal Stock Units: 0\n"
        ));
    }

    #[test]
    fn rows_come_out_in_name_order() {
        let fx = Fixture::new();
        let mut out = Capture::default();
        render(&mut Session::new(&fx.db, &mut out, Style::Record));
        let names: Vec<_> = out
            .text()
            .lines()
            .filter_map(|l| l.strip_prefix("Name: "))
            .collect();
        assert_eq!(names, vec!["Beverages", "Household", "Seasonal", "Snacks"]);
    }
}
