use crate::{
    layout::{units, Column, Field},
    query::Query,
    session::Session,
};

const SQL: &str = "
    SELECT
        s.StoreID,
        s.StoreName,
        s.City,
        s.State,
        s.Phone,
        s.ManagerName,
        COUNT(DISTINCT i.ProductID) AS ProductCount,
        COALESCE(SUM(i.QuantityOnHand), 0) AS TotalInventory
    FROM Stores s
    LEFT JOIN Inventory i ON s.StoreID = i.StoreID
    GROUP BY s.StoreID, s.StoreName, s.City, s.State, s.Phone, s.ManagerName
    ORDER BY s.StoreName";

const COLUMNS: &[Column] = &[
    Column::number("Store ID", 8),
    Column::text("Name", 18),
    Column::text("Location", 18),
    Column::text("Phone", 13),
    Column::text("Manager", 16),
    Column::number("Unique Products", 15),
    Column::number("Units On Hand", 13),
];

/// Every store, with how many distinct products it has ever stocked and
/// its total units on hand. Stores with no inventory show zeros.
pub fn render(session: &mut Session<'_>) -> Option<usize> {
    session.title("STORES REPORT");
    session.tabulate(&Query::new("stores", SQL), COLUMNS, |row| {
        let city: String = row.get("City")?;
        let state: String = row.get("State")?;
        Ok(vec![
            Field::new(row.get::<_, i64>("StoreID")?),
            Field::new(row.get::<_, String>("StoreName")?),
            Field::new(format!("{city}, {state}")),
            Field::maybe(row.get::<_, Option<String>>("Phone")?),
            Field::maybe(row.get::<_, Option<String>>("ManagerName")?),
            Field::new(row.get::<_, i64>("ProductCount")?),
            Field::new(units(row.get("TotalInventory")?)),
        ])
    })
}
