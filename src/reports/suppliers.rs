use crate::{
    layout::{Column, Field},
    query::Query,
    session::Session,
};

const SQL: &str = "
    SELECT
        s.SupplierID,
        s.SupplierName,
        s.ContactName,
        s.Email,
        s.Phone,
        s.City,
        s.Country,
        s.Rating,
        COUNT(DISTINCT p.ProductID) AS ProductCount
    FROM Suppliers s
    LEFT JOIN Products p ON s.SupplierID = p.SupplierID
    GROUP BY s.SupplierID, s.SupplierName, s.ContactName, s.Email, s.Phone, s.City, s.Country, s.Rating
    ORDER BY s.Rating DESC, s.SupplierName";

const COLUMNS: &[Column] = &[
    Column::number("Supplier ID", 11),
    Column::text("Name", 16),
    Column::text("Contact", 14),
    Column::text("Email", 26),
    Column::text("Phone", 13),
    Column::text("Location", 16),
    Column::number("Rating", 9),
    Column::number("Products Supplied", 17),
];

/// Every supplier, best rated first, with the number of products they
/// supply.
pub fn render(session: &mut Session<'_>) -> Option<usize> {
    session.title("SUPPLIERS REPORT");
    session.tabulate(&Query::new("suppliers", SQL), COLUMNS, |row| {
        let city: Option<String> = row.get("City")?;
        let country: Option<String> = row.get("Country")?;
        let location = match (city, country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            (city, country) => city.or(country),
        };
        Ok(vec![
            Field::new(row.get::<_, i64>("SupplierID")?),
            Field::new(row.get::<_, String>("SupplierName")?),
            Field::maybe(row.get::<_, Option<String>>("ContactName")?),
            Field::maybe(row.get::<_, Option<String>>("Email")?),
            Field::maybe(row.get::<_, Option<String>>("Phone")?),
            Field::maybe(location),
            Field::new(format!("{:.2}/5.00", row.get::<_, f64>("Rating")?)),
            Field::new(row.get::<_, i64>("ProductCount")?),
        ])
    })
}
