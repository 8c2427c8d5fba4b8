//! A small inventory database on disk, built from `testdata/`.

use rusqlite::{params_from_iter, Connection};
use tempfile::TempDir;

use crate::db::Database;

/// Loaded in this order so foreign keys always point backwards.
const TABLES: &[&str] = &[
    "Stores",
    "Categories",
    "Suppliers",
    "Products",
    "Inventory",
    "Sales",
    "ProductDeliveries",
];

pub struct Fixture {
    pub db: Database,
    _dir: TempDir,
}

impl Fixture {
    /// Creates the schema and loads every table's CSV file.
    pub fn new() -> Self {
        let fx = Self::empty();
        let conn = Connection::open(fx.db.path()).unwrap();
        for table in TABLES {
            load_csv(&conn, table);
        }
        fx
    }

    /// Creates the schema with no rows.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&std::fs::read_to_string("testdata/schema.sql").unwrap())
            .unwrap();
        Self {
            db: Database::new(path),
            _dir: dir,
        }
    }

    /// Runs a write against the fixture, for tests that need extra rows.
    pub fn execute(&self, sql: &str) {
        Connection::open(self.db.path())
            .unwrap()
            .execute_batch(sql)
            .unwrap();
    }
}

/// Inserts `testdata/<table>.csv`. Columns come from the CSV header, empty
/// fields become NULL, and column affinity turns the rest into numbers.
fn load_csv(conn: &Connection, table: &str) {
    let mut rdr = csv::Reader::from_path(format!("testdata/{table}.csv")).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let columns: Vec<_> = headers.iter().collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    let mut stmt = conn.prepare(&sql).unwrap();
    for record in rdr.records() {
        let record = record.unwrap();
        let values = record.iter().map(|v| (!v.is_empty()).then_some(v));
        stmt.execute(params_from_iter(values)).unwrap();
    }
}
