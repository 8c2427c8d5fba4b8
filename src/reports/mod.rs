//! The eight reports on the main menu.
//!
//! Each report module has a `run` function that asks for its filter, and a
//! `render` function that takes the filter as a value and does the rest,
//! so reports can be exercised without a keyboard.

use anyhow::Result;

use std::io::BufRead;

use crate::{console::Console, present::Presenter};

pub mod categories;
pub mod inventory;
pub mod low_stock;
pub mod products;
pub mod sales;
pub mod stores;
pub mod suppliers;
pub mod top_suppliers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    Stores,
    Categories,
    Suppliers,
    Products,
    Inventory,
    Sales,
    LowStock,
    TopSuppliers,
}

impl Report {
    /// In menu order.
    pub const ALL: [Report; 8] = [
        Report::Stores,
        Report::Categories,
        Report::Suppliers,
        Report::Products,
        Report::Inventory,
        Report::Sales,
        Report::LowStock,
        Report::TopSuppliers,
    ];

    #[must_use]
    pub fn menu_label(self) -> &'static str {
        match self {
            Report::Stores => "Stores Report",
            Report::Categories => "Categories Report",
            Report::Suppliers => "Suppliers Report",
            Report::Products => "Products Report (with filtering)",
            Report::Inventory => "Inventory Report (with filtering)",
            Report::Sales => "Sales Report (with filtering)",
            Report::LowStock => "Low-Stock Products (with filtering)",
            Report::TopSuppliers => "Top-Performing Suppliers",
        }
    }

    /// Runs the report, prompting on `console` for any filter.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading input fails.
    pub fn run<R: BufRead, P: Presenter>(self, console: &mut Console<R, P>) -> Result<()> {
        match self {
            Report::Stores => {
                stores::render(&mut console.session());
            }
            Report::Categories => {
                categories::render(&mut console.session());
            }
            Report::Suppliers => {
                suppliers::render(&mut console.session());
            }
            Report::Products => products::run(console)?,
            Report::Inventory => inventory::run(console)?,
            Report::Sales => sales::run(console)?,
            Report::LowStock => low_stock::run(console)?,
            Report::TopSuppliers => top_suppliers::run(console)?,
        }
        Ok(())
    }
}
