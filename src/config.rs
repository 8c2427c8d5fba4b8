use clap::Parser;

use std::path::PathBuf;

use crate::layout::Style;

/// Startup configuration for the console.
///
/// Every option has a default, so the console runs with no arguments.
/// Values can also come from the environment, or a `.env` file in the
/// working directory.
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Path to the SQLite inventory database (opened read-only).
    #[arg(long, env = "INVENTORY_DB", default_value = "inventory.db")]
    pub database: PathBuf,

    /// How report rows are printed.
    #[arg(long, env = "INVENTORY_STYLE", value_enum, default_value_t)]
    pub style: Style,
}

impl Config {
    /// Parses the command line, after loading `.env` if there is one.
    #[must_use]
    pub fn load() -> Self {
        // a missing .env is normal
        let _ = dotenvy::dotenv();
        Self::parse()
    }
}
