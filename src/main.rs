use anyhow::Result;
use tracing_subscriber::EnvFilter;

use std::io;

use inventory_reports::{Config, Console, Terminal};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let config = Config::load();
    tracing::info!(database = %config.database.display(), style = ?config.style, "starting");
    Console::new(io::stdin().lock(), Terminal, &config).run()
}
