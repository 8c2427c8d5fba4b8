#![doc = include_str!("../README.md")]

pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod layout;
pub mod lookup;
pub mod present;
pub mod query;
pub mod reports;
pub mod session;
pub mod usd;

#[cfg(test)]
mod fixture;

pub use config::Config;
pub use console::Console;
pub use db::Database;
pub use error::QueryError;
pub use present::{Capture, Presenter, Terminal};
pub use reports::Report;
pub use usd::Usd;
