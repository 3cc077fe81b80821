//! Primitives shared by every FX Desk crate.
//!
//! Currency and crypto codes with their display prefixes, amount formatting,
//! the office currency table, engine-assigned codes, the desk failure
//! categories, and layered configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
