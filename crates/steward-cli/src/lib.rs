//! Library half of the `steward` binary: configuration, logging setup and
//! gateway state persistence.

pub mod config;
pub mod observability;
pub mod state;

pub use config::AppConfig;
