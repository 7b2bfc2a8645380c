//! pulse-cloud: service shell around the metrics engine
//!
//! - [`import`]: CSV/XLSX marketplace exports → order line items
//! - [`db`]: report store (PostgreSQL or in-memory)
//! - [`api`]: axum HTTP routes over the engine

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod logger;
pub mod state;

pub use config::Config;
pub use state::AppState;
