//! Data models
//!
//! Shared between the engine, the report store and the HTTP API.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.

pub mod comparison;
pub mod economics;
pub mod metrics;
pub mod order_record;
pub mod report;

// Re-exports
pub use comparison::*;
pub use economics::*;
pub use metrics::*;
pub use order_record::*;
pub use report::*;
