//! Shared types for Pulse
//!
//! Data contracts exchanged between the metrics engine, the report store and
//! the HTTP API, plus the unified error system.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{MetricResult, OrderRecord, Report};
