//! Pulse metrics engine
//!
//! Pure, synchronous computation over [`OrderRecord`] slices:
//!
//! - [`filter`]: Period Filter (sale path OR return path, warehouse)
//! - [`aggregator`]: Metrics Aggregator producing [`MetricResult`]
//! - [`economics`]: per-SKU / per-order profit, guardrail, Pareto
//! - [`comparator`]: period-over-period deltas
//!
//! Every call owns its accumulators; nothing is cached between calls.
//! Malformed record values degrade to "excluded" or "zero"; only malformed
//! call arguments return [`EngineError`].
//!
//! [`OrderRecord`]: shared::models::OrderRecord
//! [`MetricResult`]: shared::models::MetricResult

pub mod aggregator;
pub mod comparator;
pub mod dates;
pub mod dedup;
pub mod economics;
pub mod error;
pub mod filter;
pub mod money;
pub mod presets;
pub mod settings;

pub use aggregator::{MetricsQuery, aggregate};
pub use comparator::{compare_periods, percent_change, previous_window};
pub use dates::DateWindow;
pub use economics::compute_economics;
pub use error::{EngineError, EngineResult};
pub use filter::{PeriodFilter, filter_orders};
pub use presets::TimeRange;
pub use settings::EngineSettings;
