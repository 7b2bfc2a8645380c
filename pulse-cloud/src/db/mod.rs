//! Report storage
//!
//! A report is one imported spreadsheet: a header row in `reports` plus its
//! order line items. Only active reports feed the analytics endpoints.

mod memory;
mod postgres;

pub use memory::MemoryReportStore;
pub use postgres::PgReportStore;

use async_trait::async_trait;
use shared::models::{OrderRecord, Report, ReportCreate};

use crate::error::ServiceResult;

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Store a report with its line items; the report starts active
    async fn insert_report(
        &self,
        new: ReportCreate,
        orders: Vec<OrderRecord>,
    ) -> ServiceResult<Report>;

    /// Newest first
    async fn list_reports(&self) -> ServiceResult<Vec<Report>>;

    /// Fails with `ReportNotFound` for an unknown id
    async fn set_active(&self, id: i64, active: bool) -> ServiceResult<Report>;

    /// Removes the report and its line items; `false` when nothing matched
    async fn delete_report(&self, id: i64) -> ServiceResult<bool>;

    /// Line items of every active report, optionally narrowed by platform/shop
    async fn active_orders(
        &self,
        platform: Option<&str>,
        shop: Option<&str>,
    ) -> ServiceResult<Vec<OrderRecord>>;
}
