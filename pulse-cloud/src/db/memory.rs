//! In-process report store, used when no database is configured

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::AppError;
use shared::models::{OrderRecord, Report, ReportCreate};
use shared::util::{now_millis, snowflake_id};

use super::ReportStore;
use crate::error::ServiceResult;

struct StoredReport {
    report: Report,
    orders: Vec<OrderRecord>,
}

#[derive(Default)]
pub struct MemoryReportStore {
    reports: RwLock<BTreeMap<i64, StoredReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn scope_matches(report: &Report, platform: Option<&str>, shop: Option<&str>) -> bool {
    platform.is_none_or(|p| report.platform.eq_ignore_ascii_case(p))
        && shop.is_none_or(|s| report.shop_id == s)
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert_report(
        &self,
        new: ReportCreate,
        orders: Vec<OrderRecord>,
    ) -> ServiceResult<Report> {
        let report = Report {
            id: snowflake_id(),
            name: new.name,
            platform: new.platform,
            shop_id: new.shop_id,
            is_active: true,
            order_count: orders.len() as i64,
            created_at: now_millis(),
        };
        self.reports.write().insert(
            report.id,
            StoredReport {
                report: report.clone(),
                orders,
            },
        );
        Ok(report)
    }

    async fn list_reports(&self) -> ServiceResult<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .read()
            .values()
            .map(|stored| stored.report.clone())
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reports)
    }

    async fn set_active(&self, id: i64, active: bool) -> ServiceResult<Report> {
        let mut reports = self.reports.write();
        let stored = reports
            .get_mut(&id)
            .ok_or_else(|| AppError::report_not_found(id))?;
        stored.report.is_active = active;
        Ok(stored.report.clone())
    }

    async fn delete_report(&self, id: i64) -> ServiceResult<bool> {
        Ok(self.reports.write().remove(&id).is_some())
    }

    async fn active_orders(
        &self,
        platform: Option<&str>,
        shop: Option<&str>,
    ) -> ServiceResult<Vec<OrderRecord>> {
        Ok(self
            .reports
            .read()
            .values()
            .filter(|stored| stored.report.is_active)
            .filter(|stored| scope_matches(&stored.report, platform, shop))
            .flat_map(|stored| stored.orders.iter().cloned())
            .collect())
    }
}
