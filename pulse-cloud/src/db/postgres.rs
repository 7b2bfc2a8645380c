//! PostgreSQL report store
//!
//! Line items are kept as one JSONB document per row in `report_orders`, so
//! adding a column to [`OrderRecord`] needs no migration.

use async_trait::async_trait;
use shared::AppError;
use shared::models::{OrderRecord, Report, ReportCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;
use sqlx::types::Json;

use super::ReportStore;
use crate::error::ServiceResult;

const REPORT_COLUMNS: &str = "id, name, platform, shop_id, is_active, order_count, created_at";

#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str) -> ServiceResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
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

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO reports (id, name, platform, shop_id, is_active, order_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(report.id)
        .bind(&report.name)
        .bind(&report.platform)
        .bind(&report.shop_id)
        .bind(report.is_active)
        .bind(report.order_count)
        .bind(report.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO report_orders (report_id, line_no, data)
            SELECT $1, t.ord, t.elem
            FROM jsonb_array_elements($2::jsonb) WITH ORDINALITY AS t(elem, ord)
            "#,
        )
        .bind(report.id)
        .bind(Json(&orders))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(
            report_id = report.id,
            orders = report.order_count,
            platform = %report.platform,
            "Report stored"
        );
        Ok(report)
    }

    async fn list_reports(&self) -> ServiceResult<Vec<Report>> {
        let reports = sqlx::query_as::<_, Report>(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    async fn set_active(&self, id: i64, active: bool) -> ServiceResult<Report> {
        let report = sqlx::query_as::<_, Report>(&format!(
            "UPDATE reports SET is_active = $2 WHERE id = $1 RETURNING {REPORT_COLUMNS}"
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::report_not_found(id))?;
        Ok(report)
    }

    async fn delete_report(&self, id: i64) -> ServiceResult<bool> {
        // report_orders rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn active_orders(
        &self,
        platform: Option<&str>,
        shop: Option<&str>,
    ) -> ServiceResult<Vec<OrderRecord>> {
        let rows: Vec<Json<OrderRecord>> = sqlx::query_scalar(
            r#"
            SELECT o.data
            FROM report_orders o
            JOIN reports r ON r.id = o.report_id
            WHERE r.is_active
              AND ($1::TEXT IS NULL OR lower(r.platform) = lower($1))
              AND ($2::TEXT IS NULL OR r.shop_id = $2)
            ORDER BY r.created_at, o.report_id, o.line_no
            "#,
        )
        .bind(platform)
        .bind(shop)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(order)| order).collect())
    }
}
