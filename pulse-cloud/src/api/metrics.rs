//! Analytics API
//!
//! Every endpoint reads the line items of the active reports (optionally
//! narrowed by platform/shop), runs the period filter and hands the slice
//! to the engine on a blocking thread.

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use pulse_engine::{
    DateWindow, EngineError, MetricsQuery, PeriodFilter, TimeRange, aggregate, compare_periods,
    compute_economics,
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, AppResult};
use shared::models::{EconomicsReport, MetricResult, OrderRecord, PeriodComparison};

use crate::state::AppState;

/// Shared query string of the analytics endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsParams {
    pub platform: Option<String>,
    pub shop: Option<String>,
    /// today | 7d | 30d | month | all | custom
    pub time_range: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub warehouse: Option<String>,
    pub ad_expense: Option<f64>,
}

impl MetricsParams {
    /// Explicit dates without a range mean `custom`
    fn time_range(&self) -> Result<TimeRange, EngineError> {
        match non_blank(&self.time_range) {
            Some(raw) => raw.parse(),
            None if non_blank(&self.start_date).is_some() || non_blank(&self.end_date).is_some() => {
                Ok(TimeRange::Custom)
            }
            None => Ok(TimeRange::All),
        }
    }

    fn window(&self, today: NaiveDate) -> Result<DateWindow, EngineError> {
        self.time_range()?.resolve(
            today,
            non_blank(&self.start_date),
            non_blank(&self.end_date),
        )
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn load_orders(state: &AppState, params: &MetricsParams) -> AppResult<Vec<OrderRecord>> {
    let orders = state
        .store
        .active_orders(non_blank(&params.platform), non_blank(&params.shop))
        .await?;
    Ok(orders)
}

async fn run_blocking<T, F>(job: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| AppError::internal(format!("Analytics task failed: {e}")))
}

/// GET /api/metrics
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<ApiResponse<MetricResult>>> {
    let window = params.window(today())?;
    let orders = load_orders(&state, &params).await?;
    let settings = state.settings;
    let warehouse = params.warehouse.clone();
    let mut query = MetricsQuery::new(window);
    if let Some(ad) = params.ad_expense {
        query = query.with_ad_expense(ad);
    }

    let result = run_blocking(move || {
        let selected = PeriodFilter::new(window, warehouse.as_deref()).apply(&orders);
        aggregate(selected, &query, &settings)
    })
    .await?;
    Ok(Json(ApiResponse::success(result)))
}

/// GET /api/metrics/economics
pub async fn get_economics(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<ApiResponse<EconomicsReport>>> {
    let window = params.window(today())?;
    let orders = load_orders(&state, &params).await?;
    let settings = state.settings;
    let warehouse = params.warehouse.clone();

    let report = run_blocking(move || {
        let selected = PeriodFilter::new(window, warehouse.as_deref()).apply(&orders);
        compute_economics(selected, &settings)
    })
    .await?;
    Ok(Json(ApiResponse::success(report)))
}

/// GET /api/metrics/comparison
///
/// Needs a bounded window: the previous period is derived from its length.
pub async fn get_comparison(
    State(state): State<AppState>,
    Query(params): Query<MetricsParams>,
) -> AppResult<Json<ApiResponse<PeriodComparison>>> {
    let (start, end) = params
        .window(today())?
        .bounds()
        .ok_or(EngineError::UnboundedWindow("comparison"))?;
    let orders = load_orders(&state, &params).await?;
    let settings = state.settings;
    let warehouse = params.warehouse.clone();
    let ad_expense = params.ad_expense;

    let comparison = run_blocking(move || {
        compare_periods(&orders, start, end, warehouse.as_deref(), ad_expense, &settings)
    })
    .await??;
    Ok(Json(ApiResponse::success(comparison)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dates_without_range_mean_custom() {
        let params = MetricsParams {
            start_date: Some("2024-05-01".into()),
            end_date: Some("2024-05-31".into()),
            ..Default::default()
        };
        let window = params.window(ymd(2024, 6, 10)).unwrap();
        assert_eq!(window.bounds(), Some((ymd(2024, 5, 1), ymd(2024, 5, 31))));
    }

    #[test]
    fn no_params_mean_everything() {
        let window = MetricsParams::default().window(ymd(2024, 6, 10)).unwrap();
        assert!(window.is_unrestricted());
    }

    #[test]
    fn presets_ignore_custom_dates() {
        let params = MetricsParams {
            time_range: Some("7d".into()),
            start_date: Some("2020-01-01".into()),
            ..Default::default()
        };
        let window = params.window(ymd(2024, 6, 10)).unwrap();
        assert_eq!(window.bounds(), Some((ymd(2024, 6, 4), ymd(2024, 6, 10))));
    }

    #[test]
    fn bad_inputs_are_rejected() {
        let params = MetricsParams {
            time_range: Some("fortnight".into()),
            ..Default::default()
        };
        assert!(params.window(ymd(2024, 6, 10)).is_err());

        let params = MetricsParams {
            start_date: Some("2024-06-10".into()),
            end_date: Some("2024-06-01".into()),
            ..Default::default()
        };
        assert!(matches!(
            params.window(ymd(2024, 6, 10)),
            Err(EngineError::InvalidWindow { .. })
        ));
    }
}
