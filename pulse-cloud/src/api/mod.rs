//! API routes for pulse-cloud

pub mod health;
pub mod metrics;
pub mod reports;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let reports = Router::new()
        .route(
            "/api/reports",
            get(reports::list_reports).post(reports::upload_report),
        )
        .route(
            "/api/reports/{id}",
            patch(reports::set_report_active).delete(reports::delete_report),
        )
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let metrics = Router::new()
        .route("/api/metrics", get(metrics::get_metrics))
        .route("/api/metrics/economics", get(metrics::get_economics))
        .route("/api/metrics/comparison", get(metrics::get_comparison));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(reports)
        .merge(metrics)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
