//! Report API
//!
//! POST   /api/reports       multipart upload → import → store
//! GET    /api/reports       list reports, newest first
//! PATCH  /api/reports/{id}  toggle whether a report feeds the metrics
//! DELETE /api/reports/{id}  remove a report and its order lines

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use http::StatusCode;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Report, ReportActivation, ReportCreate, ReportUploaded};

use crate::import::import_orders;
use crate::state::AppState;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::new(ErrorCode::FileTooLarge);
    }
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}

/// POST /api/reports
pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<ReportUploaded>>> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut create = ReportCreate::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, bytes.to_vec()));
            }
            "name" => create.name = field.text().await.map_err(multipart_error)?.trim().to_string(),
            "platform" => {
                create.platform = field.text().await.map_err(multipart_error)?.trim().to_lowercase()
            }
            "shop" => create.shop_id = field.text().await.map_err(multipart_error)?.trim().to_string(),
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| AppError::with_message(ErrorCode::InvalidRequest, "No file provided"))?;
    if create.name.is_empty() {
        create.name = filename.clone();
    }

    let import_name = filename.clone();
    let outcome = tokio::task::spawn_blocking(move || import_orders(&bytes, &import_name))
        .await
        .map_err(|e| AppError::internal(format!("Import task failed: {e}")))??;

    if outcome.orders.is_empty() {
        return Err(AppError::import_failed("No order rows found").with_detail("filename", filename));
    }

    let report = state.store.insert_report(create, outcome.orders).await?;
    tracing::info!(
        report_id = report.id,
        filename = %filename,
        orders = report.order_count,
        skipped = outcome.skipped_rows,
        "Report uploaded"
    );

    Ok(Json(ApiResponse::success(ReportUploaded {
        report,
        skipped_rows: outcome.skipped_rows,
        mapped_columns: outcome.mapped_columns,
    })))
}

/// GET /api/reports
pub async fn list_reports(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<Report>>>> {
    let reports = state.store.list_reports().await?;
    Ok(Json(ApiResponse::success(reports)))
}

/// PATCH /api/reports/{id}
pub async fn set_report_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ReportActivation>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let report = state.store.set_active(id, req.is_active).await?;
    tracing::info!(report_id = id, is_active = req.is_active, "Report activation changed");
    Ok(Json(ApiResponse::success(report)))
}

/// DELETE /api/reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    if !state.store.delete_report(id).await? {
        return Err(AppError::report_not_found(id));
    }
    tracing::info!(report_id = id, "Report deleted");
    Ok(Json(ApiResponse::ok()))
}
