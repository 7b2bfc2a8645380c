//! Uploaded report (one imported spreadsheet)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub name: String,
    /// Marketplace identifier, e.g. "shopee"
    pub platform: String,
    pub shop_id: String,
    pub is_active: bool,
    pub order_count: i64,
    /// Unix millis
    pub created_at: i64,
}

/// Create report payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreate {
    pub name: String,
    pub platform: String,
    pub shop_id: String,
}

/// Toggle payload for `PATCH /api/reports/{id}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportActivation {
    pub is_active: bool,
}

/// Upload response: the stored report plus import diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportUploaded {
    pub report: Report,
    pub skipped_rows: u64,
    pub mapped_columns: Vec<String>,
}
