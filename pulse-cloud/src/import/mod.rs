//! Spreadsheet ingestion
//!
//! Turns an uploaded marketplace export (CSV or XLSX/XLS) into
//! [`OrderRecord`]s. The header row is located by content, not position:
//! exports often carry a title block above the table.

mod columns;
mod numbers;
mod reader;

pub use columns::{Field, match_header, normalize_header};
pub use reader::{Cell, FileFormat};

use shared::models::OrderRecord;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Rows scanned for a header before giving up
const HEADER_SCAN_ROWS: usize = 50;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read file: {0}")]
    Unreadable(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("No recognizable order columns found")]
    NoRecognizedColumns,
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match &err {
            ImportError::Unreadable(_) => AppError::with_message(ErrorCode::ImportFailed, err.to_string()),
            ImportError::UnsupportedFormat(name) => {
                AppError::with_message(ErrorCode::UnsupportedFileFormat, err.to_string())
                    .with_detail("filename", name.clone())
            }
            ImportError::EmptyFile => AppError::new(ErrorCode::EmptyFile),
            ImportError::NoRecognizedColumns => AppError::new(ErrorCode::NoRecognizedColumns),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub orders: Vec<OrderRecord>,
    /// Non-blank rows without an order id and without a product
    pub skipped_rows: u64,
    /// Wire names of the fields found in the header row
    pub mapped_columns: Vec<String>,
}

/// Parse an uploaded file into order line items
pub fn import_orders(bytes: &[u8], filename: &str) -> Result<ImportOutcome, ImportError> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyFile);
    }
    let format = FileFormat::from_filename(filename)
        .ok_or_else(|| ImportError::UnsupportedFormat(filename.to_string()))?;

    let rows = reader::read_rows(bytes, format)?;
    if rows.iter().all(|row| row.iter().all(Cell::is_blank)) {
        return Err(ImportError::EmptyFile);
    }

    let (header_idx, mapping) = rows
        .iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .map(|(idx, row)| (idx, map_header_row(row)))
        .find(|(_, mapping)| mapping.iter().any(Option::is_some))
        .ok_or(ImportError::NoRecognizedColumns)?;

    let mut mapped_columns: Vec<String> = Vec::new();
    for field in mapping.iter().flatten() {
        let name = field.name().to_string();
        if !mapped_columns.contains(&name) {
            mapped_columns.push(name);
        }
    }

    let mut outcome = ImportOutcome {
        mapped_columns,
        ..Default::default()
    };

    for row in &rows[header_idx + 1..] {
        if row.iter().all(Cell::is_blank) {
            continue;
        }
        let mut record = OrderRecord::default();
        for (cell, field) in row.iter().zip(&mapping) {
            if let Some(field) = field {
                field.apply(&mut record, cell);
            }
        }
        if record.order_id.is_empty()
            && record.sku_reference_no.is_empty()
            && record.product_name.is_empty()
        {
            outcome.skipped_rows += 1;
            continue;
        }
        outcome.orders.push(record);
    }

    tracing::debug!(
        filename,
        header_row = header_idx,
        orders = outcome.orders.len(),
        skipped = outcome.skipped_rows,
        columns = outcome.mapped_columns.len(),
        "Spreadsheet imported"
    );
    Ok(outcome)
}

fn map_header_row(row: &[Cell]) -> Vec<Option<Field>> {
    row.iter().map(|cell| match_header(&cell.text())).collect()
}
