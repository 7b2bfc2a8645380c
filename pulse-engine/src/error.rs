//! Engine call-contract errors
//!
//! Malformed *values inside records* never surface here; they degrade to
//! "excluded" or "zero". Only bad call-time arguments do.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Invalid {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidWindow { start: String, end: String },

    #[error("A bounded date window is required: {0}")]
    UnboundedWindow(&'static str),

    #[error("Unknown time range '{0}' (expected today, 7d, 30d, month, all or custom)")]
    UnknownTimeRange(String),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::InvalidDate { field, value } => {
                AppError::with_message(ErrorCode::InvalidDate, message)
                    .with_detail("field", field)
                    .with_detail("value", value)
            }
            EngineError::InvalidWindow { start, end } => {
                AppError::with_message(ErrorCode::InvalidDateRange, message)
                    .with_detail("startDate", start)
                    .with_detail("endDate", end)
            }
            EngineError::UnboundedWindow(_) => {
                AppError::with_message(ErrorCode::InvalidDateRange, message)
            }
            EngineError::UnknownTimeRange(value) => {
                AppError::with_message(ErrorCode::InvalidRequest, message).with_detail("timeRange", value)
            }
            EngineError::InvalidSetting { name, .. } => {
                AppError::with_message(ErrorCode::InvalidEngineSetting, message)
                    .with_detail("setting", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_app_error_codes() {
        let err: AppError = EngineError::InvalidWindow {
            start: "2024-05-10".into(),
            end: "2024-05-01".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
        assert_eq!(err.message, "Start date 2024-05-10 is after end date 2024-05-01");

        let err: AppError = EngineError::InvalidDate {
            field: "startDate",
            value: "yesterday-ish".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidDate);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "startDate");
    }
}
