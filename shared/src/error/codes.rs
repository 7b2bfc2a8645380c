//! Unified error codes for the Pulse workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Report / import errors
//! - 5xxx: Analytics errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Report / Import ====================
    /// Report not found
    ReportNotFound = 4001,
    /// Uploaded file could not be imported
    ImportFailed = 4002,
    /// Uploaded file type is not supported
    UnsupportedFileFormat = 4003,
    /// Uploaded file is empty
    EmptyFile = 4004,
    /// No column of the sheet maps to an order field
    NoRecognizedColumns = 4005,
    /// Uploaded file exceeds the configured size limit
    FileTooLarge = 4006,

    // ==================== 5xxx: Analytics ====================
    /// Date could not be parsed
    InvalidDate = 5001,
    /// Start date after end date, or a bounded window was required
    InvalidDateRange = 5002,
    /// Engine setting outside its valid range
    InvalidEngineSetting = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Report / Import
            ErrorCode::ReportNotFound => "Report not found",
            ErrorCode::ImportFailed => "Report import failed",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::EmptyFile => "Uploaded file is empty",
            ErrorCode::NoRecognizedColumns => "No recognizable order columns found",
            ErrorCode::FileTooLarge => "Uploaded file is too large",

            // Analytics
            ErrorCode::InvalidDate => "Invalid date",
            ErrorCode::InvalidDateRange => "Invalid date range",
            ErrorCode::InvalidEngineSetting => "Invalid analytics setting",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Report / Import
            4001 => Ok(ErrorCode::ReportNotFound),
            4002 => Ok(ErrorCode::ImportFailed),
            4003 => Ok(ErrorCode::UnsupportedFileFormat),
            4004 => Ok(ErrorCode::EmptyFile),
            4005 => Ok(ErrorCode::NoRecognizedColumns),
            4006 => Ok(ErrorCode::FileTooLarge),

            // Analytics
            5001 => Ok(ErrorCode::InvalidDate),
            5002 => Ok(ErrorCode::InvalidDateRange),
            5003 => Ok(ErrorCode::InvalidEngineSetting),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
