//! Typed error handling for the bulk upload pipeline
//!
//! Every stage of the pipeline reports failures through [`UploadError`], so the
//! orchestrator can decide which ones abort the cycle and which ones still let
//! the preview surface appear.
//!
//! # Error Categories
//!
//! - Acquisition: [`UploadError::Rejected`], [`UploadError::Read`]
//! - Parsing: [`UploadError::Parse`], [`UploadError::EmptyData`],
//!   [`UploadError::MissingHeaders`], [`UploadError::TooManyRows`]
//! - Row validation: [`UploadError::Validation`], carrying every
//!   [`RowValidationError`] found in the batch
//! - Session handling: [`UploadError::SessionSuperseded`],
//!   [`UploadError::NothingToConfirm`], [`UploadError::Planner`]
//!
//! # Example
//!
//! ```rust,ignore
//! match parse_and_validate(&text, &config)?.into_result() {
//!     Ok(orders) => println!("{} orders", orders.len()),
//!     Err(UploadError::Validation { errors }) => {
//!         for error in errors {
//!             eprintln!("{}", error);
//!         }
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use crate::core::order::RequiredField;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a candidate file was turned away before acquisition started
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// File is larger than the configured limit
    TooLarge { size: u64, max_size: u64 },

    /// File name does not end with an accepted extension
    Extension { allowed: Vec<String> },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::TooLarge { size, max_size } => {
                write!(f, "file is {} bytes, limit is {} bytes", size, max_size)
            }
            RejectReason::Extension { allowed } => {
                write!(f, "expected one of: {}", allowed.join(", "))
            }
        }
    }
}

/// A data row with at least one empty required value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowValidationError {
    /// 1-based line number in the uploaded file (header is line 1)
    pub line: usize,

    /// Required fields that were empty, in canonical order
    pub missing: Vec<RequiredField>,
}

impl RowValidationError {
    /// Build the error for the data row at `index` (zero-based, header excluded)
    pub fn for_row(index: usize, missing: Vec<RequiredField>) -> Self {
        Self {
            line: index + 2,
            missing,
        }
    }
}

impl fmt::Display for RowValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: Missing required fields: {}",
            self.line,
            RequiredField::join(&self.missing)
        )
    }
}

impl std::error::Error for RowValidationError {}

/// The main error type of the upload pipeline
#[derive(Debug, Error)]
pub enum UploadError {
    /// The drop surface refused the file (size or extension)
    #[error("File '{name}' was rejected: {reason}")]
    Rejected { name: String, reason: RejectReason },

    /// The file could not be read or decoded as text
    #[error("Failed to read '{name}': {message}")]
    Read { name: String, message: String },

    /// Malformed CSV structure
    #[error("CSV parsing errors detected: {message}")]
    Parse { message: String },

    /// The file parsed but held no data rows
    #[error("No data could be parsed from the CSV file")]
    EmptyData,

    /// One or more required header names are absent
    #[error("Missing required headers: {}", RequiredField::join(.missing))]
    MissingHeaders { missing: Vec<RequiredField> },

    /// More data rows than the configured limit
    #[error("CSV contains {found} rows, the limit is {limit}")]
    TooManyRows { limit: usize, found: usize },

    /// At least one row failed the required-field check
    #[error("Found {} validation errors", .errors.len())]
    Validation { errors: Vec<RowValidationError> },

    /// A completion arrived for a session that is no longer current
    #[error("Session {session} was superseded by session {current}")]
    SessionSuperseded { session: u64, current: u64 },

    /// Confirmation requested without a valid preview
    #[error("There are no validated orders to confirm")]
    NothingToConfirm,

    /// The route planner refused the orders
    #[error("Route planning failed: {0}")]
    Planner(anyhow::Error),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal failures (poisoned locks and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Rejected { .. } => "FILE_REJECTED",
            UploadError::Read { .. } => "READ_ERROR",
            UploadError::Parse { .. } => "PARSE_ERROR",
            UploadError::EmptyData => "EMPTY_DATA",
            UploadError::MissingHeaders { .. } => "MISSING_HEADERS",
            UploadError::TooManyRows { .. } => "TOO_MANY_ROWS",
            UploadError::Validation { .. } => "VALIDATION_ERROR",
            UploadError::SessionSuperseded { .. } => "SESSION_SUPERSEDED",
            UploadError::NothingToConfirm => "NOTHING_TO_CONFIRM",
            UploadError::Planner(_) => "PLANNER_ERROR",
            UploadError::Config(_) => "CONFIG_ERROR",
            UploadError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error still lets the preview surface appear
    ///
    /// Only read failures (and failures outside a parse pass) suppress it.
    pub fn shows_preview(&self) -> bool {
        matches!(
            self,
            UploadError::Parse { .. }
                | UploadError::EmptyData
                | UploadError::MissingHeaders { .. }
                | UploadError::TooManyRows { .. }
                | UploadError::Validation { .. }
        )
    }

    /// Row-level errors carried by a [`UploadError::Validation`]
    pub fn row_errors(&self) -> &[RowValidationError] {
        match self {
            UploadError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<csv::Error> for UploadError {
    fn from(err: csv::Error) -> Self {
        UploadError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for UploadError {
    fn from(err: serde_yaml::Error) -> Self {
        UploadError::Config(err.to_string())
    }
}
