//! CSV parse and validate
//!
//! Turns the raw text of an uploaded file into [`Order`] records. One pass:
//!
//! 1. parse comma-separated, double-quoted records with a mandatory header row,
//!    trimming header names and values;
//! 2. fail on an empty batch;
//! 3. fail once, before any row is looked at, if a required header is absent;
//! 4. check every row for empty required values, collecting one
//!    [`RowValidationError`] per bad row without stopping.
//!
//! The pass holds no state between calls; feeding the same text twice gives
//! the same orders and the same errors.

pub mod metrics;

pub use metrics::ProcessingMetrics;

use crate::config::ValidationConfig;
use crate::core::order::OrderRow;
use crate::core::{Order, RequiredField, RowValidationError, UploadError};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashSet;
use std::time::Instant;

/// How row errors affect the rows that did validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Any bad row fails the whole batch; valid rows are shown but never
    /// forwarded
    #[default]
    AllOrNothing,
}

impl BatchPolicy {
    pub fn apply(
        &self,
        orders: Vec<Order>,
        row_errors: Vec<RowValidationError>,
    ) -> Result<Vec<Order>, UploadError> {
        match self {
            BatchPolicy::AllOrNothing if row_errors.is_empty() => Ok(orders),
            BatchPolicy::AllOrNothing => Err(UploadError::Validation { errors: row_errors }),
        }
    }
}

/// Result of one parse pass over a structurally valid file
#[derive(Debug, Clone)]
pub struct ParsedBatch {
    /// Rows that passed the required-field check, in file order
    pub orders: Vec<Order>,
    /// One entry per row that failed the required-field check
    pub row_errors: Vec<RowValidationError>,
    pub metrics: ProcessingMetrics,
}

impl ParsedBatch {
    pub fn is_valid(&self) -> bool {
        self.row_errors.is_empty()
    }

    /// Batch-level error under the all-or-nothing policy, if any
    pub fn failure(&self) -> Option<UploadError> {
        if self.is_valid() {
            None
        } else {
            Some(UploadError::Validation {
                errors: self.row_errors.clone(),
            })
        }
    }

    /// Apply [`BatchPolicy::AllOrNothing`]
    pub fn into_result(self) -> Result<Vec<Order>, UploadError> {
        BatchPolicy::AllOrNothing.apply(self.orders, self.row_errors)
    }
}

/// Parse `text` and validate every row
///
/// Structural problems (malformed CSV, no rows, missing headers, too many
/// rows) fail the call. Row-level problems are reported in the returned
/// [`ParsedBatch`].
pub fn parse_and_validate(
    text: &str,
    config: &ValidationConfig,
) -> Result<ParsedBatch, UploadError> {
    let started = Instant::now();

    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<StringRecord>, csv::Error>>()
        .map_err(|e| {
            tracing::warn!(error = %e, "CSV parse error");
            UploadError::from(e)
        })?;

    if records.is_empty() {
        tracing::warn!("No data parsed from CSV");
        return Err(UploadError::EmptyData);
    }

    check_headers(&headers)?;

    if let Some(limit) = config.max_rows {
        if records.len() > limit {
            return Err(UploadError::TooManyRows {
                limit,
                found: records.len(),
            });
        }
    }

    let mut orders = Vec::with_capacity(records.len());
    let mut row_errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let row: OrderRow = record.deserialize(Some(&headers))?;
        let missing = row.missing_fields();

        if missing.is_empty() {
            orders.push(Order::from(row));
        } else {
            let error = RowValidationError::for_row(index, missing);
            tracing::debug!(line = error.line, "{}", error);
            row_errors.push(error);
        }
    }

    let metrics = ProcessingMetrics::new(orders.len(), row_errors.len(), started.elapsed());
    metrics.log();

    Ok(ParsedBatch {
        orders,
        row_errors,
        metrics,
    })
}

fn check_headers(headers: &StringRecord) -> Result<(), UploadError> {
    let present: HashSet<&str> = headers.iter().collect();
    tracing::debug!(headers = ?present, "Detected headers");

    let missing: Vec<RequiredField> = RequiredField::ALL
        .into_iter()
        .filter(|field| !present.contains(field.header()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        tracing::warn!(missing = %RequiredField::join(&missing), "Missing required headers");
        Err(UploadError::MissingHeaders { missing })
    }
}
