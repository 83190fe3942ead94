//! Upload session lifecycle
//!
//! `Idle → Processing → Previewing`, or `Processing → Failed`. A new upload may
//! start from any state; nothing is retained from a failed cycle.

use crate::core::{Order, RowValidationError, UploadError};
use serde::Serialize;
use std::fmt;

/// Monotonic tag identifying one acquire → parse → preview cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Batch-level failure shown alongside the preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewFailure {
    pub code: &'static str,
    pub message: String,
}

impl From<&UploadError> for PreviewFailure {
    fn from(err: &UploadError) -> Self {
        Self {
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

/// What the preview surface displays for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub session: SessionId,
    /// Rows that validated, shown even when the batch failed
    pub orders: Vec<Order>,
    pub row_errors: Vec<RowValidationError>,
    pub failure: Option<PreviewFailure>,
}

impl Preview {
    /// Only a fully valid, non-empty batch may be forwarded
    pub fn can_confirm(&self) -> bool {
        self.failure.is_none() && !self.orders.is_empty()
    }

    /// Error lines in display order: the batch failure, then each row error
    pub fn messages(&self) -> Vec<String> {
        self.failure
            .iter()
            .map(|f| f.message.clone())
            .chain(self.row_errors.iter().map(ToString::to_string))
            .collect()
    }
}

/// State owned by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No file yet
    #[default]
    Idle,

    /// File being read
    Processing { session: SessionId },

    /// Text parsed and shown, possibly with errors
    Previewing(Preview),

    /// Read failure; the preview never appears
    Failed { session: SessionId, message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Processing { .. } => "processing",
            SessionState::Previewing(_) => "previewing",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn session(&self) -> Option<SessionId> {
        match self {
            SessionState::Idle => None,
            SessionState::Processing { session } | SessionState::Failed { session, .. } => {
                Some(*session)
            }
            SessionState::Previewing(preview) => Some(preview.session),
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        match self {
            SessionState::Previewing(preview) => Some(preview),
            _ => None,
        }
    }
}
