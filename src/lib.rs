//! # Antar Bulk Upload
//!
//! Bulk CSV order ingestion for a delivery-management application.
//!
//! ## Features
//!
//! - **File Acquisition**: size and extension screening, a single read with a
//!   lazy progress stream
//! - **CSV Parse & Validate**: header check, per-row required-field check,
//!   every bad row reported with its line number
//! - **All-or-nothing batches**: one bad row fails the batch; valid rows stay
//!   visible in the preview but are never forwarded
//! - **Session tokens**: a new upload supersedes the in-flight one, late
//!   completions are discarded
//! - **Injected collaborators**: notification surface and route planner are
//!   traits handed to the orchestrator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bulk_upload::prelude::*;
//! use std::sync::Arc;
//!
//! let bus = NotificationBus::default();
//! let orchestrator = UploadOrchestrator::new(
//!     UploadConfig::page_defaults(),
//!     Arc::new(bus.clone()),
//!     Arc::new(PendingRoutePlanner),
//! );
//!
//! let source = PathSource::open("orders.csv").await?;
//! let preview = orchestrator
//!     .handle_file(&source, |progress| println!("{}%", progress))
//!     .await?;
//!
//! if preview.can_confirm() {
//!     orchestrator.confirm().await?;
//! }
//! ```

pub mod acquisition;
pub mod config;
pub mod core;
pub mod ingest;
pub mod logging;
pub mod orchestrator;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Notification, NotificationBus, NotificationEnvelope, NotificationVariant, Notifier, Order,
        PendingRoutePlanner, RejectReason, RequiredField, RoutePlanner, RowValidationError,
        TracingNotifier, UploadError,
    };

    // === Pipeline ===
    pub use crate::acquisition::{
        AcquisitionEvent, AcquisitionStream, FileSource, MemorySource, PathSource, acquire,
        acquire_text, screen,
    };
    pub use crate::ingest::{BatchPolicy, ParsedBatch, ProcessingMetrics, parse_and_validate};
    pub use crate::orchestrator::{
        Preview, PreviewFailure, SessionId, SessionState, UploadOrchestrator,
    };

    // === Config ===
    pub use crate::config::{AcquisitionConfig, UploadConfig, ValidationConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
}
