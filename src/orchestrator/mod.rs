//! Upload orchestrator
//!
//! Owns the session state and wires the pipeline together:
//!
//! ```text
//! FileSource ──screen──▶ acquire (progress…) ──text──▶ parse_and_validate ──▶ Preview
//!                                                                                │
//!                                                           confirm() ──orders──▶ RoutePlanner
//! ```
//!
//! Every cycle is tagged with a [`SessionId`]. Starting a new upload supersedes
//! the in-flight one; a completion that arrives for a superseded session is
//! discarded and leaves the state untouched.
//!
//! Collaborators (notification surface, route planner) are injected at
//! construction.

pub mod state;

pub use state::{Preview, PreviewFailure, SessionId, SessionState};

use crate::acquisition::{self, AcquisitionEvent, FileSource};
use crate::config::UploadConfig;
use crate::core::{Notification, Notifier, RoutePlanner, UploadError};
use crate::ingest;
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

const READ_FAILURE_MESSAGE: &str = "Failed to read the uploaded file";

pub struct UploadOrchestrator {
    config: UploadConfig,
    notifier: Arc<dyn Notifier>,
    planner: Arc<dyn RoutePlanner>,
    current: AtomicU64,
    state: RwLock<SessionState>,
}

impl UploadOrchestrator {
    pub fn new(
        config: UploadConfig,
        notifier: Arc<dyn Notifier>,
        planner: Arc<dyn RoutePlanner>,
    ) -> Self {
        Self {
            config,
            notifier,
            planner,
            current: AtomicU64::new(0),
            state: RwLock::new(SessionState::Idle),
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Snapshot of the current state
    pub fn state(&self) -> Result<SessionState, UploadError> {
        let state = self
            .state
            .read()
            .map_err(|e| UploadError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(state.clone())
    }

    /// Screen `source` and open a new session in `Processing`
    ///
    /// A rejected file does not open a session and leaves the state as is.
    pub fn begin<S>(&self, source: &S) -> Result<SessionId, UploadError>
    where
        S: FileSource + ?Sized,
    {
        if let Err(err) = acquisition::screen(source, &self.config.acquisition) {
            tracing::warn!(file = %source.name(), error = %err, "File rejected");
            return Err(err);
        }

        let mut state = self.write_state()?;
        let session = SessionId(self.current.fetch_add(1, Ordering::SeqCst) + 1);

        if let SessionState::Processing { session: previous } = &*state {
            tracing::info!(%previous, %session, "Superseding in-flight upload");
        }
        *state = SessionState::Processing { session };

        tracing::info!(%session, file = %source.name(), size = source.size(), "Upload started");
        Ok(session)
    }

    /// Run a full cycle for `source`, forwarding progress to `on_progress`
    ///
    /// Returns the preview (which may carry parse or validation failures).
    /// Read failures, rejections and superseded sessions are errors.
    pub async fn handle_file<S, F>(&self, source: &S, mut on_progress: F) -> Result<Preview, UploadError>
    where
        S: FileSource + ?Sized,
        F: FnMut(u8) + Send,
    {
        let session = self.begin(source)?;

        let mut events = acquisition::acquire(source, &self.config.acquisition);
        let mut outcome = None;
        while let Some(event) = events.next().await {
            match event {
                AcquisitionEvent::Progress(value) => on_progress(value),
                AcquisitionEvent::Completed(text) => outcome = Some(Ok(text)),
                AcquisitionEvent::Failed(err) => outcome = Some(Err(err)),
            }
        }

        let outcome = outcome.unwrap_or_else(|| {
            Err(UploadError::Internal(
                "acquisition stream ended without a result".to_string(),
            ))
        });
        self.complete_acquisition(session, outcome).await
    }

    /// Feed the result of the read for `session` into the pipeline
    pub async fn complete_acquisition(
        &self,
        session: SessionId,
        result: Result<String, UploadError>,
    ) -> Result<Preview, UploadError> {
        match result {
            Err(err) => {
                self.transition(
                    session,
                    SessionState::Failed {
                        session,
                        message: err.to_string(),
                    },
                )?;
                tracing::error!(%session, error = %err, "Error reading file");
                self.notify(Notification::destructive("Error", READ_FAILURE_MESSAGE))
                    .await;
                Err(err)
            }
            Ok(text) => {
                tracing::debug!(%session, length = text.len(), "File content received");
                self.ensure_current(session)?;
                let preview = self.build_preview(session, &text);
                self.transition(session, SessionState::Previewing(preview.clone()))?;

                if let Some(failure) = &preview.failure {
                    self.notify(Notification::destructive(
                        "Processing Error",
                        failure.message.clone(),
                    ))
                    .await;
                } else {
                    tracing::info!(%session, orders = preview.orders.len(), "Orders ready for review");
                }
                Ok(preview)
            }
        }
    }

    /// Forward the previewed orders to the route planner
    ///
    /// Only a preview without failures and with at least one order can be
    /// confirmed. The state stays `Previewing`.
    pub async fn confirm(&self) -> Result<usize, UploadError> {
        let (session, orders) = {
            let state = self
                .state
                .read()
                .map_err(|e| UploadError::Internal(format!("Failed to acquire read lock: {}", e)))?;
            match &*state {
                SessionState::Previewing(preview) if preview.can_confirm() => {
                    (preview.session, preview.orders.clone())
                }
                _ => return Err(UploadError::NothingToConfirm),
            }
        };

        let count = orders.len();
        self.notify(Notification::info(
            "Processing Orders",
            format!("Processing {} orders for route optimization...", count),
        ))
        .await;

        if let Err(err) = self.planner.plan_routes(orders).await {
            tracing::error!(%session, error = %err, "Route planner rejected orders");
            self.notify(Notification::destructive(
                "Route Planning Error",
                err.to_string(),
            ))
            .await;
            return Err(UploadError::Planner(err));
        }

        tracing::info!(%session, orders = count, "Orders forwarded to route planning");
        self.notify(Notification::info(
            "Success",
            format!("Successfully processed {} orders", count),
        ))
        .await;
        Ok(count)
    }

    /// Return to `Idle`, invalidating any in-flight session
    pub fn reset(&self) -> Result<(), UploadError> {
        let mut state = self.write_state()?;
        self.current.fetch_add(1, Ordering::SeqCst);
        *state = SessionState::Idle;
        Ok(())
    }

    fn build_preview(&self, session: SessionId, text: &str) -> Preview {
        match ingest::parse_and_validate(text, &self.config.validation) {
            Ok(batch) => {
                let failure = batch.failure().as_ref().map(PreviewFailure::from);
                Preview {
                    session,
                    orders: batch.orders,
                    row_errors: batch.row_errors,
                    failure,
                }
            }
            Err(err) => Preview {
                session,
                orders: Vec::new(),
                row_errors: Vec::new(),
                failure: Some(PreviewFailure::from(&err)),
            },
        }
    }

    fn ensure_current(&self, session: SessionId) -> Result<(), UploadError> {
        let current = self.current.load(Ordering::SeqCst);
        if session.0 != current {
            tracing::debug!(%session, current, "Discarding completion of superseded session");
            return Err(UploadError::SessionSuperseded {
                session: session.0,
                current,
            });
        }
        Ok(())
    }

    /// Replace the state if `session` is still the current one
    fn transition(&self, session: SessionId, next: SessionState) -> Result<(), UploadError> {
        let mut state = self.write_state()?;
        self.ensure_current(session)?;

        tracing::debug!(%session, from = state.name(), to = next.name(), "Session transition");
        *state = next;
        Ok(())
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, SessionState>, UploadError> {
        self.state
            .write()
            .map_err(|e| UploadError::Internal(format!("Failed to acquire write lock: {}", e)))
    }

    async fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.notify(notification).await {
            tracing::warn!(error = %err, "Notifier failed");
        }
    }
}
