//! File acquisition
//!
//! A candidate file is first screened against the size and extension limits
//! (what a drop surface does before handing the file over), then read exactly
//! once. While the read is in flight, [`acquire`] yields a simulated progress
//! ramp: it starts at 0, climbs by `progress_step` every `progress_interval`,
//! stalls at `progress_cap`, and snaps to 100 once the text is available.
//!
//! ```text
//! Progress(0) → Progress(10) → … → Progress(90) → Progress(100) → Completed(text)
//!                                              └──────────────→ Failed(ReadError)
//! ```

pub mod source;

pub use source::{FileSource, MemorySource, PathSource};

use crate::config::AcquisitionConfig;
use crate::core::{RejectReason, UploadError};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// One item of the acquisition stream
#[derive(Debug)]
pub enum AcquisitionEvent {
    /// Progress percentage, never decreasing
    Progress(u8),
    /// The decoded file content; last item on success
    Completed(String),
    /// Read or decoding failure; last item on failure
    Failed(UploadError),
}

/// Lazy, finite sequence of acquisition events
pub type AcquisitionStream<'a> = BoxStream<'a, AcquisitionEvent>;

/// Check a candidate against the drop-surface limits
pub fn screen<S>(source: &S, config: &AcquisitionConfig) -> Result<(), UploadError>
where
    S: FileSource + ?Sized,
{
    if source.size() > config.max_size_bytes {
        return Err(UploadError::Rejected {
            name: source.name().to_string(),
            reason: RejectReason::TooLarge {
                size: source.size(),
                max_size: config.max_size_bytes,
            },
        });
    }

    if !config.accepts_extension(source.name()) {
        return Err(UploadError::Rejected {
            name: source.name().to_string(),
            reason: RejectReason::Extension {
                allowed: config.allowed_extensions.clone(),
            },
        });
    }

    Ok(())
}

/// Read `source` as text, reporting progress along the way
///
/// The stream does not re-check the limits; call [`screen`] first.
pub fn acquire<'a, S>(source: &'a S, config: &AcquisitionConfig) -> AcquisitionStream<'a>
where
    S: FileSource + ?Sized,
{
    let state = Ramp {
        read: Some(read_text(source).boxed()),
        ticker: None,
        period: config.progress_interval(),
        progress: 0,
        step: config.effective_progress_step(),
        cap: config.effective_progress_cap(),
        started: false,
        pending: None,
    };

    stream::unfold(state, Ramp::next).boxed()
}

/// Screen, then drive [`acquire`] to completion, discarding progress
pub async fn acquire_text<S>(source: &S, config: &AcquisitionConfig) -> Result<String, UploadError>
where
    S: FileSource + ?Sized,
{
    screen(source, config)?;

    let mut events = acquire(source, config);
    while let Some(event) = events.next().await {
        match event {
            AcquisitionEvent::Progress(_) => {}
            AcquisitionEvent::Completed(text) => return Ok(text),
            AcquisitionEvent::Failed(err) => return Err(err),
        }
    }

    Err(UploadError::Internal(
        "acquisition stream ended without a result".to_string(),
    ))
}

async fn read_text<S>(source: &S) -> Result<String, UploadError>
where
    S: FileSource + ?Sized,
{
    let name = source.name().to_string();
    tracing::debug!(file = %name, size = source.size(), "Reading file");

    let bytes = source.read_bytes().await.map_err(|e| UploadError::Read {
        name: name.clone(),
        message: e.to_string(),
    })?;

    decode(&name, bytes)
}

/// Decode UTF-8 content, dropping a leading byte order mark
pub(crate) fn decode(name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
    let text = String::from_utf8(bytes).map_err(|e| UploadError::Read {
        name: name.to_string(),
        message: format!("file is not valid UTF-8: {}", e.utf8_error()),
    })?;

    match text.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(text),
    }
}

struct Ramp<'a> {
    read: Option<BoxFuture<'a, Result<String, UploadError>>>,
    ticker: Option<Interval>,
    period: std::time::Duration,
    progress: u8,
    step: u8,
    cap: u8,
    started: bool,
    pending: Option<String>,
}

enum Tick {
    Elapsed,
    Done(Result<String, UploadError>),
}

impl<'a> Ramp<'a> {
    async fn next(mut self) -> Option<(AcquisitionEvent, Self)> {
        if !self.started {
            self.started = true;
            let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            self.ticker = Some(ticker);
            return Some((AcquisitionEvent::Progress(0), self));
        }

        if let Some(text) = self.pending.take() {
            return Some((AcquisitionEvent::Completed(text), self));
        }

        loop {
            let tick = {
                let read = self.read.as_mut()?;
                let ticker = self.ticker.as_mut()?;
                tokio::select! {
                    biased;
                    result = read => Tick::Done(result),
                    _ = ticker.tick() => Tick::Elapsed,
                }
            };

            match tick {
                Tick::Elapsed => {
                    if self.progress < self.cap {
                        self.progress = self.progress.saturating_add(self.step).min(self.cap);
                        return Some((AcquisitionEvent::Progress(self.progress), self));
                    }
                }
                Tick::Done(Ok(text)) => {
                    self.read = None;
                    self.progress = 100;
                    self.pending = Some(text);
                    return Some((AcquisitionEvent::Progress(100), self));
                }
                Tick::Done(Err(err)) => {
                    self.read = None;
                    tracing::warn!(error = %err, "File acquisition failed");
                    return Some((AcquisitionEvent::Failed(err), self));
                }
            }
        }
    }
}
