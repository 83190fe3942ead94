//! Per-batch processing metrics

use serde::Serialize;
use std::time::Duration;

/// Counters for one parse pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProcessingMetrics {
    pub total_records: usize,
    pub valid_records: usize,
    pub invalid_records: usize,
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
}

impl ProcessingMetrics {
    pub fn new(valid_records: usize, invalid_records: usize, processing_time: Duration) -> Self {
        Self {
            total_records: valid_records + invalid_records,
            valid_records,
            invalid_records,
            processing_time,
        }
    }

    pub fn log(&self) {
        tracing::info!(
            total_records = self.total_records,
            valid_records = self.valid_records,
            invalid_records = self.invalid_records,
            processing_time_ms = self.processing_time.as_millis() as u64,
            "CSV processing completed"
        );
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
