//! JSON output for scripted use
//!
//! When --json-progress is enabled, all progress and status information
//! is emitted as JSON lines to stdout, suppressing all other output.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::image_processing::{BatchSummary, GifOutcome};

/// Last progress emission timestamp (milliseconds since epoch)
/// Used for throttling progress updates to ~25 FPS (40ms between updates)
static LAST_PROGRESS_MS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Frame loading progress within one sequence
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// GIF written (or planned, in dry-run mode)
    SequenceCompleted {
        input_dir: String,
        output_file: String,
        frames: usize,
        skipped_files: Vec<String>,
        written: bool,
        processing_time_ms: u128,
    },
    /// GIF could not be produced
    SequenceFailed { input_dir: String, error: String },
    /// Batch totals
    Summary {
        discovered: usize,
        converted: usize,
        skipped: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Create and emit progress message (throttled to ~25 FPS)
    ///
    /// The final progress (current == total) is always emitted.
    pub fn progress(current: usize, total: usize, message: impl Into<String>) {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let last_ms = LAST_PROGRESS_MS.load(Ordering::Relaxed);

        if now_ms.saturating_sub(last_ms) >= 40 || current == total {
            LAST_PROGRESS_MS.store(now_ms, Ordering::Relaxed);
            Self::Progress {
                current,
                total,
                message: message.into(),
            }
            .emit();
        }
    }

    pub fn from_outcome(outcome: &GifOutcome) -> Self {
        Self::SequenceCompleted {
            input_dir: outcome.input_dir.display().to_string(),
            output_file: outcome.output_path.display().to_string(),
            frames: outcome.frame_count,
            skipped_files: outcome
                .skipped_files
                .iter()
                .map(|(path, _)| path.display().to_string())
                .collect(),
            written: outcome.written,
            processing_time_ms: outcome.processing_time.as_millis(),
        }
    }

    pub fn sequence_completed(outcome: &GifOutcome) {
        Self::from_outcome(outcome).emit();
    }

    pub fn sequence_failed(input_dir: &Path, error: impl Into<String>) {
        Self::SequenceFailed {
            input_dir: input_dir.display().to_string(),
            error: error.into(),
        }
        .emit();
    }

    pub fn summary(summary: &BatchSummary) {
        Self::Summary {
            discovered: summary.discovered,
            converted: summary.converted,
            skipped: summary.skipped,
            failed: summary.failed,
            duration_secs: summary.total_time.as_secs_f64(),
        }
        .emit();
    }
}
