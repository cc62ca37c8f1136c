//! Progress of a single encrypt or decrypt run.
//!
//! Everything here is a pure function of the stored counters; ratios and ETA
//! are recomputed on every read and never cached.

use std::fmt::{Display, Formatter, Result};
use std::time::Duration;

/// Lifecycle of a run as seen by observers.
///
/// `Ready` before the first run, `Processing` while one is in flight, and one
/// of `Success`, `Error` or `Cancelled` once it ends. `Paused` is reserved;
/// no transition produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessingStatus {
    #[default]
    Ready,
    Processing,
    Success,
    Error,
    Paused,
    Cancelled,
}

impl ProcessingStatus {
    #[inline]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Processing => "Processing",
            Self::Success => "Success",
            Self::Error => "Error",
            Self::Paused => "Paused",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Ready => "System ready for operations",
            Self::Processing => "Operation in progress",
            Self::Success => "Operation completed successfully",
            Self::Error => "Operation failed",
            Self::Paused => "Operation paused",
            Self::Cancelled => "Operation cancelled",
        }
    }

    /// Whether this status ends a run.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Cancelled)
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.display_name())
    }
}

/// Estimated time remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    /// Nothing processed yet, or no time elapsed.
    Calculating,
    Remaining(Duration),
}

impl Display for Eta {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::Calculating => f.write_str("Calculating..."),
            Self::Remaining(remaining) => {
                let secs = remaining.as_secs();
                match secs {
                    0..60 => write!(f, "{secs}s remaining"),
                    60..3600 => write!(f, "{}m remaining", secs / 60),
                    _ => write!(f, "{}h remaining", secs / 3600),
                }
            }
        }
    }
}

/// `processed / total`, or `0` when `total` is zero.
#[inline]
pub fn byte_ratio(processed: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { processed as f64 / total as f64 }
}

/// `current / total`, or `0` when `total` is zero.
#[inline]
pub fn chunk_ratio(current: u64, total: u64) -> f64 {
    if total == 0 { 0.0 } else { current as f64 / total as f64 }
}

/// Projects the remaining time from the average rate so far.
pub fn eta(processed: u64, total: u64, elapsed: Duration) -> Eta {
    let elapsed_ms = elapsed.as_millis();
    if processed == 0 || elapsed_ms == 0 {
        return Eta::Calculating;
    }

    let bytes_per_sec = processed as f64 * 1000.0 / elapsed_ms as f64;
    let remaining = total.saturating_sub(processed) as f64 / bytes_per_sec;

    // Truncated to whole seconds.
    Eta::Remaining(Duration::from_secs(remaining as u64))
}

/// Snapshot of a run's progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessingProgress {
    pub current_chunk: u64,
    pub total_chunks: u64,
    pub bytes_processed: u64,
    pub total_bytes: u64,
    pub elapsed: Duration,
    pub status: ProcessingStatus,
    /// What the run is doing right now, or why it failed.
    pub current_operation: Option<String>,
}

impl ProcessingProgress {
    /// A fresh `Processing` snapshot for a run over `total_bytes`.
    pub fn started(total_bytes: u64, operation: impl Into<String>) -> Self {
        Self { total_chunks: 1, total_bytes, status: ProcessingStatus::Processing, current_operation: Some(operation.into()), ..Self::default() }
    }

    #[inline]
    pub fn byte_ratio(&self) -> f64 {
        byte_ratio(self.bytes_processed, self.total_bytes)
    }

    #[inline]
    pub fn chunk_ratio(&self) -> f64 {
        chunk_ratio(self.current_chunk, self.total_chunks)
    }

    #[inline]
    pub fn eta(&self) -> Eta {
        eta(self.bytes_processed, self.total_bytes, self.elapsed)
    }

    /// Renders as `<pct>% (<current>/<total> chunks)`, percentage by bytes.
    pub fn formatted_progress(&self) -> String {
        format!("{:.1}% ({}/{} chunks)", self.byte_ratio() * 100.0, self.current_chunk, self.total_chunks)
    }
}
