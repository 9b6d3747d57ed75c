//! Size gate, chunk planner, and cut-point scheduling.
//!
//! Everything here is pure: no tool is invoked and nothing touches the
//! filesystem. The plan is an estimate that assumes a roughly uniform
//! bitrate. A slice of `chunk_duration_secs` from a high-bitrate passage can
//! still exceed the limit even though the average slice does not.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::media::{Chunk, MediaFile, BYTES_PER_MB};

/// Extra chunks added to the size ratio so each slice targets less than the
/// hard limit.
pub const DEFAULT_SAFETY_MARGIN: f64 = 1.0;

/// Returns `true` when a file of `size_bytes` must be split to respect
/// `max_size_bytes`.
pub fn should_split(size_bytes: u64, max_size_bytes: u64) -> bool {
    size_bytes > max_size_bytes
}

/// Result of planning a split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlan {
    pub size_bytes: u64,
    pub max_size_bytes: u64,
    pub total_duration_secs: u64,
    /// `size_mb / max_mb + safety_margin`, before any rounding.
    pub estimated_chunks: f64,
    /// Length of every slice, ceiling-rounded.
    pub chunk_duration_secs: u64,
    /// Number of chunks the scheduler will emit.
    pub chunk_count: u64,
}

impl SplitPlan {
    /// Cut points for `source` under this plan.
    pub fn chunks(&self, source: &MediaFile) -> Vec<Chunk> {
        schedule(source, self.chunk_duration_secs, self.total_duration_secs)
    }
}

/// Compute the per-chunk duration for a file of `size_bytes` lasting
/// `duration_secs`.
///
/// # Errors
///
/// Returns [`Error::Validation`] if `max_size_bytes` or `duration_secs` is
/// zero, or if `safety_margin` is negative or not finite.
pub fn plan(
    size_bytes: u64,
    max_size_bytes: u64,
    duration_secs: u64,
    safety_margin: f64,
) -> Result<SplitPlan> {
    if max_size_bytes == 0 {
        return Err(Error::Validation("max size must be greater than zero".into()));
    }
    if duration_secs == 0 {
        return Err(Error::Validation("cannot plan a zero-length media file".into()));
    }
    if !safety_margin.is_finite() || safety_margin < 0.0 {
        return Err(Error::Validation(format!(
            "safety margin must be a non-negative number, got {safety_margin}"
        )));
    }

    let size_mb = size_bytes as f64 / BYTES_PER_MB as f64;
    let max_mb = max_size_bytes as f64 / BYTES_PER_MB as f64;
    let estimated_chunks = size_mb / max_mb + safety_margin;

    let chunk_duration_secs = if estimated_chunks > 0.0 {
        ((duration_secs as f64 / estimated_chunks).ceil() as u64).clamp(1, duration_secs)
    } else {
        duration_secs
    };
    let chunk_count = duration_secs.div_ceil(chunk_duration_secs);
    tracing::debug!(
        "plan: {size_mb:.2} MB / {max_mb:.2} MB + {safety_margin} = {estimated_chunks:.2} chunks, {chunk_duration_secs}s each"
    );

    Ok(SplitPlan {
        size_bytes,
        max_size_bytes,
        total_duration_secs: duration_secs,
        estimated_chunks,
        chunk_duration_secs,
        chunk_count,
    })
}

/// Walk `start` from zero in steps of `chunk_duration_secs` until it reaches
/// `total_duration_secs`, emitting one chunk per step.
///
/// A `chunk_duration_secs` of zero yields no chunks.
pub fn schedule(source: &MediaFile, chunk_duration_secs: u64, total_duration_secs: u64) -> Vec<Chunk> {
    if chunk_duration_secs == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start_secs = 0;
    let mut index = 1;
    while start_secs < total_duration_secs {
        chunks.push(Chunk {
            index,
            start_secs,
            duration_secs: chunk_duration_secs,
            output_path: source.chunk_path(index),
        });
        start_secs += chunk_duration_secs;
        index += 1;
    }
    chunks
}
