//! Size-bounded splitting: gate, probe, plan, extract, verify.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use vidsplit_core::config::{SizePolicy, SplitConfig};
use vidsplit_core::{plan, should_split, Chunk, Error, MediaFile, Result, SplitPlan};

use crate::ffmpeg::FfmpegTool;
use crate::probe::ProbeClient;
use crate::segment::{extract_chunks, SegmentWriter};

/// Settings for one [`Splitter`].
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub max_size_bytes: u64,
    pub safety_margin: f64,
    pub jobs: usize,
    pub size_policy: SizePolicy,
    pub max_resplit_depth: u32,
}

impl From<&SplitConfig> for SplitOptions {
    fn from(config: &SplitConfig) -> Self {
        Self {
            max_size_bytes: config.max_size_bytes(),
            safety_margin: config.safety_margin,
            jobs: config.jobs,
            size_policy: config.size_policy,
            max_resplit_depth: config.max_resplit_depth,
        }
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::from(&SplitConfig::default())
    }
}

/// Splits media files into chunks no larger (on average) than
/// `max_size_bytes`.
///
/// The source file is never modified. Chunk files are written next to it and
/// handed to the caller; nothing is cleaned up on failure.
pub struct Splitter {
    probe: Arc<dyn ProbeClient>,
    writer: Arc<dyn SegmentWriter>,
    options: SplitOptions,
}

impl Splitter {
    pub fn new(
        probe: Arc<dyn ProbeClient>,
        writer: Arc<dyn SegmentWriter>,
        options: SplitOptions,
    ) -> Self {
        Self {
            probe,
            writer,
            options,
        }
    }

    /// A splitter that probes and extracts with the same ffmpeg.
    pub fn with_ffmpeg(ffmpeg: FfmpegTool, options: SplitOptions) -> Self {
        let ffmpeg = Arc::new(ffmpeg);
        Self::new(ffmpeg.clone(), ffmpeg, options)
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    /// Plan a split of `path` without writing anything.
    ///
    /// Returns `None` when the file is already within budget; in that case the
    /// file is not probed.
    pub async fn plan_for(&self, path: &Path) -> Result<Option<(SplitPlan, Vec<Chunk>)>> {
        let source = MediaFile::new(path);
        let size_bytes = source.size_bytes()?;

        if !should_split(size_bytes, self.options.max_size_bytes) {
            tracing::info!(
                "{} is {size_bytes} bytes, within the {} byte limit; not splitting",
                path.display(),
                self.options.max_size_bytes
            );
            return Ok(None);
        }

        let duration_secs = self.probe.probe_duration(path).await?;
        let split_plan = plan(
            size_bytes,
            self.options.max_size_bytes,
            duration_secs,
            self.options.safety_margin,
        )?;
        tracing::info!(
            "Splitting {} ({size_bytes} bytes, {duration_secs}s) into {} chunks of {}s",
            path.display(),
            split_plan.chunk_count,
            split_plan.chunk_duration_secs
        );

        let chunks = split_plan.chunks(&source);
        Ok(Some((split_plan, chunks)))
    }

    /// Split `path` and return the chunk paths in playback order.
    ///
    /// A file within budget comes back unchanged as the only element.
    ///
    /// # Errors
    ///
    /// - [`Error::Probe`] if the duration cannot be determined; nothing has
    ///   been written yet.
    /// - [`Error::Split`] if an extraction fails; earlier chunks stay on disk.
    /// - [`Error::SizeEstimateViolation`] under [`SizePolicy::Enforce`] when a
    ///   chunk is still too large after `max_resplit_depth` re-splits.
    pub async fn split(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let chunks = self.split_once(path).await?;
        if chunks.len() == 1 && chunks[0] == path {
            return Ok(chunks);
        }

        match self.options.size_policy {
            SizePolicy::Estimate => {
                self.warn_oversized(&chunks);
                Ok(chunks)
            }
            SizePolicy::Enforce => self.enforce(chunks).await,
        }
    }

    async fn split_once(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.plan_for(path).await? {
            None => Ok(vec![path.to_path_buf()]),
            Some((_, chunks)) => {
                extract_chunks(self.writer.as_ref(), path, &chunks, self.options.jobs).await
            }
        }
    }

    /// Log chunks over the limit. Only reports; never fails the split.
    fn warn_oversized(&self, chunks: &[PathBuf]) {
        for chunk in chunks {
            let size = match std::fs::metadata(chunk) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::warn!("Could not stat {}: {e}", chunk.display());
                    continue;
                }
            };
            if should_split(size, self.options.max_size_bytes) {
                tracing::warn!(
                    "{} is {size} bytes, over the {} byte limit (bitrate varies across the source)",
                    chunk.display(),
                    self.options.max_size_bytes
                );
            }
        }
    }

    /// Re-split every oversized chunk in place, depth first, keeping order.
    async fn enforce(&self, chunks: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        let mut pending: VecDeque<(PathBuf, u32)> = chunks.into_iter().map(|p| (p, 0)).collect();
        let mut done = Vec::with_capacity(pending.len());

        while let Some((chunk, depth)) = pending.pop_front() {
            let size_bytes = std::fs::metadata(&chunk)?.len();
            if !should_split(size_bytes, self.options.max_size_bytes) {
                done.push(chunk);
                continue;
            }
            if depth >= self.options.max_resplit_depth {
                return Err(Error::SizeEstimateViolation {
                    path: chunk,
                    size_bytes,
                    max_size_bytes: self.options.max_size_bytes,
                });
            }

            tracing::warn!(
                "{} is {size_bytes} bytes, over the {} byte limit; splitting again",
                chunk.display(),
                self.options.max_size_bytes
            );
            let parts = self.split_once(&chunk).await?;
            std::fs::remove_file(&chunk)?;
            for part in parts.into_iter().rev() {
                pending.push_front((part, depth + 1));
            }
        }

        Ok(done)
    }
}
