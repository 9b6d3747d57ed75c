//! ffmpeg-backed [`ProbeClient`] and [`SegmentWriter`].
//!
//! Probing runs `ffmpeg -i <input>` and reads the `Duration:` line from
//! stderr. ffmpeg exits non-zero in that mode because no output is given, so
//! the exit status is ignored and only the text matters.
//!
//! Extraction runs `ffmpeg -y -i <input> -ss <start> -t <duration> -c copy
//! <output>`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vidsplit_core::{Chunk, Error, Result};

use crate::probe::{parse_probe_output, ProbeClient};
use crate::segment::SegmentWriter;
use crate::tools::{ToolConfig, ToolRegistry, FFMPEG};

/// Lines of ffmpeg stderr kept in a split error.
const STDERR_TAIL_LINES: usize = 5;

/// The ffmpeg CLI as probe and segment writer.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    ffmpeg: ToolConfig,
}

impl FfmpegTool {
    pub fn new(ffmpeg: ToolConfig) -> Self {
        Self { ffmpeg }
    }

    /// Use an explicit executable with no timeout.
    pub fn from_path(path: PathBuf) -> Self {
        Self::new(ToolConfig {
            name: FFMPEG.to_string(),
            path,
            timeout: None,
        })
    }

    /// Use the ffmpeg resolved by `registry`.
    pub fn from_registry(registry: &ToolRegistry) -> Result<Self> {
        Ok(Self::new(registry.require(FFMPEG)?.clone()))
    }
}

/// Arguments for a stream-copy extraction of `chunk` from `source`.
pub fn extract_args(source: &Path, chunk: &Chunk) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        source.into(),
        "-ss".into(),
        chunk.start_secs.to_string().into(),
        "-t".into(),
        chunk.duration_secs.to_string().into(),
        "-c".into(),
        "copy".into(),
        chunk.output_path.clone().into(),
    ]
}

#[async_trait]
impl ProbeClient for FfmpegTool {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn probe_duration(&self, path: &Path) -> Result<u64> {
        let mut cmd = self.ffmpeg.command();
        cmd.arg("-i").arg(path);

        let output = cmd
            .output()
            .await
            .map_err(|e| Error::probe(path, e.to_string()))?;

        let seconds = parse_probe_output(path, &output.stderr)?;
        tracing::debug!("Probed {}: {seconds}s", path.display());
        Ok(seconds)
    }
}

#[async_trait]
impl SegmentWriter for FfmpegTool {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn write_segment(&self, source: &Path, chunk: &Chunk) -> Result<()> {
        let mut cmd = self.ffmpeg.command();
        cmd.args(extract_args(source, chunk));

        let output = cmd.output().await?;
        if !output.status.success() {
            return Err(Error::split(
                chunk.index,
                &chunk.output_path,
                format!(
                    "ffmpeg exited with status {}: {}",
                    output.status,
                    output.stderr_tail(STDERR_TAIL_LINES)
                ),
            ));
        }
        Ok(())
    }
}
