//! Fetch → split pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use vidsplit_av::{FfmpegTool, Fetcher, SplitOptions, Splitter, ToolRegistry, YtDlpFetcher};
use vidsplit_core::Result;

use crate::config::Config;

/// Downloads a video and splits the result.
///
/// Stops at the first failure. Whatever was written before the failure (the
/// download, earlier parts) stays on disk.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    splitter: Splitter,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, splitter: Splitter) -> Self {
        Self { fetcher, splitter }
    }

    /// Build a pipeline from configuration, resolving yt-dlp and ffmpeg.
    pub fn from_config(config: &Config, tools: &ToolRegistry) -> Result<Self> {
        let fetcher = YtDlpFetcher::from_registry(tools, &config.fetch)?;
        let splitter = splitter_from_config(config, tools)?;
        Ok(Self::new(Arc::new(fetcher), splitter))
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    /// Fetch `url` into `output_dir`, then split the downloaded file.
    pub async fn run(&self, url: &str, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let path = self.fetcher.fetch(url, output_dir).await?;
        tracing::info!("Fetched {} with {}", path.display(), self.fetcher.name());
        self.splitter.split(&path).await
    }
}

/// A splitter backed by the ffmpeg in `tools`.
pub fn splitter_from_config(config: &Config, tools: &ToolRegistry) -> Result<Splitter> {
    let ffmpeg = FfmpegTool::from_registry(tools)?;
    Ok(Splitter::with_ffmpeg(ffmpeg, SplitOptions::from(&config.split)))
}
