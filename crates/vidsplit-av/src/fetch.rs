//! Downloading the source video.
//!
//! The splitter only needs a local path. [`Fetcher`] is the seam; the
//! bundled implementation shells out to `yt-dlp`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vidsplit_core::config::FetchConfig;
use vidsplit_core::{Error, Result};

use crate::tools::{ToolConfig, ToolRegistry, FFMPEG, YT_DLP};

/// Resolves a URL to a local, readable media file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Download `url` into `output_dir` and return the path of the file.
    async fn fetch(&self, url: &str, output_dir: &Path) -> Result<PathBuf>;
}

/// A [`Fetcher`] backed by the `yt-dlp` CLI.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    yt_dlp: ToolConfig,
    ffmpeg_location: Option<PathBuf>,
    format: String,
    merge_output_format: String,
}

impl YtDlpFetcher {
    pub fn new(yt_dlp: ToolConfig, config: &FetchConfig) -> Self {
        Self {
            yt_dlp,
            ffmpeg_location: None,
            format: config.format.clone(),
            merge_output_format: config.merge_output_format.clone(),
        }
    }

    /// Build from resolved tools. ffmpeg is optional here; when present it is
    /// passed to yt-dlp for merging separate audio and video streams.
    pub fn from_registry(registry: &ToolRegistry, config: &FetchConfig) -> Result<Self> {
        let mut fetcher = Self::new(registry.require(YT_DLP)?.clone(), config);
        fetcher.ffmpeg_location = registry.require(FFMPEG).ok().map(|t| t.path.clone());
        Ok(fetcher)
    }

    pub fn with_ffmpeg_location(mut self, path: PathBuf) -> Self {
        self.ffmpeg_location = Some(path);
        self
    }

    fn args(&self, url: &str, output_dir: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            self.format.clone().into(),
            "-o".into(),
            output_dir.join("%(title)s.%(ext)s").into(),
            "--merge-output-format".into(),
            self.merge_output_format.clone().into(),
        ];
        if let Some(ref ffmpeg) = self.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.into());
        }
        args.extend(
            ["--no-simulate", "--print", "after_move:filepath", url]
                .into_iter()
                .map(OsString::from),
        );
        args
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, url: &str, output_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(output_dir).await?;

        tracing::info!("Fetching {url} into {}", output_dir.display());

        let mut cmd = self.yt_dlp.command();
        cmd.args(self.args(url, output_dir));

        let output = cmd
            .execute()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        let path = output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .map(PathBuf::from)
            .ok_or_else(|| Error::fetch(url, "yt-dlp did not report a file path"))?;

        if !path.is_file() {
            return Err(Error::fetch(
                url,
                format!("reported file {} does not exist", path.display()),
            ));
        }

        tracing::info!("Fetched {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(path: PathBuf) -> ToolConfig {
        ToolConfig {
            name: YT_DLP.to_string(),
            path,
            timeout: None,
        }
    }

    #[test]
    fn arguments_follow_config() {
        let fetcher = YtDlpFetcher::new(tool(PathBuf::from("yt-dlp")), &FetchConfig::default())
            .with_ffmpeg_location(PathBuf::from("/opt/ffmpeg/ffmpeg"));
        let args = fetcher.args("https://example.com/watch?v=1", Path::new("/dl"));
        assert_eq!(
            args,
            vec![
                "-f",
                "best[ext=mp4]",
                "-o",
                "/dl/%(title)s.%(ext)s",
                "--merge-output-format",
                "mp4",
                "--ffmpeg-location",
                "/opt/ffmpeg/ffmpeg",
                "--no-simulate",
                "--print",
                "after_move:filepath",
                "https://example.com/watch?v=1",
            ]
        );
    }

    #[test]
    fn arguments_without_ffmpeg() {
        let fetcher = YtDlpFetcher::new(tool(PathBuf::from("yt-dlp")), &FetchConfig::default());
        let args = fetcher.args("u", Path::new("/dl"));
        assert!(!args.iter().any(|a| a == "--ffmpeg-location"));
    }

    #[cfg(unix)]
    mod subprocess {
        use super::*;
        use crate::test_support::write_script;

        #[tokio::test]
        async fn fetch_returns_reported_path() {
            let dir = tempfile::tempdir().unwrap();
            let downloads = dir.path().join("downloads");
            let bin = write_script(
                dir.path(),
                "yt-dlp",
                &format!(
                    "echo '[download] 100%' >&2\nhead -c 10 /dev/zero > '{0}/Clip.mp4'\necho '{0}/Clip.mp4'",
                    downloads.display()
                ),
            );

            let fetcher = YtDlpFetcher::new(tool(bin), &FetchConfig::default());
            let path = fetcher.fetch("https://example.com/v", &downloads).await.unwrap();
            assert_eq!(path, downloads.join("Clip.mp4"));
        }

        #[tokio::test]
        async fn fetch_failure_is_fetch_error() {
            let dir = tempfile::tempdir().unwrap();
            let bin = write_script(dir.path(), "yt-dlp", "echo 'ERROR: Video unavailable' >&2\nexit 1");

            let err = YtDlpFetcher::new(tool(bin), &FetchConfig::default())
                .fetch("https://example.com/gone", dir.path())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Fetch { .. }));
            assert!(err.to_string().contains("Video unavailable"));
        }

        #[tokio::test]
        async fn fetch_with_missing_file_is_error() {
            let dir = tempfile::tempdir().unwrap();
            let bin = write_script(dir.path(), "yt-dlp", "echo /nonexistent/clip.mp4");

            let err = YtDlpFetcher::new(tool(bin), &FetchConfig::default())
                .fetch("https://example.com/v", dir.path())
                .await
                .unwrap_err();
            assert!(err.to_string().contains("does not exist"));
        }
    }
}
