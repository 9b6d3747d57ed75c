//! Configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML. Every section
//! defaults sensibly so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::media::BYTES_PER_MB;
use crate::plan::DEFAULT_SAFETY_MARGIN;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub split: SplitConfig,
    pub tools: ToolsConfig,
    pub fetch: FetchConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Check for settings that would make a split impossible.
    pub fn validate(&self) -> Result<()> {
        if self.split.max_size_mb == 0 {
            return Err(Error::Validation("split.max_size_mb must be greater than 0".into()));
        }
        if !self.split.safety_margin.is_finite() || self.split.safety_margin < 0.0 {
            return Err(Error::Validation(format!(
                "split.safety_margin must be >= 0, got {}",
                self.split.safety_margin
            )));
        }
        if self.split.jobs == 0 {
            return Err(Error::Validation("split.jobs must be at least 1".into()));
        }
        if self.tools.timeout_secs == Some(0) {
            return Err(Error::Validation("tools.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// What to do when a produced chunk is still larger than the limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Trust the estimate; oversized chunks are only logged.
    #[default]
    Estimate,
    /// Re-split oversized chunks until they fit or the depth limit is hit.
    Enforce,
}

/// Split planning and execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub max_size_mb: u64,
    pub safety_margin: f64,
    /// Concurrent extractions; 1 keeps the strict sequential behaviour.
    pub jobs: usize,
    pub size_policy: SizePolicy,
    pub max_resplit_depth: u32,
}

impl SplitConfig {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 50,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            jobs: 1,
            size_policy: SizePolicy::Estimate,
            max_resplit_depth: 2,
        }
    }
}

/// External tool locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub yt_dlp_path: Option<PathBuf>,
    /// Directory holding bundled binaries (e.g. `ffmpeg` / `ffmpeg.exe`).
    pub tools_dir: Option<PathBuf>,
    /// Per-invocation limit; unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ToolsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Download settings for the fetch step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub output_dir: PathBuf,
    /// yt-dlp format selector.
    pub format: String,
    pub merge_output_format: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            format: "best[ext=mp4]".into(),
            merge_output_format: "mp4".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.split.max_size_mb, 50);
        assert_eq!(config.split.max_size_bytes(), 50 * 1024 * 1024);
        assert_eq!(config.split.jobs, 1);
        assert_eq!(config.split.size_policy, SizePolicy::Estimate);
        assert_eq!(config.fetch.format, "best[ext=mp4]");
        assert!(config.tools.timeout().is_none());
        config.validate().unwrap();
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::from_toml(
            r#"
            [split]
            max_size_mb = 5
            size_policy = "enforce"

            [tools]
            tools_dir = "/opt/ffmpeg"
            timeout_secs = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.split.max_size_mb, 5);
        assert_eq!(config.split.size_policy, SizePolicy::Enforce);
        assert_eq!(config.split.safety_margin, 1.0);
        assert_eq!(config.tools.tools_dir, Some(PathBuf::from("/opt/ffmpeg")));
        assert_eq!(config.tools.timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.fetch.merge_output_format, "mp4");
    }

    #[test]
    fn unknown_policy_is_parse_error() {
        let err = Config::from_toml("[split]\nsize_policy = \"strict\"").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn validate_rejects_impossible_settings() {
        let mut config = Config::default();
        config.split.max_size_mb = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.split.safety_margin = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.split.jobs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tools.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
