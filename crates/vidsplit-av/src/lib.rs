//! # vidsplit-av
//!
//! External tool integration and orchestration for size-bounded video
//! splitting.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- resolve ffmpeg and yt-dlp from
//!   config, a bundled tools directory, or `PATH`.
//! - **Command execution** ([`ToolCommand`]) -- async builder with optional
//!   timeout for running external processes.
//! - **Probing** ([`ProbeClient`]) -- the duration seam, with the ffmpeg
//!   output parser exposed for direct use.
//! - **Extraction** ([`SegmentWriter`], [`extract_chunks`]) -- stream-copy
//!   each scheduled chunk, sequentially or with bounded concurrency.
//! - **Fetching** ([`Fetcher`], [`YtDlpFetcher`]) -- download a URL to a
//!   local file.
//! - **Splitting** ([`Splitter`]) -- the gate → probe → plan → extract →
//!   verify pipeline.
//!
//! ## Example
//!
//! ```no_run
//! use vidsplit_av::{FfmpegTool, SplitOptions, Splitter, ToolRegistry};
//! use vidsplit_core::config::Config;
//! use std::path::Path;
//!
//! # async fn example() -> vidsplit_core::Result<()> {
//! let config = Config::default();
//! let tools = ToolRegistry::discover(&config.tools);
//! let splitter = Splitter::with_ffmpeg(
//!     FfmpegTool::from_registry(&tools)?,
//!     SplitOptions::from(&config.split),
//! );
//! for chunk in splitter.split(Path::new("/videos/talk.mp4")).await? {
//!     println!("{}", chunk.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod fetch;
pub mod ffmpeg;
pub mod probe;
pub mod segment;
pub mod splitter;
pub mod tools;

#[cfg(all(test, unix))]
mod test_support;

// ---- Re-exports for convenience ----

pub use command::{ToolCommand, ToolOutput};
pub use fetch::{Fetcher, YtDlpFetcher};
pub use ffmpeg::FfmpegTool;
pub use probe::{parse_probe_output, parse_timestamp, ProbeClient};
pub use segment::{extract_chunks, SegmentWriter};
pub use splitter::{SplitOptions, Splitter};
pub use tools::{Platform, ToolConfig, ToolInfo, ToolRegistry};
