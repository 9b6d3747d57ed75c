//! Unified error type for vidsplit.
//!
//! Every failure in the fetch → gate → probe → plan → extract pipeline is
//! funnelled into [`Error`]. The binary maps it to a non-zero exit code via
//! [`Error::exit_code`].

use std::path::PathBuf;

/// Unified error type covering all failure modes in vidsplit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The duration of a media file could not be determined.
    #[error("Probe error [{}]: {message}", path.display())]
    Probe {
        /// File that was probed.
        path: PathBuf,
        /// Underlying cause (missing marker, bad timestamp, tool failure).
        message: String,
    },

    /// Extracting a segment failed.
    #[error("Split error [part {index} -> {}]: {message}", output.display())]
    Split {
        /// 1-based index of the chunk that failed.
        index: u64,
        /// Output file the extraction was writing.
        output: PathBuf,
        /// Error reported by the tool.
        message: String,
    },

    /// A produced chunk is larger than the requested bound and could not be
    /// brought under it by re-splitting.
    #[error(
        "Chunk {} is {size_bytes} bytes, exceeding the {max_size_bytes} byte limit",
        path.display()
    )]
    SizeEstimateViolation {
        /// Chunk that is too large.
        path: PathBuf,
        /// Actual size on disk.
        size_bytes: u64,
        /// Requested upper bound.
        max_size_bytes: u64,
    },

    /// An external tool (ffmpeg, yt-dlp) could not be located, spawned or
    /// timed out.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Downloading the remote resource failed.
    #[error("Fetch error [{url}]: {message}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Human-readable error description.
        message: String,
    },

    /// Configuration or arguments failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) => 2,
            Error::Probe { .. } => 3,
            Error::Split { .. } => 4,
            Error::SizeEstimateViolation { .. } => 5,
            Error::Tool { .. } => 6,
            Error::Fetch { .. } => 7,
            Error::Io { .. } => 1,
        }
    }

    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Split`].
    pub fn split(index: u64, output: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Split {
            index,
            output: output.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Fetch`].
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_display() {
        let err = Error::probe("/videos/a.mp4", "no Duration line");
        assert_eq!(
            err.to_string(),
            "Probe error [/videos/a.mp4]: no Duration line"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn split_display() {
        let err = Error::split(2, "/videos/a_part2.mp4", "exit status 1");
        assert_eq!(
            err.to_string(),
            "Split error [part 2 -> /videos/a_part2.mp4]: exit status 1"
        );
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn size_violation_display() {
        let err = Error::SizeEstimateViolation {
            path: PathBuf::from("/v/a_part1.mp4"),
            size_bytes: 60,
            max_size_bytes: 50,
        };
        assert!(err.to_string().contains("60 bytes"));
        assert!(err.to_string().contains("50 byte limit"));
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "not found");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: not found");
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn fetch_display() {
        let err = Error::fetch("https://example.com/v", "HTTP 404");
        assert_eq!(err.to_string(), "Fetch error [https://example.com/v]: HTTP 404");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}
