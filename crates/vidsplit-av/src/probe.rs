//! Duration probing.
//!
//! [`ProbeClient`] is the seam the splitter depends on. The parsing of
//! ffmpeg's diagnostic output lives here as plain functions so it can be
//! exercised with fixture strings.

use std::path::Path;

use async_trait::async_trait;
use vidsplit_core::{Error, Result};

const DURATION_MARKER: &str = "Duration:";

/// Something that can tell how long a media file is.
#[async_trait]
pub trait ProbeClient: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Total duration of the file at `path` in whole seconds (floored).
    async fn probe_duration(&self, path: &Path) -> Result<u64>;
}

/// First line of `text` that carries a `Duration:` marker.
pub fn find_duration_line(text: &str) -> Option<&str> {
    text.lines().find(|line| line.contains(DURATION_MARKER))
}

/// Timestamp field of a duration line: the text after `Duration:` up to the
/// first comma, trimmed.
///
/// `"  Duration: 00:10:05.20, start: 0.000000, bitrate: 1205 kb/s"` gives
/// `"00:10:05.20"`.
pub fn duration_field(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(DURATION_MARKER)?;
    rest.split(',').next().map(str::trim)
}

/// Parse `HH:MM:SS.fraction` into whole seconds, discarding the fraction.
///
/// The dot is folded into the colon separators and the result must split into
/// exactly four fields; anything else (`N/A`, missing fraction, extra fields)
/// is rejected.
pub fn parse_timestamp(s: &str) -> std::result::Result<u64, String> {
    let normalized = s.replace('.', ":");
    let fields: Vec<&str> = normalized.split(':').collect();
    let [h, m, sec, frac] = fields.as_slice() else {
        return Err(format!(
            "expected HH:MM:SS.fraction, got '{s}' ({} fields)",
            fields.len()
        ));
    };

    let whole = |name: &str, v: &str| {
        v.parse::<u64>()
            .map_err(|_| format!("invalid {name} '{v}' in timestamp '{s}'"))
    };
    let hours = whole("hours", *h)?;
    let minutes = whole("minutes", *m)?;
    let seconds = whole("seconds", *sec)?;
    if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid fraction '{frac}' in timestamp '{s}'"));
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Extract the duration of `path` from ffmpeg's diagnostic output.
///
/// # Errors
///
/// Returns [`Error::Probe`] when no marker line exists, the timestamp does
/// not parse, or the duration is zero. A sub-second file floors to zero and
/// would plan no chunks at all, silently producing nothing, so it is treated
/// as unprobeable instead.
pub fn parse_probe_output(path: &Path, diagnostics: &str) -> Result<u64> {
    let line = find_duration_line(diagnostics)
        .ok_or_else(|| Error::probe(path, "no Duration line in tool output"))?;
    let field = duration_field(line)
        .ok_or_else(|| Error::probe(path, format!("malformed Duration line: {}", line.trim())))?;
    let seconds = parse_timestamp(field).map_err(|e| Error::probe(path, e))?;
    if seconds == 0 {
        return Err(Error::probe(path, "media reports a zero-second duration"));
    }
    Ok(seconds)
}
