//! Media data model: source files and the chunks cut from them.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::Result;

/// Bytes in one megabyte, as used for every size limit in vidsplit.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// A media file on disk, owned by the caller.
///
/// Size is read from filesystem metadata on demand; duration comes from a
/// probe and is not cached here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    path: PathBuf,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current size of the file in bytes.
    pub fn size_bytes(&self) -> Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Path of the `index`-th chunk: `{dir}/{stem}_part{index}{.ext}`.
    ///
    /// No zero padding is applied. A source without an extension yields
    /// chunks without one.
    pub fn chunk_path(&self, index: u64) -> PathBuf {
        let mut name = OsString::new();
        if let Some(stem) = self.path.file_stem() {
            name.push(stem);
        }
        name.push(format!("_part{index}"));
        if let Some(ext) = self.path.extension() {
            name.push(".");
            name.push(ext);
        }
        match self.path.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// One contiguous time slice of a source, written as its own file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 1-based sequence number.
    pub index: u64,
    pub start_secs: u64,
    /// Requested slice length. The tool stops early at end of input, so the
    /// final chunk may be shorter on disk.
    pub duration_secs: u64,
    pub output_path: PathBuf,
}

impl Chunk {
    pub fn end_secs(&self) -> u64 {
        self.start_secs + self.duration_secs
    }
}
