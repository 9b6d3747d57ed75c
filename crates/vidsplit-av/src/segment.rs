//! Executing a schedule of chunks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use vidsplit_core::{Chunk, Error, Result};

/// Something that can write one time slice of a source into its own file.
#[async_trait]
pub trait SegmentWriter: Send + Sync {
    /// Human-readable name identifying this implementation.
    fn name(&self) -> &'static str;

    /// Write `[chunk.start_secs, chunk.start_secs + chunk.duration_secs)` of
    /// `source` to `chunk.output_path` without re-encoding.
    async fn write_segment(&self, source: &Path, chunk: &Chunk) -> Result<()>;
}

/// Write every chunk of the schedule and return their paths in index order.
///
/// With `jobs <= 1` chunks are written strictly one after another and the
/// first failure stops the run, so later chunks are never attempted. With
/// more jobs up to `jobs` writes are in flight at once; the first failure in
/// index order is returned and chunks already started may still complete.
///
/// Files written before a failure are left on disk.
pub async fn extract_chunks(
    writer: &dyn SegmentWriter,
    source: &Path,
    chunks: &[Chunk],
    jobs: usize,
) -> Result<Vec<PathBuf>> {
    if jobs <= 1 {
        let mut written = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            write_one(writer, source, chunk).await?;
            written.push(chunk.output_path.clone());
        }
        return Ok(written);
    }

    stream::iter(chunks)
        .map(|chunk| async move {
            write_one(writer, source, chunk).await?;
            Ok::<_, Error>(chunk.output_path.clone())
        })
        .buffered(jobs)
        .try_collect()
        .await
}

async fn write_one(writer: &dyn SegmentWriter, source: &Path, chunk: &Chunk) -> Result<()> {
    tracing::debug!(
        "Writing part {} ({}s from {}s) -> {}",
        chunk.index,
        chunk.duration_secs,
        chunk.start_secs,
        chunk.output_path.display()
    );
    writer.write_segment(source, chunk).await?;
    tracing::info!("Wrote {}", chunk.output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use vidsplit_core::{schedule, MediaFile};

    /// Records calls and fails on a chosen index.
    struct RecordingWriter {
        fail_on: Option<u64>,
        calls: Mutex<Vec<u64>>,
    }

    impl RecordingWriter {
        fn new(fail_on: Option<u64>) -> Self {
            Self {
                fail_on,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<u64> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SegmentWriter for RecordingWriter {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn write_segment(&self, _source: &Path, chunk: &Chunk) -> Result<()> {
            self.calls.lock().unwrap().push(chunk.index);
            if self.fail_on == Some(chunk.index) {
                return Err(Error::split(chunk.index, &chunk.output_path, "boom"));
            }
            Ok(())
        }
    }

    fn four_chunks() -> Vec<Chunk> {
        schedule(&MediaFile::new("/v/a.mp4"), 150, 600)
    }

    #[tokio::test]
    async fn sequential_returns_paths_in_order() {
        let writer = RecordingWriter::new(None);
        let paths = extract_chunks(&writer, Path::new("/v/a.mp4"), &four_chunks(), 1)
            .await
            .unwrap();
        assert_eq!(writer.calls(), vec![1, 2, 3, 4]);
        assert_eq!(paths[0], PathBuf::from("/v/a_part1.mp4"));
        assert_eq!(paths[3], PathBuf::from("/v/a_part4.mp4"));
    }

    #[tokio::test]
    async fn sequential_stops_at_first_failure() {
        let writer = RecordingWriter::new(Some(2));
        let err = extract_chunks(&writer, Path::new("/v/a.mp4"), &four_chunks(), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Split { index: 2, .. }));
        assert_eq!(writer.calls(), vec![1, 2]);
    }

    #[tokio::test]
    async fn parallel_preserves_index_order() {
        let writer = RecordingWriter::new(None);
        let paths = extract_chunks(&writer, Path::new("/v/a.mp4"), &four_chunks(), 3)
            .await
            .unwrap();
        let expected: Vec<PathBuf> = four_chunks().into_iter().map(|c| c.output_path).collect();
        assert_eq!(paths, expected);
        assert_eq!(writer.calls().len(), 4);
    }

    #[tokio::test]
    async fn parallel_reports_failure() {
        let writer = RecordingWriter::new(Some(3));
        let err = extract_chunks(&writer, Path::new("/v/a.mp4"), &four_chunks(), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Split { index: 3, .. }));
    }

    #[tokio::test]
    async fn empty_schedule_writes_nothing() {
        let writer = RecordingWriter::new(None);
        let paths = extract_chunks(&writer, Path::new("/v/a.mp4"), &[], 1).await.unwrap();
        assert!(paths.is_empty());
        assert!(writer.calls().is_empty());
    }
}
