//! vidsplit-core: shared types, errors, configuration, and split planning.
//!
//! This crate is the foundational dependency for the other vidsplit crates,
//! providing the unified error type, the media data model ([`MediaFile`],
//! [`SplitPlan`], [`Chunk`]), the pure size gate and chunk planner, and the
//! configuration types.

pub mod config;
pub mod error;
pub mod media;
pub mod plan;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use media::{Chunk, MediaFile, BYTES_PER_MB};
pub use plan::{plan, schedule, should_split, SplitPlan, DEFAULT_SAFETY_MARGIN};
