//! vidsplit - download a video and split it into size-bounded parts
//!
//! This library crate exposes the CLI building blocks for integration testing.

pub mod cli;
pub mod config;
pub mod pipeline;
