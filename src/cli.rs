use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidsplit")]
#[command(author, version, about = "Split videos into size-bounded, playable parts")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the `[split]` config section.
#[derive(Args, Debug, Clone, Default)]
pub struct SplitArgs {
    /// Maximum size of each part in MB (1 MB = 1048576 bytes)
    #[arg(short = 'm', long)]
    pub max_size_mb: Option<u64>,

    /// Extra chunks added to the size ratio when planning
    #[arg(long)]
    pub safety_margin: Option<f64>,

    /// Number of parts to extract concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Split oversized parts again instead of only warning
    #[arg(long)]
    pub enforce: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a video and split it into parts
    Download {
        /// URL of the video
        #[arg(required = true)]
        url: String,

        /// Directory to download into (defaults to fetch.output_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Split a local media file into parts
    Split {
        /// File to split
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        split: SplitArgs,
    },

    /// Show how a file would be split without writing anything
    Plan {
        /// File to plan
        #[arg(required = true)]
        file: PathBuf,

        #[command(flatten)]
        split: SplitArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the duration of a media file in seconds
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Check that required external tools are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
