pub use vidsplit_core::config::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::SplitArgs;

/// Locations searched, in order, when no config path is given.
const DEFAULT_PATHS: &[&str] = &["./vidsplit.toml", "~/.config/vidsplit/config.toml"];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config = Config::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    if let Some(ref dir) = config.tools.tools_dir {
        if !dir.is_dir() {
            tracing::warn!("tools.tools_dir does not exist: {:?}", dir);
        }
    }

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path in default_paths() {
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(&path);
        }
    }

    Ok(Config::default())
}

fn default_paths() -> Vec<PathBuf> {
    DEFAULT_PATHS
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .collect()
}

/// Apply command-line overrides on top of the loaded `[split]` section.
pub fn apply_split_args(config: &mut Config, args: &SplitArgs) -> Result<()> {
    if let Some(max) = args.max_size_mb {
        config.split.max_size_mb = max;
    }
    if let Some(margin) = args.safety_margin {
        config.split.safety_margin = margin;
    }
    if let Some(jobs) = args.jobs {
        config.split.jobs = jobs;
    }
    if args.enforce {
        config.split.size_policy = SizePolicy::Enforce;
    }
    config.validate().context("Invalid split options")?;
    Ok(())
}
