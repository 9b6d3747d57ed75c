//! External tool detection and management.
//!
//! The [`ToolRegistry`] resolves the locations of `ffmpeg` and `yt-dlp`
//! from explicit config paths, a bundled tools directory, or `PATH`, and
//! provides lookup methods for the rest of the crate.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vidsplit_core::config::ToolsConfig;
use vidsplit_core::{Error, Result};

use crate::command::ToolCommand;

pub const FFMPEG: &str = "ffmpeg";
pub const YT_DLP: &str = "yt-dlp";

/// Known tool names that the registry manages.
const KNOWN_TOOLS: &[&str] = &[FFMPEG, YT_DLP];

/// Operating system family, as far as executable naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Other
        }
    }

    /// File name of the executable for `tool` (`ffmpeg.exe` on Windows).
    pub fn executable_name(self, tool: &str) -> String {
        match self {
            Platform::Windows => format!("{tool}.exe"),
            Platform::Other => tool.to_string(),
        }
    }
}

/// A resolved external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
    /// Maximum execution time before the tool is killed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
}

impl ToolConfig {
    /// Start a [`ToolCommand`] for this tool with its timeout applied.
    pub fn command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.path.clone());
        cmd.timeout(self.timeout);
        cmd
    }
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of the version output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Registry holding resolved tool configurations.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, ToolConfig>,
}

impl ToolRegistry {
    /// Resolve tools for the current platform.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        Self::discover_for(tools_config, Platform::current())
    }

    /// Resolve tools using the executable naming of `platform`.
    ///
    /// For each known tool the first hit wins:
    /// 1. the explicitly configured path, if it exists;
    /// 2. `tools_dir` joined with the platform executable name, if it exists;
    /// 3. a [`which::which`] lookup on `PATH`.
    ///
    /// Tools that are not found are omitted from the registry.
    pub fn discover_for(tools_config: &ToolsConfig, platform: Platform) -> Self {
        let mut tools = HashMap::new();

        for &name in KNOWN_TOOLS {
            let custom_path = match name {
                FFMPEG => tools_config.ffmpeg_path.as_deref(),
                YT_DLP => tools_config.yt_dlp_path.as_deref(),
                _ => None,
            };

            let resolved = custom_path
                .filter(|p| p.exists())
                .map(Path::to_path_buf)
                .or_else(|| {
                    tools_config
                        .tools_dir
                        .as_ref()
                        .map(|dir| dir.join(platform.executable_name(name)))
                        .filter(|p| p.exists())
                })
                .or_else(|| which::which(name).ok());

            match resolved {
                Some(path) => {
                    tracing::debug!("Resolved {name} at {}", path.display());
                    tools.insert(
                        name.to_string(),
                        ToolConfig {
                            name: name.to_string(),
                            path,
                            timeout: tools_config.timeout(),
                        },
                    );
                }
                None => {
                    if let Some(p) = custom_path {
                        tracing::warn!("Configured {name} path {} does not exist", p.display());
                    }
                }
            }
        }

        Self { tools }
    }

    /// Return the [`ToolConfig`] for the given tool, or an [`Error::Tool`] if
    /// it was not found during discovery.
    pub fn require(&self, name: &str) -> Result<&ToolConfig> {
        self.tools
            .get(name)
            .ok_or_else(|| Error::tool(name, format!("{name} not found; is it installed and in PATH?")))
    }

    /// Check all known tools and return availability information.
    pub async fn check_all(&self) -> Vec<ToolInfo> {
        let mut infos = Vec::with_capacity(KNOWN_TOOLS.len());
        for &name in KNOWN_TOOLS {
            let info = match self.tools.get(name) {
                Some(cfg) => ToolInfo {
                    name: name.to_string(),
                    available: true,
                    version: detect_version(cfg).await,
                    path: Some(cfg.path.clone()),
                },
                None => ToolInfo {
                    name: name.to_string(),
                    available: false,
                    version: None,
                    path: None,
                },
            };
            infos.push(info);
        }
        infos
    }
}

/// Run `ffmpeg -version` or `yt-dlp --version` and return the first line of
/// stdout.
async fn detect_version(cfg: &ToolConfig) -> Option<String> {
    let version_arg = match cfg.name.as_str() {
        FFMPEG => "-version",
        _ => "--version",
    };

    let mut cmd = cfg.command();
    cmd.arg(version_arg);
    let output = cmd.execute().await.ok()?;
    output.stdout.lines().next().map(|s| s.trim().to_string())
}
