//! Configuration loading and merge logic for `scorecard-mcp`.
//!
//! Global config and project-local config are merged with project values taking precedence.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use scorecard_mcp_core::PlatformDetection;
use serde::{Deserialize, Serialize};

/// Default scorecard API base URL.
pub const DEFAULT_API_BASE_URL: &str = scorecard_mcp_api::DEFAULT_API_BASE_URL;
/// Default upper bound for one scorecard request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const GLOBAL_CONFIG_ENV: &str = "SCORECARD_MCP_CONFIG_PATH";
const PROJECT_CONFIG_ENV: &str = "SCORECARD_MCP_PROJECT_CONFIG_PATH";
const API_BASE_URL_ENV: &str = "SCORECARD_MCP_API_BASE_URL";

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScorecardConfig {
    /// How `gitlab.com` is recognized in package references.
    pub platform_detection: PlatformDetection,
    /// Upstream API settings.
    pub api: ApiConfig,
}

/// Upstream scorecard API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ScorecardConfig {
    /// Loads global and project config, then applies the base URL environment override.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing config file cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_with_paths(global_config_path(), project_config_path())?;
        if let Some(base_url) = env::var_os(API_BASE_URL_ENV) {
            config.apply_base_url(base_url.to_string_lossy().as_ref());
        }
        Ok(config)
    }

    #[cfg(test)]
    fn load_from_path(path: &Path) -> anyhow::Result<Self> {
        Self::load_with_paths(Some(path.to_path_buf()), None)
    }

    fn load_with_paths(global: Option<PathBuf>, project: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(path) = global {
            config.merge_from_path(&path)?;
        }
        if let Some(path) = project {
            config.merge_from_path(&path)?;
        }
        Ok(config)
    }

    fn merge_from_path(&mut self, path: &Path) -> anyhow::Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let overlay: ConfigOverlay = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file at {}", path.display()))?;
        self.apply_overlay(overlay);
        Ok(())
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(value) = overlay.platform_detection {
            self.platform_detection = value;
        }
        if let Some(api) = overlay.api {
            if let Some(base_url) = api.base_url {
                self.apply_base_url(&base_url);
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = sanitize_positive_u64(timeout_secs, DEFAULT_TIMEOUT_SECS);
            }
        }
    }

    fn apply_base_url(&mut self, base_url: &str) {
        let base_url = base_url.trim();
        self.api.base_url = if base_url.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            base_url.to_string()
        };
    }
}

fn global_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(GLOBAL_CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)?;

    Some(home.join(".config").join("scorecard-mcp").join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    if let Some(explicit) = env::var_os(PROJECT_CONFIG_ENV) {
        return Some(PathBuf::from(explicit));
    }

    let cwd = env::current_dir().ok()?;
    Some(cwd.join(".scorecard-mcp.toml"))
}

fn sanitize_positive_u64(value: u64, fallback: u64) -> u64 {
    if value == 0 { fallback } else { value }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverlay {
    platform_detection: Option<PlatformDetection>,
    api: Option<ApiOverlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiOverlay {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
