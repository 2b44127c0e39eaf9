use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const GITHUB_HOST: &str = "github.com";
pub const GITLAB_HOST: &str = "gitlab.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    GitHub,
    GitLab,
}

impl Platform {
    pub fn host(self) -> &'static str {
        match self {
            Self::GitHub => GITHUB_HOST,
            Self::GitLab => GITLAB_HOST,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}

/// How the hosting platform is inferred from a package reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformDetection {
    /// `gitlab.com` anywhere in the raw input selects GitLab.
    #[default]
    Substring,
    /// Only a path segment equal to `gitlab.com` directly before the owner selects GitLab.
    HostSegment,
}

/// Canonical `owner/repository` key paired with its hosting platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectKey {
    platform: Platform,
    repository: String,
}

impl ProjectKey {
    /// Normalizes a free-form package reference using substring platform detection.
    ///
    /// # Errors
    ///
    /// Returns [`ScorecardError::InvalidPackage`] when the reference has no `/` separator
    /// once a single trailing slash is removed.
    pub fn parse(raw: &str) -> Result<Self, ScorecardError> {
        Self::parse_with(raw, PlatformDetection::Substring)
    }

    /// Normalizes a free-form package reference.
    ///
    /// At most one trailing `/` is stripped, then only the last two segments are kept.
    /// Any prefix beyond those (a host, a group path, a URL scheme) is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ScorecardError::InvalidPackage`] when the reference has no `/` separator
    /// once a single trailing slash is removed.
    pub fn parse_with(raw: &str, detection: PlatformDetection) -> Result<Self, ScorecardError> {
        let trimmed = raw.strip_suffix('/').unwrap_or(raw);
        if !trimmed.contains('/') {
            return Err(ScorecardError::InvalidPackage {
                package: raw.to_string(),
            });
        }

        let segments = trimmed.split('/').collect::<Vec<_>>();
        let tail = segments.len().saturating_sub(2);
        let repository = segments[tail..].join("/");

        let is_gitlab = match detection {
            PlatformDetection::Substring => raw.contains(GITLAB_HOST),
            PlatformDetection::HostSegment => tail
                .checked_sub(1)
                .map(|index| segments[index].eq_ignore_ascii_case(GITLAB_HOST))
                .unwrap_or(false),
        };
        let platform = if is_gitlab {
            Platform::GitLab
        } else {
            Platform::GitHub
        };

        Ok(Self {
            platform,
            repository,
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The `owner/repository` part of the key.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Upstream project path, `{platform}/{owner}/{repository}`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.platform, self.repository)
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.repository)
    }
}

#[derive(Debug, Clone, Error)]
pub enum ScorecardError {
    #[error("package_name should be of the form platform/owner/repository: {package}")]
    InvalidPackage { package: String },
    #[error("failed to fetch scorecard for {project}: upstream returned status {status}: {body}")]
    Upstream {
        status: u16,
        project: String,
        body: String,
    },
    #[error("scorecard request failed: {message}")]
    Transport { message: String },
    #[error("scorecard API returned invalid data: {message}")]
    InvalidResponse { message: String },
}

/// Upstream provider of scorecard payloads.
#[async_trait]
pub trait ScorecardSource: Send + Sync {
    /// Fetches the raw scorecard JSON for one project.
    async fn fetch_scorecard(&self, project: &ProjectKey) -> Result<String, ScorecardError>;
}
