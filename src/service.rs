//! Shared application service for scorecard lookups.

use std::sync::Arc;

use anyhow::Context;
use scorecard_mcp_api::ScorecardApiClient;
use scorecard_mcp_core::{PlatformDetection, ProjectKey, ScorecardError, ScorecardSource};

use crate::config::ScorecardConfig;

/// Core runtime service: normalizes package references and relays upstream payloads.
#[derive(Clone)]
pub struct ScorecardService {
    source: Arc<dyn ScorecardSource>,
    platform_detection: PlatformDetection,
}

impl ScorecardService {
    /// Creates a service from the merged on-disk configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if config loading or HTTP client initialization fails.
    pub fn new() -> anyhow::Result<Self> {
        let config = ScorecardConfig::load()?;
        Self::from_config(&config)
    }

    /// Creates a service backed by the scorecard REST API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ScorecardConfig) -> anyhow::Result<Self> {
        let client = ScorecardApiClient::new(config.api.base_url.clone(), config.api.timeout())
            .context("failed to initialize scorecard API client")?;
        tracing::debug!(
            "scorecard API client targets {} with {}s timeout",
            client.api_base_url(),
            config.api.timeout_secs
        );
        Ok(Self::with_source(Arc::new(client), config.platform_detection))
    }

    pub fn with_source(
        source: Arc<dyn ScorecardSource>,
        platform_detection: PlatformDetection,
    ) -> Self {
        Self {
            source,
            platform_detection,
        }
    }

    /// Resolves a package reference to the project key used upstream.
    ///
    /// # Errors
    ///
    /// Returns [`ScorecardError::InvalidPackage`] for references without a `/` separator.
    pub fn resolve(&self, package_name: &str) -> Result<ProjectKey, ScorecardError> {
        ProjectKey::parse_with(package_name, self.platform_detection)
    }

    /// Looks up the scorecard for a package reference and returns the raw JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the normalization error before any request is made, or the upstream failure.
    pub async fn lookup(&self, package_name: &str) -> Result<String, ScorecardError> {
        let project = self.resolve(package_name)?;
        tracing::info!("looking up scorecard for {package_name} as {project}");

        match self.source.fetch_scorecard(&project).await {
            Ok(payload) => Ok(payload),
            Err(err) => {
                tracing::warn!("scorecard lookup failed for {project}: {err}");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/service.rs"]
mod tests;
