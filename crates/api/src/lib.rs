use async_trait::async_trait;
use reqwest::Client;
use std::error::Error as StdError;
use std::iter;
use std::time::Duration;

use scorecard_mcp_core::{ProjectKey, ScorecardError, ScorecardSource};

pub const DEFAULT_API_BASE_URL: &str = "https://api.scorecard.dev";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SCORECARD_USER_AGENT: &str = concat!("scorecard-mcp/", env!("CARGO_PKG_VERSION"));

/// Client for the OpenSSF Scorecard REST API.
#[derive(Clone)]
pub struct ScorecardApiClient {
    http: Client,
    api_base_url: String,
}

impl ScorecardApiClient {
    /// Builds a client that bounds every request by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScorecardError::Transport`] when the HTTP client cannot be constructed.
    pub fn new(api_base_url: impl Into<String>, timeout: Duration) -> Result<Self, ScorecardError> {
        let api_base_url = api_base_url.into();
        let http = Client::builder()
            .user_agent(SCORECARD_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                transport_error("unable to build scorecard HTTP client", &api_base_url, e)
            })?;

        Ok(Self { http, api_base_url })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn project_url(&self, project: &ProjectKey) -> String {
        format!(
            "{}/projects/{}",
            self.api_base_url.trim_end_matches('/'),
            project.path()
        )
    }
}

#[async_trait]
impl ScorecardSource for ScorecardApiClient {
    async fn fetch_scorecard(&self, project: &ProjectKey) -> Result<String, ScorecardError> {
        let url = self.project_url(project);
        tracing::debug!("requesting scorecard from {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error("unable to query scorecard API", &url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body.trim().to_string(),
                Err(e) => format!("<unreadable body: {e}>"),
            };
            tracing::warn!("scorecard API returned status {status} for {project}");
            return Err(ScorecardError::Upstream {
                status: status.as_u16(),
                project: project.path(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error("unable to read scorecard response", &url, e))?;

        serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            ScorecardError::InvalidResponse {
                message: format!("failed to parse scorecard response JSON: {e}"),
            }
        })?;

        Ok(body)
    }
}

/// Flattens a reqwest failure into one line naming the failure kind, URL and root cause.
fn transport_error(context: &str, request_url: &str, error: reqwest::Error) -> ScorecardError {
    let url = error.url().map_or(request_url, |url| url.as_str());
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_body() {
        "body"
    } else if error.is_builder() {
        "builder"
    } else {
        "request"
    };

    let mut message = format!("{context}: {error} (kind={kind}, url={url})");
    if let Some(cause) = iter::successors(error.source(), |source| (*source).source()).last() {
        message.push_str(&format!("; cause: {cause}"));
    }
    if error.is_timeout() {
        message.push_str("; raise api.timeout_secs if the scorecard API is slow");
    }

    ScorecardError::Transport { message }
}
