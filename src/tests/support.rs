//! In-process scorecard source used by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use scorecard_mcp_core::{ProjectKey, ScorecardError, ScorecardSource};

pub struct StubSource {
    response: Result<String, ScorecardError>,
    requests: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn ok(payload: &str) -> Self {
        Self::with_response(Ok(payload.to_string()))
    }

    pub fn failing(error: ScorecardError) -> Self {
        Self::with_response(Err(error))
    }

    fn with_response(response: Result<String, ScorecardError>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Project paths requested so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

#[async_trait]
impl ScorecardSource for StubSource {
    async fn fetch_scorecard(&self, project: &ProjectKey) -> Result<String, ScorecardError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(project.path());
        self.response.clone()
    }
}
