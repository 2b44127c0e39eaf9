//! MCP tool and prompt handlers for scorecard lookups.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, service::RequestContext, tool, tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use scorecard_mcp_core::ScorecardError;
use serde::Deserialize;

use crate::service::ScorecardService;

/// Name shared by the scorecard tool and prompt.
pub const SCORECARD_CAPABILITY: &str = "OpenSSF-Scorecard";

const SCORECARD_DESCRIPTION: &str = "Report security best practices and security posture for an open source package or dependency. Fetches OpenSSF Scorecard results and returns a summary of the package's security practices. The information provided is a guideline, and it is up to the user to make a decision about if a package is secure or not.";

const PACKAGE_NAME_ARGUMENT: &str = "package_name";

const PACKAGE_NAME_DESCRIPTION: &str = "Name of package in the form platform/owner/repository. The platform is optional, but if provided should be gitlab.com or github.com. The owner and the repository is supplied by the user.";

/// Error code reported when a package name cannot be split into owner and repository.
const INVALID_PACKAGE_CODE: ErrorCode = ErrorCode(400);

/// Parameters for the `OpenSSF-Scorecard` MCP tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ScorecardQuery {
    #[schemars(description = PACKAGE_NAME_DESCRIPTION)]
    #[serde(default)]
    pub package_name: String,
}

/// MCP transport adapter for the shared scorecard service.
#[derive(Clone)]
pub struct ScorecardServer {
    tool_router: ToolRouter<Self>,
    service: Arc<ScorecardService>,
}

#[tool_router]
impl ScorecardServer {
    /// Creates a server using the default runtime service.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying service fails to initialize.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_service(ScorecardService::new()?))
    }

    pub fn with_service(service: ScorecardService) -> Self {
        Self {
            tool_router: Self::tool_router(),
            service: Arc::new(service),
        }
    }

    // The `tool` macro requires a string literal; keep in sync with SCORECARD_DESCRIPTION.
    #[tool(
        name = "OpenSSF-Scorecard",
        description = "Report security best practices and security posture for an open source package or dependency. Fetches OpenSSF Scorecard results and returns a summary of the package's security practices. The information provided is a guideline, and it is up to the user to make a decision about if a package is secure or not."
    )]
    async fn openssf_scorecard(
        &self,
        Parameters(query): Parameters<ScorecardQuery>,
    ) -> Result<CallToolResult, McpError> {
        let package_name = tool_package_name(&query.package_name)?;

        let payload = self
            .service
            .lookup(package_name)
            .await
            .map_err(mcp_scorecard_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "OpenSSF Scorecard results for {package_name}:\n{payload}"
        ))]))
    }
}

impl ScorecardServer {
    /// Prompts advertised by `prompts/list`.
    fn prompt_catalog() -> Vec<Prompt> {
        vec![Prompt::new(
            SCORECARD_CAPABILITY,
            Some(SCORECARD_DESCRIPTION),
            Some(vec![PromptArgument {
                name: PACKAGE_NAME_ARGUMENT.to_string(),
                title: None,
                description: Some(PACKAGE_NAME_DESCRIPTION.to_string()),
                required: Some(true),
            }]),
        )]
    }

    async fn scorecard_prompt(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        let package_name = prompt_package_name(arguments)?;

        let payload = self
            .service
            .lookup(package_name)
            .await
            .map_err(mcp_scorecard_error)?;

        Ok(GetPromptResult {
            description: Some(format!("OpenSSF Scorecard results for {package_name}")),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, payload)],
        })
    }
}

#[tool_handler]
impl ServerHandler for ScorecardServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Security posture lookup: call `OpenSSF-Scorecard` with `package_name` as `owner/repository`, optionally prefixed by `github.com/` or `gitlab.com/`. Results are OpenSSF Scorecard data and are guidance only.".into(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(Self::prompt_catalog()))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        if request.name != SCORECARD_CAPABILITY {
            return Err(McpError::invalid_params(
                format!("unknown prompt '{}'", request.name),
                None,
            ));
        }
        self.scorecard_prompt(request.arguments.as_ref()).await
    }
}

/// The tool schema defaults `package_name` to `""`; only that default counts as absent.
/// Anything else, blank or not, is left to normalization.
fn tool_package_name(package_name: &str) -> Result<&str, McpError> {
    if package_name.is_empty() {
        return Err(package_name_required());
    }
    Ok(package_name)
}

fn prompt_package_name(arguments: Option<&JsonObject>) -> Result<&str, McpError> {
    arguments
        .and_then(|args| args.get(PACKAGE_NAME_ARGUMENT))
        .and_then(|value| value.as_str())
        .ok_or_else(package_name_required)
}

fn package_name_required() -> McpError {
    McpError::invalid_params("package_name is required", None)
}

fn mcp_scorecard_error(error: ScorecardError) -> McpError {
    match &error {
        ScorecardError::InvalidPackage { .. } => {
            McpError::new(INVALID_PACKAGE_CODE, error.to_string(), None)
        }
        ScorecardError::Upstream { status, .. } => {
            McpError::new(ErrorCode(i32::from(*status)), error.to_string(), None)
        }
        ScorecardError::Transport { .. } | ScorecardError::InvalidResponse { .. } => {
            McpError::internal_error(error.to_string(), None)
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
