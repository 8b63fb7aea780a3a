//! rmcp server handler
//!
//! Routes tool calls through the tool table onto [`MevzuatService`].

use super::tools::{ArticleContentParams, ContentParams, ToolKind, all_tools, find_tool};
use super::validation::ErrorContext;
use crate::errors::{ErrorKind, MevzuatError, MevzuatResult};
use crate::query::{SearchParams, SearchWithinParams, UnifiedSearchParams};
use crate::service::MevzuatService;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    transport::stdio,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

const INSTRUCTIONS: &str = "Turkish legislation search (mevzuat.gov.tr). \
    Use search_<type> to find documents of one type and search_within_<type> \
    to rank the articles of a found document. search_mevzuat and \
    get_mevzuat_content search and read across all types; \
    get_mevzuat_article_tree and get_mevzuat_article_content read one article at a time.";

/// MCP server exposing the legislation tools
#[derive(Clone)]
pub struct MevzuatServer {
    service: MevzuatService,
}

impl MevzuatServer {
    #[must_use]
    pub fn new(service: MevzuatService) -> Self {
        Self { service }
    }

    #[must_use]
    pub fn service(&self) -> &MevzuatService {
        &self.service
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        info!("Starting stdio MCP server");
        let running = self.serve(stdio()).await.inspect_err(|e| {
            error!("serving error: {e:?}");
        })?;
        running.waiting().await?;
        info!("Stdio MCP server stopped");
        Ok(())
    }

    /// Run one tool call by name
    ///
    /// Unknown tools, malformed arguments and invalid parameter values are
    /// protocol errors. Every other failure is a tool result flagged as an
    /// error, so the model sees the explanation.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> Result<CallToolResult, McpError> {
        let kind = find_tool(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {name}"), None))?;
        let args = Value::Object(arguments.unwrap_or_default());

        debug!(tool = name, "Dispatching tool call");
        let outcome = match kind {
            ToolKind::Search(doc_type) => {
                let params: SearchParams = parse_args(name, args)?;
                to_json(self.service.search(doc_type, &params).await)
            }
            ToolKind::SearchWithin(doc_type) => {
                let params: SearchWithinParams = parse_args(name, args)?;
                to_json(self.service.search_within(doc_type, &params).await)
            }
            ToolKind::UnifiedSearch => {
                let params: UnifiedSearchParams = parse_args(name, args)?;
                to_json(self.service.unified_search(&params).await)
            }
            ToolKind::UnifiedContent => {
                let params: ContentParams = parse_args(name, args)?;
                to_json(self.service.unified_content(&params.document_id).await)
            }
            ToolKind::ArticleTree => {
                let params: ContentParams = parse_args(name, args)?;
                to_json(self.service.article_tree(&params.document_id).await)
            }
            ToolKind::ArticleContent => {
                let params: ArticleContentParams = parse_args(name, args)?;
                to_json(
                    self.service
                        .article_content(&params.article_id, &params.document_id)
                        .await,
                )
            }
        };

        match outcome {
            Ok(payload) => Ok(CallToolResult::structured(payload)),
            Err(e) if e.kind() == ErrorKind::InvalidParameter => {
                debug!(tool = name, error = %e, "Rejected tool arguments");
                Err(McpError::invalid_params(e.to_string(), None))
            }
            Err(e) => {
                warn!(tool = name, error = %e, "Tool call failed");
                Ok(CallToolResult::error(vec![Content::text(
                    ErrorContext::for_error(name, &e).build(),
                )]))
            }
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, McpError> {
    serde_json::from_value(args)
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments for {tool}: {e}"), None))
}

fn to_json<T: Serialize>(result: MevzuatResult<T>) -> MevzuatResult<Value> {
    let value = result?;
    serde_json::to_value(value)
        .map_err(|e| MevzuatError::extraction("serialize_result", e.to_string()))
}

impl ServerHandler for MevzuatServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools: Vec<_> = all_tools().map(ToolKind::to_tool).collect();
        debug!("Serving {} tools", tools.len());
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments).await
    }
}
