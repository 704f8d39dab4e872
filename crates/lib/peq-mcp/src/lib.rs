//! MCP server implementation for the PE percentile service.
//!
//! This crate wires the query plane into rmcp tool handlers and exposes the
//! MCP-facing API surface for valuation lookups.

mod helpers;
mod tools;
pub mod server;

use peq_core::query::PeQueryPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

const SERVER_INSTRUCTIONS: &str = r"peq-mcp provides MCP tools for querying A-share PE valuation percentiles.

Workflow:
1. Call `get_pe_percentile` with a stock code to read the stock's current
   trailing three-year PE percentile as a short text answer.
2. Call `get_pe_percentile_history` with the same code for the dated series
   over the trailing three-year window, oldest point first.

Notes:
- Stock codes are accepted in two spellings: '600519.SH' (six digits plus
  exchange suffix) or 'sh600519' (exchange prefix). Both resolve to the same
  stock; only the Shanghai and Shenzhen exchanges are recognized.
- A valid code the backend has never seen yields a not-found answer, not a
  protocol error.
- Use `usage_guide` for example queries and `help` for the command list.
- `health` returns 'ok'.";

/// MCP server wrapper around the query plane and tool routers.
#[derive(Clone)]
pub struct PeqMcp {
    tool_router: ToolRouter<Self>,
    plane: PeQueryPlane,
}

impl PeqMcp {
    /// Creates a new server on top of a query plane.
    #[must_use]
    pub fn new(plane: PeQueryPlane) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_query()
            + Self::tool_router_context();
        Self { tool_router, plane }
    }

    pub(crate) const fn plane(&self) -> &PeQueryPlane {
        &self.plane
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl PeqMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for PeqMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
