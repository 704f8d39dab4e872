use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::PeqMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        Self {
            commands: vec![
                "help - List the MCP commands this server exposes."
                    .to_string(),
                "usage_guide - Supported stock code spellings with example queries."
                    .to_string(),
                "get_pe_percentile - Current trailing three-year PE percentile for a stock, as text."
                    .to_string(),
                "get_pe_percentile_history - Dated PE percentile series over the trailing three-year window."
                    .to_string(),
                "health - Liveness check, returns 'ok'."
                    .to_string(),
            ],
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl PeqMcp {
    #[tool(description = "List the MCP commands this server exposes.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }

    #[tool(description = "Supported stock code spellings with example queries.")]
    async fn usage_guide(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
r"Welcome to the PE percentile query tool.

Supported stock code spellings:
1. Six digits plus exchange suffix: '600739.SH', '301011.SZ'
2. Exchange prefix plus six digits: 'sh600739', 'sz301011'

Example queries:
- Xinhua Department Store: 'sh600739' or '600739.SH'
- Huali New Materials: 'sz301011' or '301011.SZ'

Both spellings resolve to the same stock. `get_pe_percentile` answers with
the current trailing three-year percentile; `get_pe_percentile_history`
returns the dated series for the same window, oldest point first.",
        )]))
    }
}
