use peq_core::query::{PeSnapshot, QueryError};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{PeqMcp, helpers};

/// Parameters for percentile lookups.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PeQueryParams {
    /// Stock code in '600519.SH' or 'sh600519' spelling.
    pub stock_code: String,
}

#[tool_router(router = tool_router_query, vis = "pub")]
impl PeqMcp {
    #[tool(
        description = "Look up a stock's current trailing three-year PE percentile. Accepts '600519.SH' or 'sh600519' style codes and answers in plain text."
    )]
    async fn get_pe_percentile(
        &self,
        Parameters(params): Parameters<PeQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        match self.plane().pe_snapshot(&params.stock_code).await {
            Ok(snapshot) => Ok(CallToolResult::success(vec![Content::text(
                describe_snapshot(&params.stock_code, snapshot.as_ref()),
            )])),
            Err(QueryError::InvalidIdentifier(err)) => {
                Ok(CallToolResult::success(vec![Content::text(err.to_string())]))
            }
            Err(err) => Err(helpers::map_err(err)),
        }
    }

    #[tool(
        description = "Fetch a stock's dated PE percentile series over the trailing three-year window, oldest point first."
    )]
    async fn get_pe_percentile_history(
        &self,
        Parameters(params): Parameters<PeQueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let history = self
            .plane()
            .pe_history(&params.stock_code)
            .await
            .map_err(helpers::map_err)?;
        Ok(CallToolResult::success(vec![Content::json(history)?]))
    }
}

fn describe_snapshot(requested: &str, snapshot: Option<&PeSnapshot>) -> String {
    match snapshot {
        None => format!("No stock found for code {requested}"),
        Some(snapshot) => match snapshot.pe_percentile_3y {
            None => format!("PE percentile data is not available for stock {requested}"),
            Some(value) => {
                format!("Stock {requested} trailing three-year PE percentile: {value:.4}")
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(value: Option<f64>) -> PeSnapshot {
        PeSnapshot {
            stock_code: "sh600519".to_string(),
            pe_percentile_3y: value,
        }
    }

    #[test]
    fn unknown_stocks_read_as_not_found() {
        let text = describe_snapshot("sh999999", None);
        assert_eq!(text, "No stock found for code sh999999");
    }

    #[test]
    fn missing_percentiles_read_as_unavailable() {
        let text = describe_snapshot("sh600519", Some(&snapshot(None)));
        assert!(text.contains("not available"), "got: {text}");
    }

    #[test]
    fn percentiles_render_with_four_decimals() {
        let text = describe_snapshot("600519.SH", Some(&snapshot(Some(0.5))));
        assert!(text.ends_with("0.5000"), "got: {text}");
        assert!(text.contains("600519.SH"));
    }
}
