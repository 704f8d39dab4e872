//! MCP server runners for the PE percentile service.

use std::sync::Arc;
use std::time::Duration;

use peq_core::query::PeQueryPlane;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};

use crate::PeqMcp;

/// Configuration for the MCP streamable HTTP service.
#[derive(Debug, Clone)]
pub struct McpHttpConfig {
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
    pub sse_retry: Option<Duration>,
}

impl McpHttpConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
            sse_retry: Some(Duration::from_secs(3)),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }

    #[must_use]
    pub const fn with_sse_keep_alive(mut self, sse_keep_alive: Option<Duration>) -> Self {
        self.sse_keep_alive = sse_keep_alive;
        self
    }

    #[must_use]
    pub const fn with_sse_retry(mut self, sse_retry: Option<Duration>) -> Self {
        self.sse_retry = sse_retry;
        self
    }
}

impl Default for McpHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    plane: PeQueryPlane,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = PeqMcp::new(plane);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Builds the streamable HTTP service for mounting under an axum router.
///
/// The caller owns the listener; this keeps the MCP surface and the REST
/// surface on one port.
#[must_use]
pub fn streamable_http_service(
    plane: PeQueryPlane,
    config: McpHttpConfig,
) -> StreamableHttpService<PeqMcp, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(PeqMcp::new(plane.clone())),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: config.sse_keep_alive,
            sse_retry: config.sse_retry,
            stateful_mode: config.stateful_mode,
            ..Default::default()
        },
    )
}
