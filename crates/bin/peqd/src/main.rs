//! Daemon entry point for the PE percentile query service.
//!
//! Loads configuration from the environment, builds the Supabase-backed
//! query plane, and serves the REST surface with the MCP service mounted
//! under `/mcp`, or the MCP protocol over stdio with `--stdio`.

mod config;

use peq_core::query::PeQueryPlane;
use peq_core::store::SupabaseStore;
use peq_mcp::server::{McpHttpConfig, serve_stdio, streamable_http_service};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::PeqConfig;

const MCP_BASE_PATH: &str = "/mcp";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = PeqConfig::from_args()?;
    let store = SupabaseStore::new(
        &config.supabase_url,
        &config.supabase_key,
        config.request_timeout,
    )?;
    let plane = PeQueryPlane::new(store);

    if config.enable_stdio {
        info!("serving MCP over stdio");
        serve_stdio(plane).await?;
        return Ok(());
    }

    let app = peq_api::build_router(plane.clone(), config.request_timeout).nest_service(
        MCP_BASE_PATH,
        streamable_http_service(plane, McpHttpConfig::default()),
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!("peqd listening on {}", config.listen_addr);
    info!("MCP service mounted at {MCP_BASE_PATH}");
    axum::serve(listener, app).await?;
    Ok(())
}
