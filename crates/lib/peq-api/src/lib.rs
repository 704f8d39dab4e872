//! REST query surface for the PE percentile service.
//!
//! Provides the liveness probe, the endpoint index, and the percentile
//! lookup endpoints over the query plane.

use std::time::Duration;

use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use peq_core::query::{PeHistory, PeQueryPlane, PeSnapshot, QueryError};
use serde::Serialize;

#[derive(Clone)]
struct AppState {
    plane: PeQueryPlane,
    request_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: "backend query timed out".to_string(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InvalidIdentifier(invalid) => Self::bad_request(invalid.to_string()),
            QueryError::BackendUnavailable(store_err) => Self::bad_gateway(store_err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse { error: self.message });
        (self.status, payload).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Payload describing the deployed service surface, served at `/docs`.
#[derive(Debug, Serialize)]
struct ApiIndex {
    service: &'static str,
    endpoints: Vec<&'static str>,
    stock_code_formats: Vec<&'static str>,
}

impl Default for ApiIndex {
    fn default() -> Self {
        Self {
            service: "peq-mcp",
            endpoints: vec![
                "GET / - liveness probe",
                "GET /docs - this index",
                "GET /pe/{code} - current trailing three-year PE percentile",
                "GET /pe/{code}/history - dated percentile series for the trailing three-year window",
                "POST /mcp - MCP streamable HTTP endpoint",
            ],
            stock_code_formats: vec!["600519.SH", "sh600519"],
        }
    }
}

/// Builds the REST router for the service.
///
/// `request_timeout` bounds each backend query; lookups that exceed it
/// answer 504.
#[must_use]
pub fn build_router(plane: PeQueryPlane, request_timeout: Duration) -> Router {
    let state = AppState {
        plane,
        request_timeout,
    };
    Router::new()
        .route("/", get(health))
        .route("/docs", get(docs_index))
        .route("/pe/:code", get(pe_snapshot))
        .route("/pe/:code/history", get(pe_history))
        .with_state(state)
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}

async fn docs_index() -> Json<ApiIndex> {
    Json(ApiIndex::default())
}

async fn pe_snapshot(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PeSnapshot>, ApiError> {
    let snapshot = tokio::time::timeout(state.request_timeout, state.plane.pe_snapshot(&code))
        .await
        .map_err(|_| ApiError::timeout())??;
    snapshot.map_or_else(
        || Err(ApiError::not_found(format!("no stock found for code {code}"))),
        |snapshot| Ok(Json(snapshot)),
    )
}

async fn pe_history(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PeHistory>, ApiError> {
    let history = tokio::time::timeout(state.request_timeout, state.plane.pe_history(&code))
        .await
        .map_err(|_| ApiError::timeout())??;
    Ok(Json(history))
}
