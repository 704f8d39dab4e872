use std::borrow::Cow;

use peq_core::query::QueryError;
use rmcp::ErrorData;
use rmcp::model::ErrorCode;

pub(crate) fn map_err(err: QueryError) -> ErrorData {
    match err {
        QueryError::InvalidIdentifier(err) => mcp_err(ErrorCode::INVALID_PARAMS, err.to_string()),
        QueryError::BackendUnavailable(err) => mcp_err(ErrorCode::INTERNAL_ERROR, err.to_string()),
    }
}

fn mcp_err(code: ErrorCode, message: impl Into<Cow<'static, str>>) -> ErrorData {
    ErrorData {
        code,
        message: message.into(),
        data: None,
    }
}
