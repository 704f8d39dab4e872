//! MCP tool modules.
//!
//! Tools are grouped by domain: percentile queries and contextual help for
//! stock code formats.

pub mod query;
mod context;
