//! Stock identifier model and backend schema for peq-mcp.
//!
//! This crate defines the canonical stock code format shared by the query
//! plane, the MCP tools, and the REST surface, plus the table layout of the
//! hosted backend.

pub mod models;
pub mod schema;

pub use models::*;
