//! Core query plane for the PE percentile service.
//!
//! This crate owns the read-only Supabase client and the control-plane
//! helpers that turn raw stock codes into windowed percentile lookups.

pub mod query;
pub mod store;
