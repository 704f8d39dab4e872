//! Store interfaces and the Supabase `PostgREST` implementation.
//!
//! The store layer reads the PE valuation tables maintained by the hosted
//! backend; nothing in this service writes to them.

pub mod supabase;

pub use supabase::{StoreError, StoreResult, SupabaseStore};
