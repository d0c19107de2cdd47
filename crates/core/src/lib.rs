//! Bazaar Core - shared domain types.
//!
//! Used by:
//! - `api` - the REST server
//! - `cli` - migrations and operator commands
//!
//! The crate holds types only: no I/O, no database access, no HTTP. The
//! optional `postgres` feature adds `sqlx` encoding so the types can be bound
//! and decoded directly.
//!
//! # Modules
//!
//! - [`types`] - typed IDs, email addresses, roles and statuses, pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
