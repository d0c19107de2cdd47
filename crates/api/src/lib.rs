//! Bazaar API - REST backend for a small e-commerce shop.
//!
//! # Architecture
//!
//! - `routes` parse HTTP input and render the JSON envelope
//! - `services` apply business rules
//! - `db` repositories issue SQL through `sqlx`
//!
//! Authentication uses short-lived HS256 access tokens and single-use refresh
//! tokens stored as SHA-256 digests. Passwords are hashed with bcrypt.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

pub use app::build_router;
pub use config::ApiConfig;
pub use error::AppError;
pub use state::AppState;
