//! Core data models for the product catalog.
//!
//! Database-backed entities map to SQLite rows via `sqlx::FromRow` and
//! serialize as JSON via `serde`. Upload types are transient and live for a
//! single request.

pub mod product;
pub mod upload;
pub mod user;
