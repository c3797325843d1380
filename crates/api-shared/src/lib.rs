//! # API Shared
//!
//! Shared definitions for the placement locator APIs.
//!
//! Contains:
//! - Wire types (`dto` module) with serde and OpenAPI schema derives
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI for common functionality.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
