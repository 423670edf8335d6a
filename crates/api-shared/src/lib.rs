//! # API Shared
//!
//! Shared definitions for the triage APIs.
//!
//! Contains:
//! - Wire request/response types (`dto` module) with OpenAPI schemas
//! - Conversions from core allocation results to wire types
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI so both render allocations identically.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
