//! HTTP API layer for request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts. It holds no business logic.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Rate limiting and request tracing
//! - [`routes`] - Route configuration and composition

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
