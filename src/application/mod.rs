//! Application layer services implementing business logic.
//!
//! Services consume the [`RecordStore`](crate::domain::repositories::RecordStore)
//! trait and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::AllocationService`] - Unique slug allocation with collision retry
//! - [`services::RedirectService`] - Slug resolution with click accounting
//! - [`services::StatsService`] - Read-only record statistics

pub mod services;
