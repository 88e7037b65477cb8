//! Infrastructure layer for external integrations.
//!
//! This layer implements the storage interface defined by the domain layer.
//!
//! - [`persistence`] - PostgreSQL and in-memory record stores

pub mod persistence;
