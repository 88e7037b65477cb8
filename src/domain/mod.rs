//! Domain layer containing business entities and logic.
//!
//! The domain layer has no dependencies on the HTTP layer or on a concrete
//! storage backend.
//!
//! - [`entities`] - URL records and their stats projection
//! - [`repositories`] - Storage contract ([`repositories::RecordStore`])
//! - [`allocation_policy`] - Candidate lengths and retry budget for slug allocation
//! - [`errors`] - Store error taxonomy

pub mod allocation_policy;
pub mod entities;
pub mod errors;
pub mod repositories;
