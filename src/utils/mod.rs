//! Utility functions shared across layers.
//!
//! - [`slug_generator`] - Candidate slug generation and slug shape checks
//! - [`redirect_target`] - Header safety of stored targets

pub mod redirect_target;
pub mod slug_generator;
