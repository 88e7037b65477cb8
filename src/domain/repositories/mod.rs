//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod record_store;

pub use record_store::RecordStore;

#[cfg(test)]
pub use record_store::MockRecordStore;
