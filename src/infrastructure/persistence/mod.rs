//! Record store implementations.
//!
//! - [`PgRecordStore`] - PostgreSQL storage via SQLx
//! - [`MemoryRecordStore`] - in-process storage for single-node deployments and tests
//!
//! Both uphold the [`RecordStore`](crate::domain::repositories::RecordStore)
//! atomicity contract.

pub mod memory_record_store;
pub mod pg_record_store;

pub use memory_record_store::MemoryRecordStore;
pub use pg_record_store::PgRecordStore;
