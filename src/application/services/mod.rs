//! Business logic services for the application layer.

pub mod allocation_service;
pub mod redirect_service;
pub mod stats_service;

pub use allocation_service::AllocationService;
pub use redirect_service::RedirectService;
pub use stats_service::StatsService;
