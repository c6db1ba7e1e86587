//! Data-access contracts for the database contexts.
//!
//! Code under test depends on the per-context repository traits defined here rather than on a
//! concrete database connection. The `mock` feature adds `mockall` generated mock types for
//! every context so test helpers can stand in for a real data layer.

pub mod context;
pub mod error;
pub mod repository;

pub use context::DbContext;
pub use error::ContextError;
pub use repository::{AnalyticsRepository, AuditRepository, PrimaryRepository, Repository};
