//! Fake Repository Test Utils
//!
//! Provides fake in-memory repositories for unit tests of code that reads from the database
//! contexts defined in `fakerepo`. A fake repository is seeded with randomly generated records,
//! optionally extended with records whose properties a test pins to specific values, and then
//! finalized into the mocked repository for a database context.
//!
//! # Overview
//!
//! The test utilities consist of these components:
//! - **FakeRepositoryBuilder**: Fluent builder that owns the record list and finalizes it into
//!   per-context mock repositories
//! - **Generator**: Random value and record generation with a configurable circular reference
//!   policy
//! - **Record / FieldTable / Overrides**: Typed property setters used to pin values on added
//!   records
//! - **ContextCache / Accessor**: Mock repositories created so far, one per database context
//! - **FakeConfig**: Construction settings, optionally read from the environment
//! - **TestError**: Error types that can occur while building or finalizing
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::FakeRepositoryBuilder;
//! use fakerepo::Repository;
//! use entity::user;
//!
//! #[test]
//! fn finds_admins() -> Result<(), TestError> {
//!     let mut repo = FakeRepositoryBuilder::<user::Model>::new()?;
//!     repo.add_with("admin", true)?;
//!
//!     let users = repo.primary()?;
//!     assert!(users.get().iter().any(|u| u.admin));
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod generator;
pub mod record;

pub use builder::FakeRepositoryBuilder;
pub use config::FakeConfig;
pub use error::TestError;
pub use record::{Overrides, Record};
