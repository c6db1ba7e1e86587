//! Record implementations for the entity models.
//!
//! Each module makes one entity usable with
//! [`FakeRepositoryBuilder`](crate::builder::FakeRepositoryBuilder): it lists every column as an
//! overridable property and generates random values for all of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::builder::FakeRepositoryBuilder;
//! use test_utils::record::Overrides;
//! use entity::fleet;
//!
//! let mut fleets = FakeRepositoryBuilder::<fleet::Model>::with_options(false, 0)?;
//! fleets.add(
//!     Overrides::new()
//!         .with("name", "Home Defense")
//!         .with("hidden", true),
//! )?;
//! ```

pub mod fleet;
pub mod fleet_category;
pub mod user;
