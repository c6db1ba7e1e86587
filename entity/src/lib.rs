//! Database models shared by the repository contracts and their test fixtures.

pub mod prelude;

pub mod fleet;
pub mod fleet_category;
pub mod user;
