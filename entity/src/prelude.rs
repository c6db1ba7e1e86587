pub use super::fleet::Entity as Fleet;
pub use super::fleet_category::Entity as FleetCategory;
pub use super::user::Entity as User;
