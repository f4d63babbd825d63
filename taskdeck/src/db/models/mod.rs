//! Database record structures matching table schemas.

pub mod admins;
pub mod statuses;
pub mod tasks;
pub mod users;
