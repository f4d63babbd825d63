//! API request and response types.

pub mod admins;
pub mod auth;
pub mod dashboard;
pub mod reports;
pub mod statuses;
pub mod tasks;
pub mod users;
