//! Authentication for administrator accounts.
//!
//! Browser sessions are stateless JWTs carried in a cookie. Passwords are
//! hashed with Argon2id; see [`password`] for parameters.

pub mod current_admin;
pub mod password;
pub mod session;
