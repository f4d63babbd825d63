//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL,
//! following the repository pattern: each table has a repository in
//! [`handlers`] that encapsulates its queries, operating on record types
//! from [`models`].
//!
//! Repositories take a `&mut PgConnection`, so callers decide the
//! transaction scope: create repositories from a transaction when several
//! operations must commit together, or from a pool connection for
//! single-statement reads.
//!
//! Migrations live in the crate's `migrations/` directory and are embedded
//! via [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
