//! Base repository trait for database operations.
//!
//! A repository is a data access layer for a postgres table. Each repository
//! borrows a `&mut PgConnection`, so the caller controls whether operations
//! run inside a shared transaction.

use crate::db::errors::Result;

/// Base repository trait providing common database operations.
///
/// Entity-specific queries (bulk status fetches, template fan-out, ...) live
/// as inherent methods on the individual repositories.
#[async_trait::async_trait]
pub trait Repository {
    /// The request type for creating entities
    type CreateRequest;

    /// The response/DTO type returned by operations
    type Response;

    /// The identifier type for lookups
    type Id: Send + Sync;

    /// The filter type for list operations
    type Filter: Send + Sync;

    /// Create a new entity
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response>;

    /// Get an entity by ID
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>>;

    /// List entities matching a filter
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>>;
}
