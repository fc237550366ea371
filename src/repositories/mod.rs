use axum::async_trait;

use crate::error::SearchError;
use crate::models::row::StorageRow;
use crate::repositories::query_builder::SelectQuery;

pub mod memory_repo;
pub mod postgres_repo;
pub mod query_builder;

/// Anything that can answer a restaurant `SELECT`.
///
/// Implementations must be usable from many requests at once; a connection,
/// if any, is held only for the duration of one call.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<StorageRow>, SearchError>;
}
