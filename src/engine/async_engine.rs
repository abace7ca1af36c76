use async_trait::async_trait;

use super::{Query, ReadMode};
use crate::entity::Entity;
use crate::error::RepositoryError;

/// Non-blocking counterpart of [`StorageEngine`](super::StorageEngine).
///
/// Same contract, method for method; callers suspend at each await.
#[async_trait]
pub trait AsyncStorageEngine: Send + Sync {
    async fn find<T: Entity>(
        &self,
        id: i64,
        read_mode: ReadMode,
    ) -> Result<Option<T>, RepositoryError>;

    async fn query<T: Entity>(&self, query: &Query<'_, T>) -> Result<Vec<T>, RepositoryError>;

    async fn add<T: Entity>(&self, entity: &mut T) -> Result<(), RepositoryError>;

    async fn add_range<T: Entity>(&self, entities: &mut [T]) -> Result<(), RepositoryError>;

    async fn remove<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError>;

    async fn mark_modified<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError>;

    async fn commit(&self) -> Result<usize, RepositoryError>;
}
