//! AsyncRepository - the non-blocking twin of [`Repository`](super::Repository).

use std::marker::PhantomData;

use crate::engine::{AsyncStorageEngine, Query, ReadMode};
use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::specification::Specification;

/// Typed repository over an [`AsyncStorageEngine`].
///
/// Same operations and semantics as `Repository`; each call awaits the
/// engine and adds no concurrency of its own.
pub struct AsyncRepository<'a, E, T> {
    engine: &'a E,
    _marker: PhantomData<T>,
}

impl<'a, E: AsyncStorageEngine, T: Entity> AsyncRepository<'a, E, T> {
    pub fn new(engine: &'a E) -> Self {
        Self {
            engine,
            _marker: PhantomData,
        }
    }

    pub fn engine(&self) -> &'a E {
        self.engine
    }

    #[tracing::instrument(level = "debug", skip(self), fields(table = T::TABLE))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<T>, RepositoryError> {
        self.engine.find(id, ReadMode::Tracked).await
    }

    #[tracing::instrument(level = "debug", skip(self), fields(table = T::TABLE))]
    pub async fn list(&self, read_mode: ReadMode) -> Result<Vec<T>, RepositoryError> {
        self.engine.query(&Query::new(read_mode)).await
    }

    #[tracing::instrument(level = "debug", skip(self, specification), fields(table = T::TABLE))]
    pub async fn list_matching(
        &self,
        specification: &Specification<T>,
        read_mode: ReadMode,
    ) -> Result<Vec<T>, RepositoryError> {
        let query = Query::from_specification(specification, read_mode);
        self.engine.query(&query).await
    }

    #[tracing::instrument(level = "debug", skip(self, predicate), fields(table = T::TABLE))]
    pub async fn list_where<F>(
        &self,
        predicate: F,
        read_mode: ReadMode,
    ) -> Result<Vec<T>, RepositoryError>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        let query = Query::new(read_mode).filter(&predicate);
        self.engine.query(&query).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE))]
    pub async fn add(&self, mut entity: T) -> Result<T, RepositoryError> {
        self.engine.add(&mut entity).await?;
        self.engine.commit().await?;
        Ok(entity)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, count = entities.len()))]
    pub async fn add_range(&self, entities: &mut [T]) -> Result<(), RepositoryError> {
        self.engine.add_range(entities).await?;
        self.engine.commit().await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, id = entity.id()))]
    pub async fn edit(&self, entity: &T) -> Result<(), RepositoryError> {
        self.engine.mark_modified(entity).await?;
        self.engine.commit().await?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, id = entity.id()))]
    pub async fn delete(&self, entity: &T) -> Result<(), RepositoryError> {
        self.engine.remove(entity).await?;
        self.engine.commit().await?;
        Ok(())
    }
}

/// Extension trait for typed repository access on any AsyncStorageEngine.
pub trait AsyncRepositoryExt: AsyncStorageEngine + Sized {
    fn async_repository<T: Entity>(&self) -> AsyncRepository<'_, Self, T> {
        AsyncRepository::new(self)
    }
}

impl<E: AsyncStorageEngine> AsyncRepositoryExt for E {}
