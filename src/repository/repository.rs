//! Repository - typed CRUD over a blocking storage engine session.

use std::marker::PhantomData;

use crate::engine::{Query, ReadMode, StorageEngine};
use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::specification::Specification;

use super::UntrackedRepository;

/// Typed repository for entities of one type.
///
/// Holds a borrowed engine session and nothing else; the caller owns the
/// session. Every mutating call commits before returning, so one call is one
/// unit of work. Engine errors are returned as-is.
pub struct Repository<'a, E, T> {
    engine: &'a E,
    _marker: PhantomData<T>,
}

impl<'a, E: StorageEngine, T: Entity> Repository<'a, E, T> {
    pub fn new(engine: &'a E) -> Self {
        Self {
            engine,
            _marker: PhantomData,
        }
    }

    pub fn engine(&self) -> &'a E {
        self.engine
    }

    /// Get an entity by key and track it. A missing key is `Ok(None)`.
    #[tracing::instrument(level = "debug", skip(self), fields(table = T::TABLE))]
    pub fn get_by_id(&self, id: i64) -> Result<Option<T>, RepositoryError> {
        self.engine.find(id, ReadMode::Tracked)
    }

    /// Every entity of this type.
    #[tracing::instrument(level = "debug", skip(self), fields(table = T::TABLE))]
    pub fn list(&self, read_mode: ReadMode) -> Result<Vec<T>, RepositoryError> {
        self.engine.query(&Query::new(read_mode))
    }

    /// Entities matching the specification's criteria, with its includes
    /// loaded: typed includes first, then string paths, then the filter.
    #[tracing::instrument(level = "debug", skip(self, specification), fields(table = T::TABLE))]
    pub fn list_matching(
        &self,
        specification: &Specification<T>,
        read_mode: ReadMode,
    ) -> Result<Vec<T>, RepositoryError> {
        self.engine
            .query(&Query::from_specification(specification, read_mode))
    }

    /// Entities matching an ad-hoc predicate.
    #[tracing::instrument(level = "debug", skip(self, predicate), fields(table = T::TABLE))]
    pub fn list_where<F>(&self, predicate: F, read_mode: ReadMode) -> Result<Vec<T>, RepositoryError>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        self.engine.query(&Query::new(read_mode).filter(&predicate))
    }

    /// Persist a new entity and return it with its assigned key.
    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE))]
    pub fn add(&self, mut entity: T) -> Result<T, RepositoryError> {
        self.engine.add(&mut entity)?;
        self.engine.commit()?;
        Ok(entity)
    }

    /// Persist a batch in a single commit: all of it or none of it.
    /// Keys are written back into `entities`.
    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, count = entities.len()))]
    pub fn add_range(&self, entities: &mut [T]) -> Result<(), RepositoryError> {
        self.engine.add_range(entities)?;
        self.engine.commit()?;
        Ok(())
    }

    /// Overwrite the stored entity with this key. No existence check: a
    /// missing row surfaces as the engine's concurrency error.
    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, id = entity.id()))]
    pub fn edit(&self, entity: &T) -> Result<(), RepositoryError> {
        self.engine.mark_modified(entity)?;
        self.engine.commit()?;
        Ok(())
    }

    /// Remove the stored entity with this key. Same failure mode as `edit`.
    #[tracing::instrument(level = "debug", skip_all, fields(table = T::TABLE, id = entity.id()))]
    pub fn delete(&self, entity: &T) -> Result<(), RepositoryError> {
        self.engine.remove(entity)?;
        self.engine.commit()?;
        Ok(())
    }
}

/// Extension trait for typed repository access on any StorageEngine.
pub trait RepositoryExt: StorageEngine + Sized {
    /// Get a typed repository.
    fn repository<T: Entity>(&self) -> Repository<'_, Self, T> {
        Repository::new(self)
    }

    /// Get a typed repository whose reads never track.
    fn untracked<T: Entity>(&self) -> UntrackedRepository<'_, Self, T> {
        UntrackedRepository::new(self)
    }
}

impl<E: StorageEngine> RepositoryExt for E {}
