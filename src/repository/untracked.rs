use crate::engine::{ReadMode, StorageEngine};
use crate::entity::Entity;
use crate::error::RepositoryError;
use crate::specification::Specification;

use super::Repository;

/// A [`Repository`] whose reads never track, `get_by_id` included.
///
/// For read-heavy call sites. Writes behave exactly like `Repository`.
pub struct UntrackedRepository<'a, E, T> {
    inner: Repository<'a, E, T>,
}

impl<'a, E: StorageEngine, T: Entity> UntrackedRepository<'a, E, T> {
    pub fn new(engine: &'a E) -> Self {
        Self {
            inner: Repository::new(engine),
        }
    }

    #[tracing::instrument(level = "debug", skip(self), fields(table = T::TABLE))]
    pub fn get_by_id(&self, id: i64) -> Result<Option<T>, RepositoryError> {
        self.inner.engine().find(id, ReadMode::Untracked)
    }

    pub fn list(&self) -> Result<Vec<T>, RepositoryError> {
        self.inner.list(ReadMode::Untracked)
    }

    pub fn list_matching(&self, specification: &Specification<T>) -> Result<Vec<T>, RepositoryError> {
        self.inner.list_matching(specification, ReadMode::Untracked)
    }

    pub fn list_where<F>(&self, predicate: F) -> Result<Vec<T>, RepositoryError>
    where
        F: Fn(&T) -> bool + Send + Sync,
    {
        self.inner.list_where(predicate, ReadMode::Untracked)
    }

    pub fn add(&self, entity: T) -> Result<T, RepositoryError> {
        self.inner.add(entity)
    }

    pub fn add_range(&self, entities: &mut [T]) -> Result<(), RepositoryError> {
        self.inner.add_range(entities)
    }

    pub fn edit(&self, entity: &T) -> Result<(), RepositoryError> {
        self.inner.edit(entity)
    }

    pub fn delete(&self, entity: &T) -> Result<(), RepositoryError> {
        self.inner.delete(entity)
    }
}
