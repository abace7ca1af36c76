//! StorageEngine - the persistence collaborator repositories delegate to.
//!
//! An engine session owns change tracking and the unit of work. Staging
//! methods (`add`, `remove`, `mark_modified`) only record intent; nothing
//! reaches the store until `commit`.

#[cfg(feature = "async")]
mod async_engine;
mod query;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::RepositoryError;

#[cfg(feature = "async")]
pub use async_engine::AsyncStorageEngine;
pub use query::Query;

/// Whether a read attaches the returned entities to the session's
/// change-tracking set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    Tracked,
    Untracked,
}

impl ReadMode {
    pub fn is_tracked(self) -> bool {
        matches!(self, ReadMode::Tracked)
    }
}

/// Blocking storage engine session.
///
/// Methods that would collide with repository operations use engine-level
/// names (`find`, `query`, `remove`, `mark_modified`).
pub trait StorageEngine: Send + Sync {
    /// Look up one entity by key. Returns None if not found.
    fn find<T: Entity>(&self, id: i64, read_mode: ReadMode) -> Result<Option<T>, RepositoryError>;

    /// Run a composed query: includes in order, then the filter.
    fn query<T: Entity>(&self, query: &Query<'_, T>) -> Result<Vec<T>, RepositoryError>;

    /// Stage a new entity. Transient entities are assigned a key here.
    fn add<T: Entity>(&self, entity: &mut T) -> Result<(), RepositoryError>;

    /// Stage several new entities.
    fn add_range<T: Entity>(&self, entities: &mut [T]) -> Result<(), RepositoryError>;

    /// Stage removal of the entity with this key.
    fn remove<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError>;

    /// Stage a full overwrite of the entity with this key.
    fn mark_modified<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError>;

    /// Persist all staged changes atomically. Returns the number of rows
    /// written. Fails with [`RepositoryError::Concurrency`] when a modify or
    /// remove targets a row that does not exist.
    fn commit(&self) -> Result<usize, RepositoryError>;
}
