//! InMemorySession - one unit of work over an [`InMemoryDatabase`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace, warn};

use super::database::Tables;
use super::loader::InMemoryLoader;
use super::InMemoryDatabase;
use crate::engine::{Query, ReadMode, StorageEngine};
use crate::entity::{apply_include, check_include, Entity};
use crate::error::RepositoryError;

/// Table name plus key.
pub(crate) type RowKey = (&'static str, i64);

/// Change-tracking state of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Unchanged,
    Added,
    Modified,
    Deleted,
}

/// A staged write waiting for commit.
struct PendingChange {
    key: RowKey,
    state: EntryState,
    bytes: Option<Vec<u8>>,
    /// Tracking state before this change was staged, restored on rollback.
    previous: Option<EntryState>,
}

#[derive(Default)]
struct SessionState {
    entries: HashMap<RowKey, EntryState>,
    pending: Vec<PendingChange>,
}

impl SessionState {
    fn stage(&mut self, key: RowKey, state: EntryState, bytes: Option<Vec<u8>>) {
        if let Some(index) = self.pending.iter().position(|change| change.key == key) {
            let existing = &mut self.pending[index];
            match (existing.state, state) {
                // Deleting something never saved just forgets it.
                (EntryState::Added, EntryState::Deleted) => {
                    let change = self.pending.remove(index);
                    match change.previous {
                        Some(previous) => self.entries.insert(key, previous),
                        None => self.entries.remove(&key),
                    };
                    return;
                }
                (EntryState::Added, _) => existing.bytes = bytes,
                _ => {
                    existing.state = state;
                    existing.bytes = bytes;
                }
            }
            self.entries.insert(key, existing.state);
            return;
        }

        let previous = self.entries.insert(key, state);
        self.pending.push(PendingChange {
            key,
            state,
            bytes,
            previous,
        });
    }

    /// Put every entry touched by `changes` back the way it was.
    fn roll_back(&mut self, changes: Vec<PendingChange>) {
        for change in changes.into_iter().rev() {
            match change.previous {
                Some(previous) => self.entries.insert(change.key, previous),
                None => self.entries.remove(&change.key),
            };
        }
    }

    fn attach(&mut self, keys: impl IntoIterator<Item = RowKey>) {
        for key in keys {
            self.entries.entry(key).or_insert(EntryState::Unchanged);
        }
    }
}

/// A unit of work over an [`InMemoryDatabase`].
///
/// Tracks entities read in [`ReadMode::Tracked`](crate::ReadMode::Tracked)
/// and every staged write. `commit` applies all staged writes or none.
/// Dropping the session discards whatever was not committed.
pub struct InMemorySession {
    database: InMemoryDatabase,
    state: Mutex<SessionState>,
}

impl InMemorySession {
    pub fn new(database: InMemoryDatabase) -> Self {
        Self {
            database,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn database(&self) -> &InMemoryDatabase {
        &self.database
    }

    /// Tracking state of the `T` with this key, if the session knows it.
    pub fn entry_state<T: Entity>(&self, id: i64) -> Result<Option<EntryState>, RepositoryError> {
        Ok(self.lock("tracking read")?.entries.get(&(T::TABLE, id)).copied())
    }

    pub fn is_tracked<T: Entity>(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.entry_state::<T>(id)?.is_some())
    }

    pub fn tracked_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock("tracking read")?.entries.len())
    }

    pub fn has_pending_changes(&self) -> Result<bool, RepositoryError> {
        Ok(!self.lock("tracking read")?.pending.is_empty())
    }

    /// Drop all staged changes and forget every tracked entry.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        let mut state = self.lock("clear")?;
        state.entries.clear();
        state.pending.clear();
        Ok(())
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, SessionState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned(operation))
    }

    fn stage_add<T: Entity>(&self, entity: &mut T) -> Result<(), RepositoryError> {
        // Rejected adds must not move the shared key sequence.
        if entity.is_transient() {
            entity.set_id(self.database.next_key(T::TABLE)?);
        } else {
            Self::ensure_untracked::<T>(&*self.lock("add")?, entity.id())?;
            self.database.reserve_key(T::TABLE, entity.id())?;
        }

        let bytes = serde_json::to_vec(entity)?;
        let mut state = self.lock("add")?;
        Self::ensure_untracked::<T>(&state, entity.id())?;
        state.stage((T::TABLE, entity.id()), EntryState::Added, Some(bytes));
        Ok(())
    }

    fn ensure_untracked<T: Entity>(state: &SessionState, id: i64) -> Result<(), RepositoryError> {
        if state.entries.contains_key(&(T::TABLE, id)) {
            return Err(RepositoryError::AlreadyTracked { table: T::TABLE, id });
        }
        Ok(())
    }

    fn validate(tables: &Tables, changes: &[PendingChange]) -> Result<(), RepositoryError> {
        for change in changes {
            let (table, id) = change.key;
            let exists = tables
                .get(table)
                .is_some_and(|t| t.rows.contains_key(&id));
            match change.state {
                EntryState::Added if exists => {
                    return Err(RepositoryError::DuplicateKey { table, id })
                }
                EntryState::Modified | EntryState::Deleted if !exists => {
                    return Err(RepositoryError::Concurrency { table, id })
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl StorageEngine for InMemorySession {
    fn find<T: Entity>(&self, id: i64, read_mode: ReadMode) -> Result<Option<T>, RepositoryError> {
        let found = {
            let storage = self.database.read("find")?;
            let row = InMemoryLoader::new(&storage).row::<T>(id)?;
            row
        };

        if found.is_some() && read_mode.is_tracked() {
            self.lock("find")?.attach([(T::TABLE, id)]);
        }
        Ok(found)
    }

    fn query<T: Entity>(&self, query: &Query<'_, T>) -> Result<Vec<T>, RepositoryError> {
        for path in query.include_paths() {
            check_include::<T>(path)?;
        }

        let (results, loaded) = {
            let storage = self.database.read("query")?;
            let loader = InMemoryLoader::new(&storage);

            let mut results = Vec::new();
            for mut entity in loader.rows::<T>()? {
                let mark = loader.mark();
                for path in query.include_paths() {
                    apply_include(&mut entity, path, &loader)?;
                }
                if query.matches(&entity) {
                    loader.record(T::TABLE, entity.id());
                    results.push(entity);
                } else {
                    loader.rewind(mark);
                }
            }
            (results, loader.into_loaded())
        };

        trace!(
            database = %self.database.name(),
            table = T::TABLE,
            read_mode = ?query.read_mode(),
            includes = query.include_paths().count(),
            results = results.len(),
            "query"
        );

        if query.read_mode().is_tracked() {
            self.lock("query")?.attach(loaded);
        }
        Ok(results)
    }

    fn add<T: Entity>(&self, entity: &mut T) -> Result<(), RepositoryError> {
        self.stage_add(entity)
    }

    fn add_range<T: Entity>(&self, entities: &mut [T]) -> Result<(), RepositoryError> {
        let staged_before = self.lock("add")?.pending.len();
        for entity in entities.iter_mut() {
            if let Err(err) = self.stage_add(entity) {
                let mut state = self.lock("add")?;
                let staged = state.pending.split_off(staged_before);
                state.roll_back(staged);
                return Err(err);
            }
        }
        Ok(())
    }

    fn remove<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError> {
        self.lock("remove")?
            .stage((T::TABLE, entity.id()), EntryState::Deleted, None);
        Ok(())
    }

    fn mark_modified<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError> {
        let bytes = serde_json::to_vec(entity)?;
        self.lock("modify")?
            .stage((T::TABLE, entity.id()), EntryState::Modified, Some(bytes));
        Ok(())
    }

    fn commit(&self) -> Result<usize, RepositoryError> {
        let mut state = self.lock("commit")?;
        let changes = std::mem::take(&mut state.pending);
        if changes.is_empty() {
            return Ok(0);
        }

        let mut storage = self.database.write("commit")?;
        if let Err(err) = Self::validate(&storage, &changes) {
            warn!(
                database = %self.database.name(),
                changes = changes.len(),
                error = %err,
                "commit rejected, staged changes discarded"
            );
            state.roll_back(changes);
            return Err(err);
        }

        let written = changes.len();
        for change in changes {
            let (table_name, id) = change.key;
            let table = self.database.table_mut(&mut storage, table_name);
            match (change.state, change.bytes) {
                (EntryState::Deleted, _) => {
                    table.rows.remove(&id);
                    state.entries.remove(&change.key);
                }
                (_, Some(bytes)) => {
                    table.rows.insert(id, bytes);
                    state.entries.insert(change.key, EntryState::Unchanged);
                }
                (_, None) => {}
            }
        }

        debug!(database = %self.database.name(), rows = written, "committed");
        Ok(written)
    }
}

#[cfg(feature = "async")]
mod non_blocking {
    use async_trait::async_trait;

    use super::InMemorySession;
    use crate::engine::{AsyncStorageEngine, Query, ReadMode, StorageEngine};
    use crate::entity::Entity;
    use crate::error::RepositoryError;

    /// Work happens in memory under short-lived locks, so each call
    /// completes on first poll.
    #[async_trait]
    impl AsyncStorageEngine for InMemorySession {
        async fn find<T: Entity>(
            &self,
            id: i64,
            read_mode: ReadMode,
        ) -> Result<Option<T>, RepositoryError> {
            StorageEngine::find(self, id, read_mode)
        }

        async fn query<T: Entity>(&self, query: &Query<'_, T>) -> Result<Vec<T>, RepositoryError> {
            StorageEngine::query(self, query)
        }

        async fn add<T: Entity>(&self, entity: &mut T) -> Result<(), RepositoryError> {
            StorageEngine::add(self, entity)
        }

        async fn add_range<T: Entity>(&self, entities: &mut [T]) -> Result<(), RepositoryError> {
            StorageEngine::add_range(self, entities)
        }

        async fn remove<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError> {
            StorageEngine::remove(self, entity)
        }

        async fn mark_modified<T: Entity>(&self, entity: &T) -> Result<(), RepositoryError> {
            StorageEngine::mark_modified(self, entity)
        }

        async fn commit(&self) -> Result<usize, RepositoryError> {
            StorageEngine::commit(self)
        }
    }
}
