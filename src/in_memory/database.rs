//! InMemoryDatabase - HashMap-backed row store shared by in-memory sessions.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{InMemoryConfig, InMemorySession};
use crate::entity::Entity;
use crate::error::RepositoryError;

/// One table: serialized rows ordered by key, plus its key sequence.
pub(crate) struct Table {
    pub(crate) rows: BTreeMap<i64, Vec<u8>>,
    /// `None` once `i64::MAX` has been handed out or reserved.
    next_key: Option<i64>,
}

impl Table {
    fn new(first_key: i64) -> Self {
        Self {
            rows: BTreeMap::new(),
            next_key: Some(first_key),
        }
    }
}

pub(crate) type Tables = HashMap<&'static str, Table>;

/// In-memory database: tables of serde_json row snapshots.
///
/// Clone-friendly via Arc; clones share storage, so a clone handed to a
/// second session sees everything the first one committed.
#[derive(Clone)]
pub struct InMemoryDatabase {
    config: Arc<InMemoryConfig>,
    storage: Arc<RwLock<Tables>>,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatabase {
    /// Create a new empty database with default settings.
    pub fn new() -> Self {
        Self::from_valid_config(InMemoryConfig::default())
    }

    pub fn with_config(config: InMemoryConfig) -> Result<Self, RepositoryError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: InMemoryConfig) -> Self {
        Self {
            config: Arc::new(config),
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Open a new unit of work over this database.
    pub fn session(&self) -> InMemorySession {
        InMemorySession::new(self.clone())
    }

    /// Number of committed rows of `T`.
    pub fn count<T: Entity>(&self) -> Result<usize, RepositoryError> {
        let storage = self.read("count")?;
        Ok(storage.get(T::TABLE).map_or(0, |table| table.rows.len()))
    }

    /// Hand out the next key for `table`.
    pub(crate) fn next_key(&self, table_name: &'static str) -> Result<i64, RepositoryError> {
        let first_key = self.config.first_key;
        let mut storage = self.write("key generation")?;
        let table = storage
            .entry(table_name)
            .or_insert_with(|| Table::new(first_key));
        let key = table
            .next_key
            .ok_or(RepositoryError::KeySpaceExhausted { table: table_name })?;
        table.next_key = key.checked_add(1);
        Ok(key)
    }

    /// Move the key sequence past an explicitly chosen key.
    pub(crate) fn reserve_key(&self, table: &'static str, key: i64) -> Result<(), RepositoryError> {
        let first_key = self.config.first_key;
        let mut storage = self.write("key generation")?;
        let table = storage.entry(table).or_insert_with(|| Table::new(first_key));
        if let Some(next_key) = table.next_key {
            if key >= next_key {
                table.next_key = key.checked_add(1);
            }
        }
        Ok(())
    }

    /// Get or create `table` inside a held write guard.
    pub(crate) fn table_mut<'g>(&self, storage: &'g mut Tables, table: &'static str) -> &'g mut Table {
        let first_key = self.config.first_key;
        storage.entry(table).or_insert_with(|| Table::new(first_key))
    }

    pub(crate) fn read(
        &self,
        operation: &'static str,
    ) -> Result<RwLockReadGuard<'_, Tables>, RepositoryError> {
        self.storage
            .read()
            .map_err(|_| RepositoryError::LockPoisoned(operation))
    }

    pub(crate) fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, Tables>, RepositoryError> {
        self.storage
            .write()
            .map_err(|_| RepositoryError::LockPoisoned(operation))
    }
}
