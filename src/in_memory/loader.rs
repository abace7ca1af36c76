use std::cell::RefCell;

use super::database::Tables;
use super::session::RowKey;
use crate::entity::{apply_include, Entity, NavigationLoader};
use crate::error::RepositoryError;

/// Reads rows out of a held storage guard and resolves include paths.
///
/// Records every row it materializes so tracked reads can attach them.
pub(crate) struct InMemoryLoader<'s> {
    tables: &'s Tables,
    loaded: RefCell<Vec<RowKey>>,
}

impl<'s> InMemoryLoader<'s> {
    pub(crate) fn new(tables: &'s Tables) -> Self {
        Self {
            tables,
            loaded: RefCell::new(Vec::new()),
        }
    }

    /// Every row of `T`, ascending by key, without includes.
    pub(crate) fn rows<T: Entity>(&self) -> Result<Vec<T>, RepositoryError> {
        let Some(table) = self.tables.get(T::TABLE) else {
            return Ok(Vec::new());
        };
        table
            .rows
            .values()
            .map(|bytes| serde_json::from_slice(bytes).map_err(RepositoryError::from))
            .collect()
    }

    pub(crate) fn row<T: Entity>(&self, id: i64) -> Result<Option<T>, RepositoryError> {
        self.tables
            .get(T::TABLE)
            .and_then(|table| table.rows.get(&id))
            .map(|bytes| serde_json::from_slice(bytes).map_err(RepositoryError::from))
            .transpose()
    }

    pub(crate) fn record(&self, table: &'static str, id: i64) {
        self.loaded.borrow_mut().push((table, id));
    }

    pub(crate) fn mark(&self) -> usize {
        self.loaded.borrow().len()
    }

    /// Forget rows recorded since `mark`, e.g. related data of a filtered-out root.
    pub(crate) fn rewind(&self, mark: usize) {
        self.loaded.borrow_mut().truncate(mark);
    }

    /// Rows materialized so far, roots and related alike.
    pub(crate) fn into_loaded(self) -> Vec<RowKey> {
        self.loaded.into_inner()
    }

    fn finish<R: Entity>(&self, related: &mut R, rest: Option<&str>) -> Result<(), RepositoryError> {
        if let Some(rest) = rest {
            apply_include(related, rest, self)?;
        }
        self.record(R::TABLE, related.id());
        Ok(())
    }
}

impl NavigationLoader for InMemoryLoader<'_> {
    fn reference<R: Entity>(
        &self,
        id: i64,
        rest: Option<&str>,
    ) -> Result<Option<R>, RepositoryError> {
        let Some(mut related) = self.row::<R>(id)? else {
            return Ok(None);
        };
        self.finish(&mut related, rest)?;
        Ok(Some(related))
    }

    fn collection<R: Entity>(
        &self,
        predicate: &dyn Fn(&R) -> bool,
        rest: Option<&str>,
    ) -> Result<Vec<R>, RepositoryError> {
        let mut related: Vec<R> = self.rows::<R>()?.into_iter().filter(|r| predicate(r)).collect();
        for entity in related.iter_mut() {
            self.finish(entity, rest)?;
        }
        Ok(related)
    }
}
