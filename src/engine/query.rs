use std::borrow::Cow;
use std::fmt;

use super::ReadMode;
use crate::specification::{Include, Specification};

/// A composed read: read mode, ordered include paths and an optional filter.
///
/// Borrowed for the duration of one engine call.
pub struct Query<'q, T> {
    read_mode: ReadMode,
    includes: Vec<Cow<'q, str>>,
    filter: Option<&'q (dyn Fn(&T) -> bool + Send + Sync)>,
}

impl<'q, T> Query<'q, T> {
    pub fn new(read_mode: ReadMode) -> Self {
        Self {
            read_mode,
            includes: Vec::new(),
            filter: None,
        }
    }

    /// Compose a specification into a query: every typed include in
    /// declaration order, then every string path in declaration order, then
    /// the criteria.
    pub fn from_specification(specification: &'q Specification<T>, read_mode: ReadMode) -> Self {
        let with_includes = specification
            .includes()
            .iter()
            .fold(Self::new(read_mode), |query, include| query.include(include));

        specification
            .include_paths()
            .iter()
            .fold(with_includes, |query, path| query.include_path(path))
            .filter(&**specification.criteria())
    }

    pub fn include(mut self, include: &Include<T>) -> Self {
        self.includes.push(Cow::Owned(include.path()));
        self
    }

    pub fn include_path(mut self, path: &'q str) -> Self {
        self.includes.push(Cow::Borrowed(path));
        self
    }

    pub fn filter(mut self, filter: &'q (dyn Fn(&T) -> bool + Send + Sync)) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Include paths in the order the engine must apply them.
    pub fn include_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.includes.iter().map(|path| path.as_ref())
    }

    pub fn has_includes(&self) -> bool {
        !self.includes.is_empty()
    }

    /// Evaluate the filter; a query without one matches everything.
    pub fn matches(&self, entity: &T) -> bool {
        self.filter.map_or(true, |filter| filter(entity))
    }
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("read_mode", &self.read_mode)
            .field("includes", &self.includes)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}
