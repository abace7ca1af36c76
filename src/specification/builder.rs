use std::sync::Arc;

use super::{Criteria, Include, Specification};

/// Builder for [`Specification`].
///
/// Collects the filter and include declarations, then freezes them with
/// [`build`](Self::build). The resulting value has no mutators.
pub struct SpecificationBuilder<T> {
    criteria: Option<Criteria<T>>,
    includes: Vec<Include<T>>,
    include_paths: Vec<String>,
}

impl<T> Default for SpecificationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SpecificationBuilder<T> {
    pub fn new() -> Self {
        Self {
            criteria: None,
            includes: Vec::new(),
            include_paths: Vec::new(),
        }
    }

    /// Set the filter. Replaces any earlier filter; defaults to match-all.
    pub fn with_filter<F>(mut self, criteria: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.criteria = Some(Arc::new(criteria));
        self
    }

    /// Append a typed include (a [`Navigation`](super::Navigation) or a chain).
    pub fn with_include(mut self, include: impl Into<Include<T>>) -> Self {
        self.includes.push(include.into());
        self
    }

    /// Append a dotted include path such as `"organisation.department.team"`.
    ///
    /// Not validated here; a bad path fails when the engine runs the query.
    pub fn with_include_path(mut self, path: impl Into<String>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn build(self) -> Specification<T>
    where
        T: 'static,
    {
        let criteria: Criteria<T> = match self.criteria {
            Some(criteria) => criteria,
            None => Arc::new(|_: &T| true),
        };
        Specification {
            criteria,
            includes: self.includes,
            include_paths: self.include_paths,
        }
    }
}
