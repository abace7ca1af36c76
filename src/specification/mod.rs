//! Specifications - reusable query descriptors.
//!
//! A specification pairs a filter with the related data that must be
//! eager-loaded alongside every match. Repositories hand both to the storage
//! engine; the engine decides how to execute them.
//!
//! ## Example
//!
//! ```ignore
//! use slim_repository::{ReadMode, RepositoryExt, Specification};
//!
//! fn open_orders_with_lines() -> Specification<Order> {
//!     Specification::builder()
//!         .with_filter(|order: &Order| order.open)
//!         .with_include(Order::LINES)
//!         .with_include_path("customer.address")
//!         .build()
//! }
//!
//! let orders = session
//!     .repository::<Order>()
//!     .list_matching(&open_orders_with_lines(), ReadMode::Untracked)?;
//! ```

mod builder;
mod include;

use std::fmt;
use std::sync::Arc;

pub use builder::SpecificationBuilder;
pub use include::{Include, IncludeChain, Navigation};

/// A shareable filter over `T`.
pub type Criteria<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// An immutable filter plus ordered eager-load declarations.
///
/// Typed includes and string include paths are kept in separate lists, each
/// in declaration order. Engines apply every typed include, then every path,
/// then the filter.
pub struct Specification<T> {
    criteria: Criteria<T>,
    includes: Vec<Include<T>>,
    include_paths: Vec<String>,
}

impl<T> Specification<T> {
    /// A specification with only a filter.
    pub fn new<F>(criteria: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            criteria: Arc::new(criteria),
            includes: Vec::new(),
            include_paths: Vec::new(),
        }
    }

    /// Matches every entity and includes nothing.
    pub fn all() -> Self
    where
        T: 'static,
    {
        Self::new(|_| true)
    }

    pub fn builder() -> SpecificationBuilder<T> {
        SpecificationBuilder::new()
    }

    pub fn criteria(&self) -> &Criteria<T> {
        &self.criteria
    }

    pub fn includes(&self) -> &[Include<T>] {
        &self.includes
    }

    pub fn include_paths(&self) -> &[String] {
        &self.include_paths
    }

    /// Evaluate the filter against one entity.
    pub fn matches(&self, entity: &T) -> bool {
        (self.criteria)(entity)
    }
}

impl<T> Clone for Specification<T> {
    fn clone(&self) -> Self {
        Self {
            criteria: Arc::clone(&self.criteria),
            includes: self.includes.clone(),
            include_paths: self.include_paths.clone(),
        }
    }
}

impl<T> fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Specification")
            .field("includes", &self.includes)
            .field("include_paths", &self.include_paths)
            .finish_non_exhaustive()
    }
}
