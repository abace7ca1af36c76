//! Generic repositories and composable specifications over a pluggable
//! storage engine.
//!
//! ```ignore
//! use slim_repository::{InMemoryDatabase, ReadMode, RepositoryExt, Specification};
//!
//! let database = InMemoryDatabase::new();
//! let session = database.session();
//! let objects = session.repository::<TestObject>();
//!
//! objects.add(TestObject::named("Test"))?;
//! let matches = objects.list_where(|o| o.name.contains('3'), ReadMode::Untracked)?;
//! let all = objects.list_matching(&Specification::all(), ReadMode::Tracked)?;
//! ```

// Lets the derive macro's `slim_repository::` paths resolve inside this crate.
extern crate self as slim_repository;

mod engine;
mod entity;
mod error;
mod in_memory;
mod repository;
mod specification;

#[cfg(feature = "async")]
pub use engine::AsyncStorageEngine;
pub use engine::{Query, ReadMode, StorageEngine};
pub use entity::{apply_include, check_include, Entity, NavigationLoader, Navigations};
pub use error::RepositoryError;
pub use in_memory::{EntryState, InMemoryConfig, InMemoryDatabase, InMemorySession};
#[cfg(feature = "async")]
pub use repository::{AsyncRepository, AsyncRepositoryExt};
pub use repository::{Repository, RepositoryExt, UntrackedRepository};
pub use specification::{
    Criteria, Include, IncludeChain, Navigation, Specification, SpecificationBuilder,
};

// Re-export the derive macro alongside the trait of the same name
pub use slim_repository_macros::Entity;

/// Paths the derive macro expands to. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use serde::de::DeserializeOwned;
    pub use serde::Serialize;
}
