//! In-memory storage engine for tests and development.
//!
//! [`InMemoryDatabase`] holds committed rows and can be shared across
//! sessions; [`InMemorySession`] is one unit of work with its own change
//! tracking.
//!
//! ## Example
//!
//! ```ignore
//! use slim_repository::{InMemoryDatabase, ReadMode, RepositoryExt};
//!
//! let database = InMemoryDatabase::new();
//!
//! let added = {
//!     let session = database.session();
//!     session.repository::<TestObject>().add(TestObject::named("Test"))?
//! };
//!
//! let session = database.session();
//! let found = session.repository::<TestObject>().get_by_id(added.id)?;
//! ```

mod config;
mod database;
mod loader;
mod session;

pub use config::InMemoryConfig;
pub use database::InMemoryDatabase;
pub use session::{EntryState, InMemorySession};
