//! Entities - records with an integer identity, plus the navigation hooks
//! storage engines use to eager-load related data.
//!
//! ## Example
//!
//! ```ignore
//! use slim_repository::{Entity, NavigationLoader, Navigations, RepositoryError};
//!
//! #[derive(Clone, Serialize, Deserialize, Entity)]
//! #[entity(table = "orders", navigations)]
//! struct Order {
//!     id: i64,
//!     customer_id: i64,
//!     #[serde(skip)]
//!     customer: Option<Customer>,
//! }
//!
//! impl Navigations for Order {
//!     const NAVIGATIONS: &'static [&'static str] = &["customer"];
//!
//!     fn navigate<L: NavigationLoader>(
//!         &mut self,
//!         navigation: &str,
//!         rest: Option<&str>,
//!         loader: &L,
//!     ) -> Result<(), RepositoryError> {
//!         match navigation {
//!             "customer" => self.customer = loader.reference(self.customer_id, rest)?,
//!             other => return Err(Self::unknown_navigation(other)),
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use serde::{de::DeserializeOwned, Serialize};

use crate::error::RepositoryError;

/// Trait for record types a repository can manage.
///
/// Rows are stored as serialized snapshots, so navigation fields (related
/// data filled in by includes) should be `#[serde(skip)]`.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The table name for this entity type.
    /// Maps to a table in SQL, a collection in a document store, a key prefix in KV stores, etc.
    const TABLE: &'static str;

    /// Returns the identity key. `0` means the entity has not been saved yet.
    fn id(&self) -> i64;

    /// Sets the identity key. Called by engines that generate keys.
    fn set_id(&mut self, id: i64);

    /// Navigation names `load_navigation` accepts. Engines check the head of
    /// every include path against this before reading any rows.
    const NAVIGATIONS: &'static [&'static str] = &[];

    /// True until the entity has been assigned a key.
    fn is_transient(&self) -> bool {
        self.id() == 0
    }

    /// Eager-load the navigation named `navigation`, then apply `rest` (the
    /// remaining dotted path, if any) to whatever was loaded.
    ///
    /// The default knows no navigations.
    fn load_navigation<L: NavigationLoader>(
        &mut self,
        navigation: &str,
        rest: Option<&str>,
        loader: &L,
    ) -> Result<(), RepositoryError> {
        let _ = (rest, loader);
        Err(Self::unknown_navigation(navigation))
    }

    /// The error for a navigation name this entity does not expose.
    fn unknown_navigation(navigation: &str) -> RepositoryError {
        RepositoryError::UnknownNavigation {
            table: Self::TABLE,
            navigation: navigation.to_string(),
        }
    }
}

/// Navigation loading for entities derived with `#[entity(navigations)]`.
pub trait Navigations: Entity {
    /// Every name `navigate` handles.
    const NAVIGATIONS: &'static [&'static str];

    fn navigate<L: NavigationLoader>(
        &mut self,
        navigation: &str,
        rest: Option<&str>,
        loader: &L,
    ) -> Result<(), RepositoryError>;
}

/// Engine-side fetching of related rows during eager loading.
///
/// Both methods apply `rest` to every entity they return, so multi-level
/// paths resolve one segment at a time.
pub trait NavigationLoader {
    /// Load a single related entity by key.
    fn reference<R: Entity>(
        &self,
        id: i64,
        rest: Option<&str>,
    ) -> Result<Option<R>, RepositoryError>;

    /// Load every related entity matching `predicate`.
    fn collection<R: Entity>(
        &self,
        predicate: &dyn Fn(&R) -> bool,
        rest: Option<&str>,
    ) -> Result<Vec<R>, RepositoryError>;
}

/// Apply one dotted include path to `entity`.
///
/// Engines call this for each include, in order, once per result row.
pub fn apply_include<T: Entity, L: NavigationLoader>(
    entity: &mut T,
    path: &str,
    loader: &L,
) -> Result<(), RepositoryError> {
    let (head, rest) = split_path(path)?;
    entity.load_navigation(head, rest, loader)
}

/// Check an include path against `T` without loading anything: the path
/// must be well formed and its first segment a navigation of `T`.
///
/// Deeper segments belong to related types and are checked as they load.
pub fn check_include<T: Entity>(path: &str) -> Result<(), RepositoryError> {
    let (head, _) = split_path(path)?;
    if T::NAVIGATIONS.contains(&head) {
        Ok(())
    } else {
        Err(T::unknown_navigation(head))
    }
}

/// Split `"a.b.c"` into `("a", Some("b.c"))`, rejecting empty segments.
pub(crate) fn split_path(path: &str) -> Result<(&str, Option<&str>), RepositoryError> {
    let valid = !path.is_empty()
        && path
            .split('.')
            .all(|segment| !segment.is_empty() && !segment.contains(char::is_whitespace));
    if !valid {
        return Err(RepositoryError::InvalidIncludePath {
            path: path.to_string(),
        });
    }

    Ok(match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    })
}
