mod entity;

use proc_macro::TokenStream;

/// Derive macro that implements `slim_repository::Entity` for a struct.
///
/// # Usage
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
/// use slim_repository::Entity;
///
/// #[derive(Clone, Debug, Default, Serialize, Deserialize, Entity)]
/// #[entity(table = "test_objects")]
/// pub struct TestObject {
///     #[entity(id)]
///     pub id: i64,
///     pub name: String,
/// }
/// ```
///
/// - `#[entity(table = "...")]` sets the table name.
///   If omitted, defaults to snake_case struct name + "s".
/// - `#[entity(id)]` marks the `i64` key field.
///   If omitted, defaults to a field named `id`.
/// - `#[entity(navigations)]` forwards include loading to the type's
///   `slim_repository::Navigations` impl.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input)
}
