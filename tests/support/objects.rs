//! The TestObject fixture: a flat entity with a name.

use serde::{Deserialize, Serialize};
use slim_repository::{Entity, InMemoryDatabase, RepositoryExt};

pub const SEED_COUNT: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Entity)]
#[entity(table = "test_objects")]
pub struct TestObject {
    pub id: i64,
    pub name: String,
}

impl TestObject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

/// `TestObject0` through `TestObject99`, unsaved.
pub fn seed_objects() -> Vec<TestObject> {
    (0..SEED_COUNT)
        .map(|n| TestObject::named(format!("TestObject{n}")))
        .collect()
}

/// Seed the database in one commit and return what was stored.
pub fn seed(database: &InMemoryDatabase) -> Vec<TestObject> {
    let session = database.session();
    let mut objects = seed_objects();
    session
        .repository::<TestObject>()
        .add_range(&mut objects)
        .unwrap();
    objects
}

pub fn sorted_by_id(mut objects: Vec<TestObject>) -> Vec<TestObject> {
    objects.sort_by_key(|o| o.id);
    objects
}
