//! Integration tests for Repository over the in-memory engine.

#[path = "../support/mod.rs"]
mod support;


use pretty_assertions::assert_eq;
use slim_repository::{
    InMemoryDatabase, ReadMode, RepositoryError, RepositoryExt, Specification,
};
use support::objects::{seed, sorted_by_id, TestObject, SEED_COUNT};

#[test]
fn empty_store_lists_nothing() {
    support::init_tracing();
    let database = InMemoryDatabase::new();
    let session = database.session();

    let all = session.repository::<TestObject>().list(ReadMode::Untracked).unwrap();
    assert!(all.is_empty());
}

#[test]
fn list_returns_every_seeded_object() {
    support::init_tracing();
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    let session = database.session();
    let all = session.repository::<TestObject>().list(ReadMode::Tracked).unwrap();

    assert_eq!(all.len(), SEED_COUNT);
    assert_eq!(sorted_by_id(all), sorted_by_id(seeded));
}

#[test]
fn list_is_idempotent() {
    let database = InMemoryDatabase::new();
    seed(&database);

    let session = database.session();
    let objects = session.repository::<TestObject>();
    let first = objects.list(ReadMode::Tracked).unwrap();
    let second = objects.list(ReadMode::Tracked).unwrap();

    assert_eq!(sorted_by_id(first), sorted_by_id(second));
}

#[test]
fn list_where_filters_by_name() {
    support::init_tracing();
    let database = InMemoryDatabase::new();
    seed(&database);

    let session = database.session();
    let found = session
        .repository::<TestObject>()
        .list_where(|o| o.name.contains('3'), ReadMode::Untracked)
        .unwrap();

    let mut names: Vec<String> = found.into_iter().map(|o| o.name).collect();
    names.sort();
    let mut expected: Vec<String> = (0..SEED_COUNT)
        .map(|n| format!("TestObject{n}"))
        .filter(|name| name.contains('3'))
        .collect();
    expected.sort();

    assert_eq!(names.len(), 19);
    assert_eq!(names, expected);
}

#[test]
fn list_matching_applies_specification_criteria() {
    let database = InMemoryDatabase::new();
    seed(&database);

    let session = database.session();
    let tens = Specification::new(|o: &TestObject| o.name.starts_with("TestObject1"));
    let found = session
        .repository::<TestObject>()
        .list_matching(&tens, ReadMode::Untracked)
        .unwrap();

    // TestObject1 and TestObject10..19
    assert_eq!(found.len(), 11);
    assert!(found.iter().all(|o| o.name.starts_with("TestObject1")));
}

#[test]
fn list_matching_all_returns_everything() {
    let database = InMemoryDatabase::new();
    seed(&database);

    let session = database.session();
    let found = session
        .repository::<TestObject>()
        .list_matching(&Specification::all(), ReadMode::Untracked)
        .unwrap();
    assert_eq!(found.len(), SEED_COUNT);
}

#[test]
fn get_by_id_finds_seeded_object() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);
    let wanted = &seeded[42];

    let session = database.session();
    let found = session.repository::<TestObject>().get_by_id(wanted.id).unwrap();
    assert_eq!(found.as_ref(), Some(wanted));
}

#[test]
fn get_by_id_on_an_empty_store_is_none() {
    let database = InMemoryDatabase::new();
    let session = database.session();
    let objects = session.repository::<TestObject>();

    assert_eq!(objects.get_by_id(0).unwrap(), None);
    assert_eq!(objects.get_by_id(1).unwrap(), None);
    assert_eq!(session.tracked_count().unwrap(), 0);
}

#[test]
fn get_by_id_of_missing_key_is_none() {
    let database = InMemoryDatabase::new();
    seed(&database);

    let session = database.session();
    let objects = session.repository::<TestObject>();
    assert_eq!(objects.get_by_id(0).unwrap(), None);
    assert_eq!(objects.get_by_id(10_000).unwrap(), None);
}

#[test]
fn add_assigns_a_key_and_persists() {
    support::init_tracing();
    let database = InMemoryDatabase::new();
    let session = database.session();

    let added = session
        .repository::<TestObject>()
        .add(TestObject::named("Test"))
        .unwrap();
    assert!(added.id > 0);

    let fresh = database.session();
    let found = fresh.repository::<TestObject>().get_by_id(added.id).unwrap();
    assert_eq!(found, Some(added));
}

#[test]
fn add_keeps_an_explicit_key() {
    let database = InMemoryDatabase::new();
    let session = database.session();
    let objects = session.repository::<TestObject>();

    let explicit = objects
        .add(TestObject {
            id: 500,
            name: "Explicit".into(),
        })
        .unwrap();
    assert_eq!(explicit.id, 500);

    // Generated keys continue past the explicit one.
    let generated = objects.add(TestObject::named("Generated")).unwrap();
    assert_eq!(generated.id, 501);
}

#[test]
fn add_range_writes_keys_back() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    let mut ids: Vec<i64> = seeded.iter().map(|o| o.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), SEED_COUNT);
    assert!(ids.iter().all(|id| *id > 0));
    assert_eq!(database.count::<TestObject>().unwrap(), SEED_COUNT);
}

#[test]
fn add_range_of_nothing_is_a_no_op() {
    let database = InMemoryDatabase::new();
    let session = database.session();

    session
        .repository::<TestObject>()
        .add_range(&mut [])
        .unwrap();
    assert_eq!(database.count::<TestObject>().unwrap(), 0);
}

#[test]
fn add_range_is_all_or_nothing() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    let session = database.session();
    let mut batch = vec![
        TestObject::named("New1"),
        TestObject {
            id: seeded[0].id,
            name: "Clash".into(),
        },
        TestObject::named("New2"),
    ];
    let err = session
        .repository::<TestObject>()
        .add_range(&mut batch)
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::DuplicateKey {
            table: "test_objects",
            id: seeded[0].id,
        }
    );
    assert_eq!(database.count::<TestObject>().unwrap(), SEED_COUNT);
    assert!(!session.has_pending_changes().unwrap());

    let fresh = database.session();
    let clashed = fresh.repository::<TestObject>().get_by_id(seeded[0].id).unwrap();
    assert_eq!(clashed, Some(seeded[0].clone()));
}

#[test]
fn edit_is_visible_to_a_fresh_session() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    let session = database.session();
    let objects = session.repository::<TestObject>();
    let mut target = objects.get_by_id(seeded[7].id).unwrap().unwrap();
    target.name = "Renamed".into();
    objects.edit(&target).unwrap();

    let fresh = database.session();
    let found = fresh
        .repository::<TestObject>()
        .get_by_id(target.id)
        .unwrap()
        .unwrap();
    assert_eq!(found.name, "Renamed");
}

#[test]
fn edit_of_a_missing_entity_is_a_concurrency_error() {
    let database = InMemoryDatabase::new();
    let session = database.session();

    let ghost = TestObject {
        id: 77,
        name: "Ghost".into(),
    };
    let err = session.repository::<TestObject>().edit(&ghost).unwrap_err();

    assert!(err.is_concurrency());
    assert_eq!(database.count::<TestObject>().unwrap(), 0);
}

#[test]
fn delete_removes_the_entity() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    let session = database.session();
    session.repository::<TestObject>().delete(&seeded[3]).unwrap();

    let fresh = database.session();
    let objects = fresh.repository::<TestObject>();
    assert_eq!(objects.get_by_id(seeded[3].id).unwrap(), None);
    assert_eq!(objects.list(ReadMode::Untracked).unwrap().len(), SEED_COUNT - 1);
}

#[test]
fn delete_of_a_missing_entity_is_a_concurrency_error() {
    let database = InMemoryDatabase::new();
    let seeded = seed(&database);

    database
        .session()
        .repository::<TestObject>()
        .delete(&seeded[5])
        .unwrap();

    let session = database.session();
    let err = session
        .repository::<TestObject>()
        .delete(&seeded[5])
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Concurrency {
            table: "test_objects",
            id: seeded[5].id,
        }
    );
    assert_eq!(database.count::<TestObject>().unwrap(), SEED_COUNT - 1);
}
