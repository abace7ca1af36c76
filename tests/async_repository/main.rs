//! Integration tests for AsyncRepository over the in-memory engine.

#![cfg(feature = "async")]

#[path = "../support/mod.rs"]
mod support;

use pretty_assertions::assert_eq;
use slim_repository::{
    AsyncRepositoryExt, InMemoryDatabase, ReadMode, Specification,
};
use support::objects::{seed_objects, sorted_by_id, TestObject, SEED_COUNT};

async fn seeded_database() -> (InMemoryDatabase, Vec<TestObject>) {
    let database = InMemoryDatabase::new();
    let session = database.session();
    let mut objects = seed_objects();
    session
        .async_repository::<TestObject>()
        .add_range(&mut objects)
        .await
        .unwrap();
    (database, objects)
}

#[tokio::test]
async fn list_returns_every_seeded_object() {
    support::init_tracing();
    let (database, seeded) = seeded_database().await;

    let session = database.session();
    let all = session
        .async_repository::<TestObject>()
        .list(ReadMode::Untracked)
        .await
        .unwrap();

    assert_eq!(all.len(), SEED_COUNT);
    assert_eq!(sorted_by_id(all), sorted_by_id(seeded));
}

#[tokio::test]
async fn list_where_filters_by_name() {
    let (database, _) = seeded_database().await;

    let session = database.session();
    let found = session
        .async_repository::<TestObject>()
        .list_where(|o| o.name.contains('3'), ReadMode::Untracked)
        .await
        .unwrap();

    assert_eq!(found.len(), 19);
    assert!(found.iter().all(|o| o.name.contains('3')));
}

#[tokio::test]
async fn list_matching_uses_criteria() {
    let (database, _) = seeded_database().await;

    let session = database.session();
    let spec = Specification::new(|o: &TestObject| o.name.ends_with("99"));
    let found = session
        .async_repository::<TestObject>()
        .list_matching(&spec, ReadMode::Tracked)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "TestObject99");
    assert_eq!(session.tracked_count().unwrap(), 1);
}

#[tokio::test]
async fn crud_round_trip() {
    support::init_tracing();
    let database = InMemoryDatabase::new();
    let session = database.session();
    let objects = session.async_repository::<TestObject>();

    let mut added = objects.add(TestObject::named("Test")).await.unwrap();
    assert!(added.id > 0);

    added.name = "Edited".into();
    objects.edit(&added).await.unwrap();

    let fresh = database.session();
    let found = fresh
        .async_repository::<TestObject>()
        .get_by_id(added.id)
        .await
        .unwrap();
    assert_eq!(found, Some(added.clone()));

    objects.delete(&added).await.unwrap();
    let gone = fresh
        .async_repository::<TestObject>()
        .get_by_id(added.id)
        .await
        .unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
async fn delete_of_a_missing_entity_is_a_concurrency_error() {
    let database = InMemoryDatabase::new();
    let session = database.session();

    let ghost = TestObject {
        id: 3,
        name: "Ghost".into(),
    };
    let err = session
        .async_repository::<TestObject>()
        .delete(&ghost)
        .await
        .unwrap_err();
    assert!(err.is_concurrency());
}

#[tokio::test]
async fn sessions_work_across_tasks() {
    let database = InMemoryDatabase::new();

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let database = database.clone();
            tokio::spawn(async move {
                let session = database.session();
                session
                    .async_repository::<TestObject>()
                    .add(TestObject::named(format!("Task{n}")))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 4);
    assert_eq!(database.count::<TestObject>().unwrap(), 4);
}
