/// Concurrent requests against one shared dataset

use graphlet::dataset::{Collection, InMemoryDataset, SharedDataset};
use graphlet::execution::{Executor, Request};
use serde_json::json;
use std::sync::Arc;

const WRITERS: i64 = 16;

#[test]
fn test_concurrent_creates_are_all_kept() {
    let schema = graphlet::tutorials::build_schema().unwrap();
    let dataset = Arc::new(InMemoryDataset::seeded());
    let shared: SharedDataset = dataset.clone();

    std::thread::scope(|scope| {
        for n in 0..WRITERS {
            let schema = &schema;
            let shared = &shared;
            scope.spawn(move || {
                let id = 100 + n;
                let request = Request::new(format!(
                    r#"mutation {{ createTutorial(id: {id}, title: "Tutorial {id}") {{ id }} }}"#
                ));
                let response = Executor::new(schema).execute(&request, shared);
                assert!(response.is_ok(), "{:?}", response.errors);
            });
        }
    });

    assert_eq!(dataset.len(Collection::Tutorials), 2 + WRITERS as usize);
}

#[test]
fn test_readers_alongside_writers() {
    let schema = graphlet::tutorials::build_schema().unwrap();
    let shared: SharedDataset = Arc::new(InMemoryDataset::seeded());

    std::thread::scope(|scope| {
        for n in 0..WRITERS {
            let schema = &schema;
            let shared = &shared;
            scope.spawn(move || {
                let request = Request::new(format!(
                    r#"mutation {{ createTutorial(id: {}, title: "Concurrent") {{ id }} }}"#,
                    200 + n
                ));
                Executor::new(schema).execute(&request, shared);
            });
            scope.spawn(move || {
                let response = Executor::new(schema)
                    .execute(&Request::new("{ tutorial(id: 1) { title } }"), shared)
                    .to_json();
                assert_eq!(
                    response["data"],
                    json!({"tutorial": {"title": "Go GraphQL Tutorial"}})
                );
            });
        }
    });
}

#[test]
fn test_racing_duplicate_ids_keep_one() {
    let schema = graphlet::tutorials::build_schema().unwrap();
    let dataset = Arc::new(InMemoryDataset::seeded());
    let shared: SharedDataset = dataset.clone();

    let successes: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let schema = &schema;
                let shared = &shared;
                scope.spawn(move || {
                    let request = Request::new(
                        r#"mutation { createTutorial(id: 42, title: "Race") { id } }"#,
                    );
                    Executor::new(schema).execute(&request, shared).is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|ok| *ok)
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(dataset.len(Collection::Tutorials), 3);
}
