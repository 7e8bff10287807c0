//! Verify restore and operation behavior against JSON test vectors stored in
//! `test-vectors/`.
//!
//! `persisted.json` pairs raw entry payloads with the records the store must
//! restore from them. `scenarios.json` drives operation sequences against a
//! fresh store. Comparisons use parsed JSON and `TodoRecord` values, never raw
//! strings, so field ordering does not matter.

use std::collections::HashMap;

use todo_core::codec::{self, TodoRecord};
use todo_core::{Filter, MemoryStorage, Storage, TodoStats, TodoStore};
use uuid::Uuid;

fn records(store: &TodoStore<MemoryStorage>) -> Vec<TodoRecord> {
    store.todos().iter().map(TodoRecord::from).collect()
}

// ---------------------------------------------------------------------------
// Persisted payloads
// ---------------------------------------------------------------------------

#[test]
fn valid_payload_vectors() {
    let raw = include_str!("../../test-vectors/persisted.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["valid"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let payload = case["raw"].as_str().unwrap();
        let expected: Vec<TodoRecord> = serde_json::from_value(case["expected"].clone()).unwrap();

        let storage = MemoryStorage::with_entry(payload);
        let store = TodoStore::open(storage.clone());
        assert_eq!(records(&store), expected, "{name}: restored records");

        // Re-encoding the restored collection yields the canonical form.
        let reencoded: serde_json::Value =
            serde_json::from_str(&codec::encode(store.todos()).unwrap()).unwrap();
        assert_eq!(reencoded, case["expected"], "{name}: canonical encoding");
        assert_eq!(storage.writes(), 0, "{name}: restore must not write");
    }
}

#[test]
fn invalid_payload_vectors() {
    let raw = include_str!("../../test-vectors/persisted.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["invalid"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let payload = case["raw"].as_str().unwrap();

        let storage = MemoryStorage::with_entry(payload);
        assert!(storage.load().is_err(), "{name}: load should fail");

        let store = TodoStore::open(storage);
        assert!(store.todos().is_empty(), "{name}: store should start empty");
        assert_eq!(store.stats(), TodoStats::default(), "{name}: stats");
    }
}

// ---------------------------------------------------------------------------
// Operation scenarios
// ---------------------------------------------------------------------------

fn resolve(ids: &HashMap<String, Uuid>, step: &serde_json::Value) -> Uuid {
    let name = step["ref"].as_str().unwrap();
    ids.get(name).copied().unwrap_or_else(Uuid::new_v4)
}

fn expect_state(
    name: &str,
    index: usize,
    store: &TodoStore<MemoryStorage>,
    step: &serde_json::Value,
) {
    if let Some(texts) = step.get("texts") {
        let actual: Vec<&str> = store.todos().iter().map(|t| t.text()).collect();
        let expected: Vec<&str> = texts
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert_eq!(actual, expected, "{name} step {index}: texts");
    }
    if let Some(completed) = step.get("completed") {
        let actual: Vec<bool> = store.todos().iter().map(|t| t.completed()).collect();
        let expected: Vec<bool> = serde_json::from_value(completed.clone()).unwrap();
        assert_eq!(actual, expected, "{name} step {index}: completed");
    }
    if let Some(view) = step.get("view") {
        let actual: Vec<&str> = store.filtered_view().iter().map(|t| t.text()).collect();
        let expected: Vec<&str> = view
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert_eq!(actual, expected, "{name} step {index}: filtered view");
    }
    if let Some(stats) = step.get("stats") {
        let expected: TodoStats = serde_json::from_value(stats.clone()).unwrap();
        assert_eq!(store.stats(), expected, "{name} step {index}: stats");
    }
}

#[test]
fn scenario_vectors() {
    let raw = include_str!("../../test-vectors/scenarios.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let storage = MemoryStorage::new();
        let mut store = TodoStore::open(storage.clone());
        let mut ids: HashMap<String, Uuid> = HashMap::new();

        for (index, step) in case["steps"].as_array().unwrap().iter().enumerate() {
            let changed = step.get("changed").and_then(|c| c.as_bool());
            match step["op"].as_str().unwrap() {
                "add" => {
                    if let Some(id) = store.add(step["text"].as_str().unwrap()) {
                        ids.insert(step["as"].as_str().unwrap().to_string(), id);
                    }
                }
                "toggle" => {
                    let id = resolve(&ids, step);
                    assert_eq!(Some(store.toggle(id)), changed, "{name} step {index}: toggle");
                }
                "update" => {
                    let id = resolve(&ids, step);
                    let text = step["text"].as_str().unwrap();
                    assert_eq!(
                        Some(store.update(id, text)),
                        changed,
                        "{name} step {index}: update"
                    );
                }
                "delete" => {
                    let id = resolve(&ids, step);
                    assert_eq!(Some(store.delete(id)), changed, "{name} step {index}: delete");
                }
                "clear_completed" => {
                    let removed = store.clear_completed();
                    assert_eq!(
                        removed as u64,
                        step["removed"].as_u64().unwrap(),
                        "{name} step {index}: removed"
                    );
                }
                "set_filter" => {
                    let filter: Filter = step["filter"].as_str().unwrap().parse().unwrap();
                    store.set_filter(filter);
                }
                "expect" => expect_state(name, index, &store, step),
                other => panic!("{name}: unknown op: {other}"),
            }
        }

        // Whatever the scenario did, storage holds exactly the live collection.
        let persisted: Vec<TodoRecord> = storage
            .load()
            .unwrap()
            .iter()
            .map(TodoRecord::from)
            .collect();
        assert_eq!(persisted, records(&store), "{name}: persisted state");
    }
}
