#![allow(dead_code)]

use dossier::db;
use dossier::memory::store::{store_memory, StoreRequest};
use dossier::memory::types::{ContentMap, MemoryRecord, MemoryType};
use dossier::store::sqlite::SqliteStore;
use dossier::store::Store;

/// Fresh sqlite store over an in-memory database with schema and migrations
/// applied.
pub fn test_store() -> SqliteStore {
    SqliteStore::new(db::open_memory_database().unwrap())
}

/// Build a content payload from a JSON literal; non-objects become empty.
pub fn content(value: serde_json::Value) -> ContentMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => ContentMap::new(),
    }
}

/// Store a memory through the normal write path. Returns the stored record.
pub fn insert_memory(
    store: &dyn Store,
    lead_id: &str,
    memory_type: MemoryType,
    value: serde_json::Value,
) -> MemoryRecord {
    store_memory(
        store,
        StoreRequest {
            lead_id: lead_id.into(),
            memory_type,
            content: content(value),
            confidence: None,
        },
    )
    .unwrap()
}

/// Short pause so consecutive stores get strictly increasing timestamps.
pub fn tick() {
    std::thread::sleep(std::time::Duration::from_millis(5));
}
