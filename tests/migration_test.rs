//! Migration coverage: a database created before `last_accessed` became
//! mandatory gets its rows backfilled on open.

use dossier::db::migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
use rusqlite::Connection;

/// The original on-disk layout: nullable `last_accessed`, version 1.
const V1_SCHEMA: &str = r#"
CREATE TABLE memories (
    id TEXT PRIMARY KEY,
    lead_id TEXT NOT NULL,
    type TEXT NOT NULL,
    content TEXT NOT NULL,
    confidence REAL NOT NULL DEFAULT 0.9,
    retrieval_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    last_accessed TEXT
);

CREATE TABLE knowledge_items (
    id TEXT PRIMARY KEY,
    org_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    content_type TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

INSERT INTO schema_meta (key, value) VALUES ('schema_version', '1');
"#;

fn v1_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(V1_SCHEMA).unwrap();
    conn
}

#[test]
fn v1_database_is_migrated_to_current_version() {
    let conn = v1_db();
    assert_eq!(get_schema_version(&conn).unwrap(), 1);

    run_migrations(&conn).unwrap();
    assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn null_last_accessed_is_backfilled_from_created_at() {
    let conn = v1_db();
    conn.execute(
        "INSERT INTO memories (id, lead_id, type, content, created_at, last_accessed) \
         VALUES ('m1', 'L1', 'factual', '{}', '2025-11-03T09:00:00+00:00', NULL)",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO memories (id, lead_id, type, content, created_at, last_accessed) \
         VALUES ('m2', 'L1', 'factual', '{}', '2025-11-04T09:00:00+00:00', '2025-11-05T10:00:00+00:00')",
        [],
    )
    .unwrap();

    run_migrations(&conn).unwrap();

    let backfilled: String = conn
        .query_row(
            "SELECT last_accessed FROM memories WHERE id = 'm1'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(backfilled, "2025-11-03T09:00:00+00:00");

    // Rows that already had a value are untouched.
    let untouched: String = conn
        .query_row(
            "SELECT last_accessed FROM memories WHERE id = 'm2'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(untouched, "2025-11-05T10:00:00+00:00");
}
