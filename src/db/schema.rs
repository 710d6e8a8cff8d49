//! SQL DDL for all dossier tables.
//!
//! Defines the `memories`, `knowledge_items`, and `schema_meta` tables. All
//! DDL uses `IF NOT EXISTS` for idempotent initialization. The closed enums
//! and the confidence range are mirrored as CHECK constraints.

use rusqlite::Connection;

/// All schema DDL statements for dossier's core tables.
const SCHEMA_SQL: &str = r#"
-- Per-lead memory storage. Append-only; only retrieval_count and
-- last_accessed are ever updated after insert.
CREATE TABLE IF NOT EXISTS memories (
    id TEXT PRIMARY KEY,
    lead_id TEXT NOT NULL,
    type TEXT NOT NULL CHECK(type IN ('factual','emotional','strategic','contextual')),
    content TEXT NOT NULL,
    confidence REAL NOT NULL DEFAULT 0.9 CHECK(confidence >= 0.0 AND confidence <= 1.0),
    retrieval_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    last_accessed TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_memories_lead ON memories(lead_id);
CREATE INDEX IF NOT EXISTS idx_memories_lead_type ON memories(lead_id, type);
CREATE INDEX IF NOT EXISTS idx_memories_created ON memories(created_at);

-- Org-wide knowledge base
CREATE TABLE IF NOT EXISTS knowledge_items (
    id TEXT PRIMARY KEY,
    org_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    content_type TEXT NOT NULL CHECK(content_type IN ('document','script','faq')),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_org ON knowledge_items(org_id);
CREATE INDEX IF NOT EXISTS idx_items_org_type ON knowledge_items(org_id, content_type);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
