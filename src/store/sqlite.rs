//! SQLite backend for the [`Store`] trait.
//!
//! One connection behind a mutex; the HTTP layer runs calls under
//! `spawn_blocking`. Memory writes are append-only inserts, so concurrent
//! writers never conflict. The retrieval-count bump is a best-effort usage
//! counter, not a correctness-critical value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::db;
use crate::error::{Error, Result};
use crate::knowledge::types::{ContentType, KnowledgeItem};
use crate::memory::types::{ContentMap, MemoryRecord, MemoryType};
use crate::store::{Store, StoreStats};

pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, with schema and migrations
    /// applied.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = db::open_database(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-open connection. Used by tests with in-memory
    /// databases; `stats` reports a zero file size in that case.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            db_path: None,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Unavailable("connection lock poisoned".into()))
    }
}

/// Intermediate row shape: content and type still serialized.
struct MemoryRow {
    id: String,
    lead_id: String,
    memory_type: String,
    content: String,
    confidence: f64,
    retrieval_count: u32,
    created_at: String,
    last_accessed: String,
}

const MEMORY_COLUMNS: &str =
    "id, lead_id, type, content, confidence, retrieval_count, created_at, last_accessed";

fn map_memory_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemoryRow> {
    Ok(MemoryRow {
        id: row.get(0)?,
        lead_id: row.get(1)?,
        memory_type: row.get(2)?,
        content: row.get(3)?,
        confidence: row.get(4)?,
        retrieval_count: row.get(5)?,
        created_at: row.get(6)?,
        last_accessed: row.get(7)?,
    })
}

fn row_to_record(row: MemoryRow) -> Result<MemoryRecord> {
    let memory_type: MemoryType = row.memory_type.parse()?;
    let content: ContentMap = serde_json::from_str(&row.content)?;
    Ok(MemoryRecord {
        id: row.id,
        lead_id: row.lead_id,
        memory_type,
        content,
        confidence: row.confidence,
        retrieval_count: row.retrieval_count,
        created_at: row.created_at,
        last_accessed: row.last_accessed,
    })
}

/// Intermediate row shape: content type still serialized.
struct ItemRow {
    id: String,
    org_id: String,
    title: String,
    content: String,
    content_type: String,
    created_at: String,
}

fn map_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        org_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        content_type: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn row_to_item(row: ItemRow) -> Result<KnowledgeItem> {
    let content_type: ContentType = row.content_type.parse()?;
    Ok(KnowledgeItem {
        id: row.id,
        org_id: row.org_id,
        title: row.title,
        content: row.content,
        content_type,
        created_at: row.created_at,
    })
}

/// Bump retrieval stats for every returned record, and reflect the new
/// values in the structs handed back to the caller.
fn mark_retrieved(conn: &Connection, records: &mut [MemoryRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let now = chrono::Utc::now().to_rfc3339();
    let mut stmt = conn.prepare(
        "UPDATE memories SET retrieval_count = retrieval_count + 1, last_accessed = ?1 \
         WHERE id = ?2",
    )?;
    for record in records.iter_mut() {
        stmt.execute(params![now, record.id])?;
        record.retrieval_count += 1;
        record.last_accessed = now.clone();
    }
    Ok(())
}

impl Store for SqliteStore {
    fn insert_memory(&self, record: &MemoryRecord) -> Result<()> {
        let conn = self.lock()?;
        let content = serde_json::to_string(&record.content)?;
        conn.execute(
            "INSERT INTO memories (id, lead_id, type, content, confidence, retrieval_count, created_at, last_accessed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.lead_id,
                record.memory_type.as_str(),
                content,
                record.confidence,
                record.retrieval_count,
                record.created_at,
                record.last_accessed,
            ],
        )?;
        Ok(())
    }

    fn fetch_memories(
        &self,
        lead_id: &str,
        memory_type: Option<MemoryType>,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>> {
        let conn = self.lock()?;

        let mut sql = format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE lead_id = ?1");
        if memory_type.is_some() {
            sql.push_str(" AND type = ?2");
        }
        // UUID v7 ids are time-sortable, so the id makes same-timestamp
        // ordering deterministic.
        sql.push_str(" ORDER BY created_at DESC, id DESC");
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows: Vec<MemoryRow> = if let Some(t) = memory_type {
            stmt.query_map(params![lead_id, t.as_str()], map_memory_row)?
                .collect::<rusqlite::Result<_>>()?
        } else {
            stmt.query_map(params![lead_id], map_memory_row)?
                .collect::<rusqlite::Result<_>>()?
        };
        drop(stmt);

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(row_to_record(row)?);
        }

        mark_retrieved(&conn, &mut records)?;
        Ok(records)
    }

    fn get_memory(&self, id: &str) -> Result<MemoryRecord> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!("SELECT {MEMORY_COLUMNS} FROM memories WHERE id = ?1"),
                params![id],
                map_memory_row,
            )
            .optional()?;
        match row {
            Some(row) => row_to_record(row),
            None => Err(Error::NotFound(format!("memory not found: {id}"))),
        }
    }

    fn insert_item(&self, item: &KnowledgeItem) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO knowledge_items (id, org_id, title, content, content_type, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id,
                item.org_id,
                item.title,
                item.content,
                item.content_type.as_str(),
                item.created_at,
            ],
        )?;
        Ok(())
    }

    fn fetch_items(
        &self,
        org_id: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<KnowledgeItem>> {
        let conn = self.lock()?;

        let mut sql = String::from(
            "SELECT id, org_id, title, content, content_type, created_at \
             FROM knowledge_items WHERE org_id = ?1",
        );
        if content_type.is_some() {
            sql.push_str(" AND content_type = ?2");
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let rows: Vec<ItemRow> = if let Some(t) = content_type {
            stmt.query_map(params![org_id, t.as_str()], map_item_row)?
                .collect::<rusqlite::Result<_>>()?
        } else {
            stmt.query_map(params![org_id], map_item_row)?
                .collect::<rusqlite::Result<_>>()?
        };

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    fn stats(&self) -> Result<StoreStats> {
        let conn = self.lock()?;

        let total_memories: i64 =
            conn.query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))?;
        let distinct_leads: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT lead_id) FROM memories",
            [],
            |row| row.get(0),
        )?;

        let mut by_type: HashMap<String, u64> = HashMap::new();
        for t in MemoryType::ALL {
            by_type.insert(t.as_str().to_string(), 0);
        }
        let mut stmt = conn.prepare("SELECT type, COUNT(*) FROM memories GROUP BY type")?;
        let rows: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;
        for (t, count) in rows {
            by_type.insert(t, count as u64);
        }
        drop(stmt);

        let knowledge_items: i64 =
            conn.query_row("SELECT COUNT(*) FROM knowledge_items", [], |row| row.get(0))?;

        let mut items_by_type: HashMap<String, u64> = HashMap::new();
        for t in ContentType::ALL {
            items_by_type.insert(t.as_str().to_string(), 0);
        }
        let mut stmt =
            conn.prepare("SELECT content_type, COUNT(*) FROM knowledge_items GROUP BY content_type")?;
        let rows: Vec<(String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;
        for (t, count) in rows {
            items_by_type.insert(t, count as u64);
        }
        drop(stmt);

        let (oldest_memory, newest_memory): (Option<String>, Option<String>) = conn.query_row(
            "SELECT MIN(created_at), MAX(created_at) FROM memories",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = self
            .db_path
            .as_deref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len())
            .unwrap_or(0);

        Ok(StoreStats {
            total_memories: total_memories as u64,
            distinct_leads: distinct_leads as u64,
            by_type,
            knowledge_items: knowledge_items as u64,
            items_by_type,
            oldest_memory,
            newest_memory,
            db_size_bytes,
        })
    }
}
