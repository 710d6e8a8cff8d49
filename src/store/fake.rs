//! In-memory fake backend for tests and demo environments.
//!
//! Implements the full [`Store`] contract over plain vectors, including the
//! retrieval-count bookkeeping, so policy code behaves identically against
//! either backend. Selected only by explicit configuration — the sqlite
//! backend carries no sample data and no fallback branch.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::knowledge::types::{ContentType, KnowledgeItem};
use crate::memory::types::{ContentMap, MemoryRecord, MemoryType};
use crate::store::{Store, StoreStats};

#[derive(Default)]
pub struct FakeStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    memories: Vec<MemoryRecord>,
    items: Vec<KnowledgeItem>,
}

/// Coerce a JSON value into an object payload; non-objects become empty.
fn object(value: serde_json::Value) -> ContentMap {
    match value {
        serde_json::Value::Object(map) => map,
        _ => ContentMap::new(),
    }
}

impl FakeStore {
    /// An empty fake store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake store pre-seeded with one demo lead and a small org knowledge
    /// base, for demos and local development without a database file.
    pub fn with_sample_data() -> Self {
        let store = Self::new();

        let lead = "lead-demo";
        let samples = [
            (
                MemoryType::Factual,
                json!({"budget": {"max": 650000}, "preapproved": true, "bedrooms": 4}),
            ),
            (
                MemoryType::Emotional,
                json!({"sentiment": "excited", "notes": "relocating for schools; spouse anxious about timing"}),
            ),
            (
                MemoryType::Strategic,
                json!({"next_step": "send two comps in Maple Grove", "objections": ["hoa fees"]}),
            ),
            (
                MemoryType::Contextual,
                json!({"market": "low inventory", "search_area": "northwest suburbs"}),
            ),
        ];
        {
            let mut inner = store.inner.lock().expect("fresh store lock");
            for (memory_type, content) in samples {
                let now = Utc::now().to_rfc3339();
                inner.memories.push(MemoryRecord {
                    id: Uuid::now_v7().to_string(),
                    lead_id: lead.to_string(),
                    memory_type,
                    content: object(content),
                    confidence: 0.9,
                    retrieval_count: 0,
                    created_at: now.clone(),
                    last_accessed: now,
                });
            }

            let knowledge = [
                (
                    ContentType::Script,
                    "Cold call opening",
                    "Hi, this is {agent} with {brokerage} — I noticed you were looking at homes in {area}...",
                ),
                (
                    ContentType::Faq,
                    "What does earnest money mean",
                    "Earnest money is a deposit made to the seller showing the buyer's good faith...",
                ),
                (
                    ContentType::Document,
                    "Seller disclosure checklist",
                    "Before listing: property condition disclosure, lead paint addendum, HOA documents...",
                ),
            ];
            for (content_type, title, content) in knowledge {
                let now = Utc::now().to_rfc3339();
                inner.items.push(KnowledgeItem {
                    id: Uuid::now_v7().to_string(),
                    org_id: "demo".to_string(),
                    title: title.to_string(),
                    content: content.to_string(),
                    content_type,
                    created_at: now,
                });
            }
        }

        store
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Unavailable("fake store lock poisoned".into()))
    }
}

impl Store for FakeStore {
    fn insert_memory(&self, record: &MemoryRecord) -> Result<()> {
        self.lock()?.memories.push(record.clone());
        Ok(())
    }

    fn fetch_memories(
        &self,
        lead_id: &str,
        memory_type: Option<MemoryType>,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>> {
        let mut inner = self.lock()?;
        let now = Utc::now().to_rfc3339();

        let mut matched: Vec<usize> = inner
            .memories
            .iter()
            .enumerate()
            .filter(|(_, m)| {
                m.lead_id == lead_id && memory_type.map_or(true, |t| m.memory_type == t)
            })
            .map(|(i, _)| i)
            .collect();
        // Newest first; id breaks same-timestamp ties like the sqlite backend.
        matched.sort_by(|&a, &b| {
            let (ma, mb) = (&inner.memories[a], &inner.memories[b]);
            mb.created_at
                .cmp(&ma.created_at)
                .then_with(|| mb.id.cmp(&ma.id))
        });
        if let Some(n) = limit {
            matched.truncate(n);
        }

        let mut out = Vec::with_capacity(matched.len());
        for i in matched {
            let record = &mut inner.memories[i];
            record.retrieval_count += 1;
            record.last_accessed = now.clone();
            out.push(record.clone());
        }
        Ok(out)
    }

    fn get_memory(&self, id: &str) -> Result<MemoryRecord> {
        self.lock()?
            .memories
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("memory not found: {id}")))
    }

    fn insert_item(&self, item: &KnowledgeItem) -> Result<()> {
        self.lock()?.items.push(item.clone());
        Ok(())
    }

    fn fetch_items(
        &self,
        org_id: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<KnowledgeItem>> {
        let inner = self.lock()?;
        let mut items: Vec<KnowledgeItem> = inner
            .items
            .iter()
            .filter(|i| i.org_id == org_id && content_type.map_or(true, |t| i.content_type == t))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(items)
    }

    fn stats(&self) -> Result<StoreStats> {
        let inner = self.lock()?;

        let mut by_type: HashMap<String, u64> = HashMap::new();
        for t in MemoryType::ALL {
            by_type.insert(t.as_str().to_string(), 0);
        }
        for m in &inner.memories {
            *by_type.entry(m.memory_type.as_str().to_string()).or_insert(0) += 1;
        }

        let mut items_by_type: HashMap<String, u64> = HashMap::new();
        for t in ContentType::ALL {
            items_by_type.insert(t.as_str().to_string(), 0);
        }
        for i in &inner.items {
            *items_by_type
                .entry(i.content_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let leads: HashSet<&str> = inner.memories.iter().map(|m| m.lead_id.as_str()).collect();

        Ok(StoreStats {
            total_memories: inner.memories.len() as u64,
            distinct_leads: leads.len() as u64,
            by_type,
            knowledge_items: inner.items.len() as u64,
            items_by_type,
            oldest_memory: inner.memories.iter().map(|m| m.created_at.clone()).min(),
            newest_memory: inner.memories.iter().map(|m| m.created_at.clone()).max(),
            db_size_bytes: 0,
        })
    }
}
