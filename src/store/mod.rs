//! Storage backends behind the [`Store`] trait.
//!
//! Two implementations: [`sqlite::SqliteStore`] for production and
//! [`fake::FakeStore`] for tests and demo environments. Retrieval bias and
//! synthesis are written once over the trait, so both backends share
//! identical semantics. The fake is selected only by explicit configuration
//! (`storage.backend = "fake"`) — the real store carries no sample-data
//! branch.

pub mod fake;
pub mod sqlite;

use std::collections::HashMap;

use serde::Serialize;

use crate::config::DossierConfig;
use crate::error::{Error, Result};
use crate::knowledge::types::{ContentType, KnowledgeItem};
use crate::memory::types::{MemoryRecord, MemoryType};

/// Persistence surface for memory records and knowledge items.
pub trait Store: Send + Sync {
    /// Persist a freshly constructed memory record. Never overwrites.
    fn insert_memory(&self, record: &MemoryRecord) -> Result<()>;

    /// Records for a lead, newest first, optionally restricted to one type.
    /// `limit = None` means unbounded. Every returned record has its
    /// `retrieval_count` bumped and `last_accessed` set to the call time,
    /// both in the store and in the returned structs. A lead with no records
    /// yields an empty vec, never an error.
    fn fetch_memories(
        &self,
        lead_id: &str,
        memory_type: Option<MemoryType>,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryRecord>>;

    /// Single record by id. An inspection read — does not bump retrieval
    /// stats. [`Error::NotFound`] when absent.
    fn get_memory(&self, id: &str) -> Result<MemoryRecord>;

    /// Persist a knowledge item.
    fn insert_item(&self, item: &KnowledgeItem) -> Result<()>;

    /// All items for an org, newest first, optionally restricted to one
    /// content type. Ranking happens in the search policy, not here.
    fn fetch_items(
        &self,
        org_id: &str,
        content_type: Option<ContentType>,
    ) -> Result<Vec<KnowledgeItem>>;

    /// Store-wide statistics.
    fn stats(&self) -> Result<StoreStats>;
}

/// Counts and time range reported by `dossier stats` and `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub total_memories: u64,
    pub distinct_leads: u64,
    pub by_type: HashMap<String, u64>,
    pub knowledge_items: u64,
    pub items_by_type: HashMap<String, u64>,
    pub oldest_memory: Option<String>,
    pub newest_memory: Option<String>,
    pub db_size_bytes: u64,
}

/// Build the backend selected by `storage.backend`.
pub fn create_store(config: &DossierConfig) -> Result<Box<dyn Store>> {
    match config.storage.backend.as_str() {
        "sqlite" => {
            let store = sqlite::SqliteStore::open(config.resolved_db_path())?;
            Ok(Box::new(store))
        }
        "fake" => {
            tracing::warn!("using the in-memory fake store — data will not persist");
            Ok(Box::new(fake::FakeStore::with_sample_data()))
        }
        other => Err(Error::Validation(format!(
            "unknown storage backend: {other}"
        ))),
    }
}
