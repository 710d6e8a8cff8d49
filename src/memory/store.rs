//! Write path — validation, record construction, and persistence.
//!
//! [`store_memory`] is the single entry point. Records are append-only: a
//! store call always creates a new record with a fresh UUID v7 and never
//! touches existing ones, so concurrent writers cannot conflict.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::memory::types::{ContentMap, MemoryRecord, MemoryType, DEFAULT_CONFIDENCE};
use crate::store::Store;

/// Parameters for a store call. `confidence` defaults to
/// [`DEFAULT_CONFIDENCE`] when unset.
#[derive(Debug, Clone)]
pub struct StoreRequest {
    pub lead_id: String,
    pub memory_type: MemoryType,
    pub content: ContentMap,
    pub confidence: Option<f64>,
}

/// Validate and persist a new memory record.
///
/// `created_at` and `last_accessed` start equal; `retrieval_count` starts at
/// zero. Fails with a validation error on an empty lead id or a confidence
/// outside `[0.0, 1.0]` (an unknown memory type is rejected earlier, when the
/// caller parses it).
pub fn store_memory(store: &dyn Store, req: StoreRequest) -> Result<MemoryRecord> {
    let confidence = req.confidence.unwrap_or(DEFAULT_CONFIDENCE);
    if !(0.0..=1.0).contains(&confidence) {
        return Err(Error::Validation(format!(
            "confidence must be between 0.0 and 1.0, got {confidence}"
        )));
    }
    if req.lead_id.trim().is_empty() {
        return Err(Error::Validation("lead_id must not be empty".into()));
    }

    let now = Utc::now().to_rfc3339();
    let record = MemoryRecord {
        id: Uuid::now_v7().to_string(),
        lead_id: req.lead_id,
        memory_type: req.memory_type,
        content: req.content,
        confidence,
        retrieval_count: 0,
        created_at: now.clone(),
        last_accessed: now,
    };

    store.insert_memory(&record)?;

    tracing::info!(
        id = %record.id,
        lead = %record.lead_id,
        memory_type = %record.memory_type,
        confidence = record.confidence,
        "memory stored"
    );
    Ok(record)
}
