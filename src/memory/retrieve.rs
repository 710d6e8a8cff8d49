//! Read path — type filtering and best-effort query bias.
//!
//! An explicit `memory_type` is a hard filter. A free-text `query` only
//! biases retrieval toward the type its keywords suggest; when the biased set
//! comes back empty the call degrades to the unfiltered set, so a relevance
//! miss never costs the caller results.

use crate::error::Result;
use crate::memory::types::{MemoryRecord, MemoryType};
use crate::relevance;
use crate::store::Store;

/// Result-count bound applied when the caller does not specify one.
pub const DEFAULT_LIMIT: usize = 5;

/// Parameters for a retrieve call.
#[derive(Debug, Clone)]
pub struct RetrieveRequest {
    pub lead_id: String,
    /// Hard filter. Takes precedence over any query bias.
    pub memory_type: Option<MemoryType>,
    /// Free-text relevance hint.
    pub query: Option<String>,
    pub limit: usize,
}

impl RetrieveRequest {
    pub fn new(lead_id: impl Into<String>) -> Self {
        Self {
            lead_id: lead_id.into(),
            memory_type: None,
            query: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Retrieve records for a lead, newest first.
///
/// Every returned record has its retrieval stats bumped as an observable
/// side effect. A lead with no records yields an empty vec.
pub fn retrieve(store: &dyn Store, req: &RetrieveRequest) -> Result<Vec<MemoryRecord>> {
    if let Some(memory_type) = req.memory_type {
        return store.fetch_memories(&req.lead_id, Some(memory_type), Some(req.limit));
    }

    if let Some(query) = req.query.as_deref() {
        if let Some(inferred) = relevance::infer_category(query, MemoryType::KEYWORD_HINTS) {
            let biased = store.fetch_memories(&req.lead_id, Some(inferred), Some(req.limit))?;
            if !biased.is_empty() {
                tracing::debug!(lead = %req.lead_id, memory_type = %inferred, "query biased retrieval");
                return Ok(biased);
            }
            tracing::debug!(
                lead = %req.lead_id,
                memory_type = %inferred,
                "no memories of biased type, degrading to unfiltered"
            );
        }
    }

    store.fetch_memories(&req.lead_id, None, Some(req.limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::store::{store_memory, StoreRequest};
    use crate::memory::types::ContentMap;
    use crate::store::fake::FakeStore;
    use serde_json::json;

    fn insert(store: &FakeStore, lead: &str, memory_type: MemoryType, value: serde_json::Value) {
        let content = match value {
            serde_json::Value::Object(map) => map,
            _ => ContentMap::new(),
        };
        store_memory(
            store,
            StoreRequest {
                lead_id: lead.into(),
                memory_type,
                content,
                confidence: None,
            },
        )
        .unwrap();
    }

    #[test]
    fn unknown_lead_returns_empty() {
        let store = FakeStore::new();
        let results = retrieve(&store, &RetrieveRequest::new("nobody")).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn explicit_type_filter_is_hard() {
        let store = FakeStore::new();
        insert(&store, "L1", MemoryType::Factual, json!({"budget": 400000}));
        insert(&store, "L1", MemoryType::Emotional, json!({"mood": "warm"}));

        let req = RetrieveRequest {
            memory_type: Some(MemoryType::Strategic),
            ..RetrieveRequest::new("L1")
        };
        // No strategic records — hard filter returns empty, no degradation.
        assert!(retrieve(&store, &req).unwrap().is_empty());
    }

    #[test]
    fn query_biases_toward_matching_type() {
        let store = FakeStore::new();
        insert(&store, "L1", MemoryType::Factual, json!({"budget": 400000}));
        insert(&store, "L1", MemoryType::Emotional, json!({"mood": "warm"}));

        let req = RetrieveRequest {
            query: Some("what is their budget".into()),
            ..RetrieveRequest::new("L1")
        };
        let results = retrieve(&store, &req).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].memory_type, MemoryType::Factual);
    }

    #[test]
    fn query_bias_degrades_when_biased_set_is_empty() {
        let store = FakeStore::new();
        insert(&store, "L1", MemoryType::Emotional, json!({"mood": "warm"}));

        // "budget" hints factual, but L1 has no factual records — the call
        // falls back to the unfiltered set instead of returning nothing.
        let req = RetrieveRequest {
            query: Some("budget".into()),
            ..RetrieveRequest::new("L1")
        };
        let results = retrieve(&store, &req).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].memory_type, MemoryType::Emotional);
    }

    #[test]
    fn unmatched_query_returns_unfiltered() {
        let store = FakeStore::new();
        insert(&store, "L1", MemoryType::Strategic, json!({"next_step": "call"}));

        let req = RetrieveRequest {
            query: Some("zzz qqq".into()),
            ..RetrieveRequest::new("L1")
        };
        assert_eq!(retrieve(&store, &req).unwrap().len(), 1);
    }

    #[test]
    fn limit_bounds_results() {
        let store = FakeStore::new();
        for i in 0..8 {
            insert(&store, "L1", MemoryType::Factual, json!({"v": i}));
        }
        let req = RetrieveRequest {
            limit: 3,
            ..RetrieveRequest::new("L1")
        };
        assert_eq!(retrieve(&store, &req).unwrap().len(), 3);
    }
}
