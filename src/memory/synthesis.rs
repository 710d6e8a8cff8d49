//! Context synthesis — reduce each memory type's history to one current
//! belief.
//!
//! [`synthesize`] recomputes from store state on every call; nothing is
//! cached, so there is no invalidation problem. The reduction is a deliberate
//! most-recent-wins policy: it selects, it does not merge. A richer
//! confidence-weighted merge can replace [`reduce`] as long as it keeps the
//! contract — empty in, empty out; one record in, its content verbatim;
//! deterministic tie-breaks.

use chrono::Utc;

use crate::error::Result;
use crate::memory::types::{ContentMap, LeadContext, MemoryRecord, MemoryType};
use crate::store::Store;

/// Build the current [`LeadContext`] for a lead.
///
/// Retrieves each of the four types independently (unbounded — the reduction
/// must see the full history) and reduces per type. Synthesis goes through
/// the normal retrieval path, so it bumps retrieval stats like any other
/// read. A lead with no records yields four empty objects, never an error.
pub fn synthesize(store: &dyn Store, lead_id: &str) -> Result<LeadContext> {
    let mut context = LeadContext::empty(lead_id, Utc::now().to_rfc3339());

    for memory_type in MemoryType::ALL {
        let records = store.fetch_memories(lead_id, Some(memory_type), None)?;
        if let Some(belief) = reduce(&records) {
            *context.slot_mut(memory_type) = belief;
        }
    }

    tracing::debug!(lead = %lead_id, "context synthesized");
    Ok(context)
}

/// Most-recent-wins reduction over one type's records.
///
/// Picks the record with the maximum `created_at`; identical timestamps fall
/// back to the maximum id, which is deterministic and — ids being UUID v7 —
/// still means "created last". Empty input reduces to `None`.
pub fn reduce(records: &[MemoryRecord]) -> Option<ContentMap> {
    records
        .iter()
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|record| record.content.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, created_at: &str, value: serde_json::Value) -> MemoryRecord {
        MemoryRecord {
            id: id.to_string(),
            lead_id: "L1".to_string(),
            memory_type: MemoryType::Factual,
            content: match value {
                serde_json::Value::Object(map) => map,
                _ => ContentMap::new(),
            },
            confidence: 0.9,
            retrieval_count: 0,
            created_at: created_at.to_string(),
            last_accessed: created_at.to_string(),
        }
    }

    #[test]
    fn reduce_of_empty_is_none() {
        assert!(reduce(&[]).is_none());
    }

    #[test]
    fn reduce_of_one_returns_content_verbatim() {
        let rec = record("a", "2026-01-01T00:00:00+00:00", json!({"budget": {"max": 450000}}));
        let reduced = reduce(std::slice::from_ref(&rec)).unwrap();
        assert_eq!(reduced, rec.content);
    }

    #[test]
    fn reduce_picks_latest_created_at() {
        let older = record("a", "2026-01-01T00:00:00+00:00", json!({"v": "old"}));
        let newer = record("b", "2026-02-01T00:00:00+00:00", json!({"v": "new"}));
        // Input order must not matter.
        let reduced = reduce(&[newer.clone(), older.clone()]).unwrap();
        assert_eq!(reduced["v"], json!("new"));
        let reduced = reduce(&[older, newer]).unwrap();
        assert_eq!(reduced["v"], json!("new"));
    }

    #[test]
    fn reduce_breaks_timestamp_ties_by_id() {
        let t = "2026-01-01T00:00:00+00:00";
        let low = record("aaa", t, json!({"v": "low"}));
        let high = record("zzz", t, json!({"v": "high"}));
        let reduced = reduce(&[low.clone(), high.clone()]).unwrap();
        assert_eq!(reduced["v"], json!("high"));
        // Deterministic regardless of order.
        let reduced = reduce(&[high, low]).unwrap();
        assert_eq!(reduced["v"], json!("high"));
    }
}
