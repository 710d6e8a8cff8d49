//! Knowledge base write and search paths.
//!
//! Search shares the memory store's relevance semantics: an explicit
//! `content_type` is a hard filter, a free-text query only biases toward an
//! inferred category and degrades to the unfiltered set when the biased set
//! is empty. Ranking is a naive lexical overlap score — the same swappable
//! placeholder as the retrieval bias.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::knowledge::types::{ContentType, KnowledgeItem};
use crate::relevance;
use crate::store::Store;

/// Result-count bound applied when the caller does not specify one.
pub const DEFAULT_LIMIT: usize = 5;

/// Parameters for adding a knowledge item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub org_id: String,
    pub title: String,
    pub content: String,
    pub content_type: ContentType,
}

/// Validate and persist a new knowledge item.
pub fn add_item(store: &dyn Store, req: NewItem) -> Result<KnowledgeItem> {
    if req.org_id.trim().is_empty() {
        return Err(Error::Validation("org_id must not be empty".into()));
    }
    if req.title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".into()));
    }

    let item = KnowledgeItem {
        id: Uuid::now_v7().to_string(),
        org_id: req.org_id,
        title: req.title,
        content: req.content,
        content_type: req.content_type,
        created_at: Utc::now().to_rfc3339(),
    };
    store.insert_item(&item)?;

    tracing::info!(id = %item.id, org = %item.org_id, content_type = %item.content_type, "knowledge item added");
    Ok(item)
}

/// Parameters for a knowledge search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub org_id: String,
    pub query: String,
    /// Hard filter. Takes precedence over any query bias.
    pub content_type: Option<ContentType>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(org_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            query: query.into(),
            content_type: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Search an org's knowledge base.
///
/// An org with no items yields an empty vec, never an error.
pub fn search(store: &dyn Store, req: &SearchRequest) -> Result<Vec<KnowledgeItem>> {
    let candidates = if let Some(content_type) = req.content_type {
        store.fetch_items(&req.org_id, Some(content_type))?
    } else if let Some(inferred) =
        relevance::infer_category(&req.query, ContentType::KEYWORD_HINTS)
    {
        let biased = store.fetch_items(&req.org_id, Some(inferred))?;
        if biased.is_empty() {
            tracing::debug!(
                org = %req.org_id,
                content_type = %inferred,
                "no items of biased type, degrading to unfiltered"
            );
            store.fetch_items(&req.org_id, None)?
        } else {
            biased
        }
    } else {
        store.fetch_items(&req.org_id, None)?
    };

    // Lexical overlap first, then recency; id keeps full ties deterministic.
    let mut scored: Vec<(usize, KnowledgeItem)> = candidates
        .into_iter()
        .map(|item| {
            let text = format!("{} {}", item.title, item.content);
            (relevance::lexical_score(&req.query, &text), item)
        })
        .collect();
    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.created_at.cmp(&a.1.created_at))
            .then_with(|| b.1.id.cmp(&a.1.id))
    });

    Ok(scored
        .into_iter()
        .take(req.limit)
        .map(|(_, item)| item)
        .collect())
}
