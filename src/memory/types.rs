//! Core memory type definitions.
//!
//! Defines [`MemoryType`] (the four lead-memory categories), [`MemoryRecord`]
//! (a full record), and [`LeadContext`] (the synthesized per-lead view
//! consumed by conversational agents).

use serde::{Deserialize, Serialize};

/// An open JSON object — memory payloads are free-form and schema
/// enforcement is the writer's responsibility.
pub type ContentMap = serde_json::Map<String, serde_json::Value>;

/// Confidence assigned to a record when the writer does not supply one.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// The four lead-memory types. A closed set — extending it changes the
/// shape of [`LeadContext`] and is a versioned change to synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Hard facts: budget, financing status, property requirements.
    Factual,
    /// Rapport and sentiment: how the lead feels, family situation, trust.
    Emotional,
    /// Sales strategy: next steps, objections raised, negotiation posture.
    Strategic,
    /// Surrounding circumstances: market conditions, timeline pressure.
    Contextual,
}

impl MemoryType {
    /// All four types, in the order they appear in a [`LeadContext`].
    pub const ALL: [MemoryType; 4] = [
        Self::Factual,
        Self::Emotional,
        Self::Strategic,
        Self::Contextual,
    ];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Factual => "factual",
            Self::Emotional => "emotional",
            Self::Strategic => "strategic",
            Self::Contextual => "contextual",
        }
    }

    /// The fixed key this type occupies in a [`LeadContext`]. Downstream
    /// agents index by these names; they must never vary.
    pub fn context_key(&self) -> &'static str {
        match self {
            Self::Factual => "factual_information",
            Self::Emotional => "relationship_insights",
            Self::Strategic => "strategic_recommendations",
            Self::Contextual => "situational_awareness",
        }
    }

    /// Query keyword hints used by the relevance routine to bias retrieval
    /// toward one type. A placeholder for real semantic search — swappable,
    /// and nothing outside this table encodes the word lists.
    pub const KEYWORD_HINTS: &'static [(MemoryType, &'static [&'static str])] = &[
        (
            Self::Factual,
            &[
                "budget", "price", "bedroom", "bathroom", "square foot", "financing",
                "preapproval", "pre-approval", "income", "down payment",
            ],
        ),
        (
            Self::Emotional,
            &[
                "rapport", "feel", "excited", "worried", "anxious", "family", "trust",
                "frustrated", "relationship", "kids",
            ],
        ),
        (
            Self::Strategic,
            &[
                "next step", "follow up", "follow-up", "negotiate", "offer", "objection",
                "counter", "close", "strategy",
            ],
        ),
        (
            Self::Contextual,
            &[
                "market", "neighborhood", "listing", "interest rate", "inventory",
                "school district", "commute", "timeline", "season",
            ],
        ),
    ];
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factual" => Ok(Self::Factual),
            "emotional" => Ok(Self::Emotional),
            "strategic" => Ok(Self::Strategic),
            "contextual" => Ok(Self::Contextual),
            _ => Err(crate::error::Error::Validation(format!(
                "unknown memory type: {s}"
            ))),
        }
    }
}

/// A memory record, matching the `memories` table schema.
///
/// Records are append-only: after creation only `retrieval_count` and
/// `last_accessed` ever change, and nothing deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// UUID v7 (time-sortable) primary key.
    pub id: String,
    /// Owning lead. A foreign reference — the lead itself lives in the CRM.
    pub lead_id: String,
    /// Category of this memory.
    #[serde(rename = "type")]
    pub memory_type: MemoryType,
    /// Free-form JSON payload; shape varies by type.
    pub content: ContentMap,
    /// Belief that this record is accurate, in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Times this record has been returned by a retrieval. Best-effort
    /// counter: concurrent bumps may lose updates.
    pub retrieval_count: u32,
    /// ISO 8601 creation timestamp. Immutable.
    pub created_at: String,
    /// ISO 8601 timestamp of the last retrieval. Equals `created_at` until
    /// the record is first returned.
    pub last_accessed: String,
}

/// The synthesized per-lead view: one reduced value per memory type plus the
/// synthesis time. Derived on every request, never persisted or cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadContext {
    pub lead_id: String,
    pub factual_information: ContentMap,
    pub relationship_insights: ContentMap,
    pub strategic_recommendations: ContentMap,
    pub situational_awareness: ContentMap,
    /// ISO 8601 timestamp of this synthesis call.
    pub synthesis_timestamp: String,
}

impl LeadContext {
    /// An all-empty context for a lead with no stored records. The four keys
    /// are always present regardless of input.
    pub fn empty(lead_id: &str, timestamp: String) -> Self {
        Self {
            lead_id: lead_id.to_string(),
            factual_information: ContentMap::new(),
            relationship_insights: ContentMap::new(),
            strategic_recommendations: ContentMap::new(),
            situational_awareness: ContentMap::new(),
            synthesis_timestamp: timestamp,
        }
    }

    /// Mutable access to the slot for one memory type.
    pub fn slot_mut(&mut self, memory_type: MemoryType) -> &mut ContentMap {
        match memory_type {
            MemoryType::Factual => &mut self.factual_information,
            MemoryType::Emotional => &mut self.relationship_insights,
            MemoryType::Strategic => &mut self.strategic_recommendations,
            MemoryType::Contextual => &mut self.situational_awareness,
        }
    }
}
