//! Knowledge base type definitions.
//!
//! Knowledge items are keyed by organization, not by lead: they ground agent
//! responses with org-wide material (disclosures, call scripts, FAQs).

use serde::{Deserialize, Serialize};

/// The three knowledge content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Long-form reference material: contracts, disclosures, guides.
    Document,
    /// Call scripts and talk tracks.
    Script,
    /// Short question-and-answer entries.
    Faq,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [Self::Document, Self::Script, Self::Faq];

    /// SQL-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Script => "script",
            Self::Faq => "faq",
        }
    }

    /// Query keyword hints for the shared relevance routine. Swappable
    /// placeholder, same caveats as the memory-type hints.
    pub const KEYWORD_HINTS: &'static [(ContentType, &'static [&'static str])] = &[
        (
            Self::Document,
            &["contract", "disclosure", "agreement", "checklist", "guide", "report"],
        ),
        (
            Self::Script,
            &["script", "call", "objection", "pitch", "voicemail", "opening", "rebuttal"],
        ),
        (
            Self::Faq,
            &["faq", "question", "how do", "what is", "why", "can i"],
        ),
    ];
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(Self::Document),
            "script" => Ok(Self::Script),
            "faq" => Ok(Self::Faq),
            _ => Err(crate::error::Error::Validation(format!(
                "unknown content type: {s}"
            ))),
        }
    }
}

/// A knowledge item, matching the `knowledge_items` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// UUID v7 primary key.
    pub id: String,
    /// Owning organization.
    pub org_id: String,
    pub title: String,
    /// Free text body.
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// ISO 8601 creation timestamp.
    pub created_at: String,
}
