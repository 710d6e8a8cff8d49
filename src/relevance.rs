//! Best-effort lexical relevance, shared by memory retrieval and knowledge
//! search.
//!
//! Two primitives: [`infer_category`] maps a free-text query onto a category
//! via keyword-hint tables, and [`lexical_score`] ranks a text against a
//! query by token overlap. Both are deliberately naive placeholders for real
//! semantic search — a relevance miss never fails a request, it only removes
//! the bias.

/// Pick the category whose keyword hints best match `query`.
///
/// Scores each category by the number of hint phrases appearing in the
/// lowercased query. Returns `None` when nothing matches at all. Ties break
/// toward the earlier table entry, so the outcome is deterministic.
pub fn infer_category<C: Copy>(query: &str, hints: &[(C, &[&str])]) -> Option<C> {
    let query = query.to_lowercase();

    let mut best: Option<(C, usize)> = None;
    for (category, keywords) in hints {
        let score = keywords.iter().filter(|kw| query.contains(*kw)).count();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((*category, score));
        }
    }
    best.map(|(c, _)| c)
}

/// Count how many query tokens appear in `text`. Tokens shorter than three
/// characters are skipped so articles and prepositions don't dominate.
pub fn lexical_score(query: &str, text: &str) -> usize {
    let text = text.to_lowercase();
    tokenize(query).filter(|token| text.contains(token)).count()
}

fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(|t| t.to_lowercase())
}
