use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::config::DossierConfig;
use crate::knowledge::search::{add_item, NewItem};
use crate::knowledge::types::ContentType;

/// Seed file entry. `org_id` falls back to the configured default org.
#[derive(Debug, Deserialize)]
struct SeedItem {
    org_id: Option<String>,
    title: String,
    content: String,
    content_type: String,
}

/// Bulk-load knowledge items from a JSON file.
///
/// Items whose (org, title) pair already exists are skipped, so re-running a
/// seed file is safe.
pub fn seed(config: &DossierConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read seed file: {}", file.display()))?;
    let entries: Vec<SeedItem> =
        serde_json::from_str(&json).context("failed to parse seed JSON")?;

    let store = crate::store::create_store(config)?;

    let mut imported = 0u64;
    let mut skipped = 0u64;

    println!("Seeding {} knowledge items...", entries.len());

    for entry in entries {
        let content_type: ContentType = entry.content_type.parse()?;
        let org_id = entry
            .org_id
            .unwrap_or_else(|| config.storage.default_org.clone());

        let existing = store.fetch_items(&org_id, None)?;
        if existing.iter().any(|item| item.title == entry.title) {
            skipped += 1;
            continue;
        }

        add_item(
            store.as_ref(),
            NewItem {
                org_id,
                title: entry.title,
                content: entry.content,
                content_type,
            },
        )?;
        imported += 1;
    }

    println!("Seed complete:");
    println!("  Items imported: {imported}");
    if skipped > 0 {
        println!("  Items skipped:  {skipped} (already exist)");
    }

    Ok(())
}
