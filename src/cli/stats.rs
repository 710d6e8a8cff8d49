use anyhow::Result;

use crate::config::DossierConfig;
use crate::knowledge::types::ContentType;
use crate::memory::types::MemoryType;

/// Display store statistics in the terminal.
pub fn stats(config: &DossierConfig) -> Result<()> {
    let store = crate::store::create_store(config)?;
    let response = store.stats()?;

    println!("Store Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total memories:      {}", response.total_memories);
    println!("  Distinct leads:      {}", response.distinct_leads);
    println!();

    println!("Memories by type:");
    for t in MemoryType::ALL {
        let count = response.by_type.get(t.as_str()).copied().unwrap_or(0);
        println!("  {:<12} {}", t.as_str(), count);
    }
    println!();

    println!("Knowledge items:       {}", response.knowledge_items);
    for t in ContentType::ALL {
        let count = response.items_by_type.get(t.as_str()).copied().unwrap_or(0);
        println!("  {:<12} {}", t.as_str(), count);
    }
    println!();

    println!("Database size:         {} bytes", response.db_size_bytes);
    if let Some(ref oldest) = response.oldest_memory {
        println!("Oldest memory:         {oldest}");
    }
    if let Some(ref newest) = response.newest_memory {
        println!("Newest memory:         {newest}");
    }

    Ok(())
}
