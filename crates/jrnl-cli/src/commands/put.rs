use std::io::{self, Read};
use std::path::Path;

use jrnl_core::open_journal;
use tracing::warn;

/// Append all of standard input as one entry.
pub fn run(db_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut raw = Vec::new();
    io::stdin().read_to_end(&mut raw)?;
    // Invalid UTF-8 sequences become U+FFFD.
    let contents = String::from_utf8_lossy(&raw);

    // Checked here as well so blank input never creates or locks the store.
    if contents.trim().is_empty() {
        warn!("empty journal input, nothing to store");
        return Ok(());
    }

    let mut journal = open_journal(db_path)?;
    journal.add_entry(&contents)?;
    journal.into_store().close()?;
    Ok(())
}
