use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use soxml::So;

use super::Config;

/// Append the blocks of `sources` to `dest` and rewrite it
pub fn run(dest: PathBuf, sources: Vec<PathBuf>, config: &Config) -> Result<()> {
    let mut so = So::read(&dest).with_context(|| format!("Failed to read {}", dest.display()))?;

    for source in &sources {
        let other =
            So::read(source).with_context(|| format!("Failed to read {}", source.display()))?;
        for block in other.blocks() {
            if let Some(id) = block.blk_id() {
                if so.block(id).is_some() {
                    warn!("Block {} of {} is already present", id, source.display());
                }
            }
        }
        let added = so.merge(other);
        info!("Appended {} blocks from {}", added, source.display());
    }

    let stats = so
        .write_with(&dest, &config.writer_config())
        .with_context(|| format!("Failed to write {}", dest.display()))?;

    println!(
        "Merged {} documents into {} ({} blocks, {})",
        sources.len(),
        dest.display(),
        so.blocks().count(),
        stats
    );
    Ok(())
}
