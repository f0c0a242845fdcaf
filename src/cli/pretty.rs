use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use soxml::So;

use super::Config;

/// Rewrite `file` with indentation, into `output` when given
pub fn run(file: PathBuf, output: Option<PathBuf>, config: &Config) -> Result<()> {
    let so = So::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;

    let mut writer_config = config.writer_config();
    writer_config.pretty = true;

    let output = output.unwrap_or_else(|| file.clone());
    info!("Rewriting {} to {}", file.display(), output.display());
    so.write_with(&output, &writer_config)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Wrote {}", output.display());
    Ok(())
}
