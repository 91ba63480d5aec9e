use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;

use super::ensure_parent_dir;

/// Writes the log names joined by `\n` as UTF-8. Names are not quoted and
/// no terminator follows the last one.
pub fn export_to_csv(names: &[String], path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, names.join("\n")).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("[Export] {} name(s) written to {}", names.len(), path.display());
    Ok(())
}
