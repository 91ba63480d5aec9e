pub mod csv_export;
pub mod mat_export;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub use csv_export::export_to_csv;
pub use mat_export::export_to_mat;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
