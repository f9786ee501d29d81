//! Snapshot file layout and atomic writes.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use stubgen_types::Affinity;

/// File name of one collection's snapshot.
pub fn snapshot_file_name(affinity: Affinity) -> &'static str {
    match affinity {
        Affinity::Common => "common.json",
        Affinity::VariantA => "variant_a.json",
        Affinity::VariantB => "variant_b.json",
    }
}

pub fn snapshot_path(root: &Path, affinity: Affinity) -> PathBuf {
    root.join(snapshot_file_name(affinity))
}

/// Ensure all parent directories exist for a path.
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory {}: {}", parent.display(), e))?;
    }
    Ok(())
}

/// Write a file atomically (write to .tmp, then rename).
pub fn atomic_write(path: &Path, contents: &[u8]) -> Result<()> {
    ensure_parent_dirs(path)?;
    let tmp_path = path.with_extension(format!(
        "{}.tmp",
        path.extension().and_then(|s| s.to_str()).unwrap_or("tmp")
    ));
    std::fs::write(&tmp_path, contents)
        .map_err(|e| anyhow!("Failed to write temp file {}: {}", tmp_path.display(), e))?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        anyhow!(
            "Failed to rename {} to {}: {}",
            tmp_path.display(),
            path.display(),
            e
        )
    })?;
    Ok(())
}

/// Write pretty-printed JSON atomically so snapshots diff cleanly between runs.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut json =
        serde_json::to_vec_pretty(value).map_err(|e| anyhow!("Failed to serialize JSON: {}", e))?;
    json.push(b'\n');
    atomic_write(path, &json)
}
