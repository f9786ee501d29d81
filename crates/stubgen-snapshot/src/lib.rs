//! Filesystem snapshots of schema collections.
//!
//! Extraction, reconciliation and rendering can run as separate invocations. Each
//! collection is persisted as one JSON file in a snapshot directory:
//!
//! - `variant_a.json` / `variant_b.json`: extracted, later overwritten with stamped
//!   affinity by `reconcile`
//! - `common.json`: the reconciled common collection
//!
//! Every file carries a format version and the pipeline stage that wrote it, so
//! stamped collections are never fed back into reconciliation. Snapshots round-trip
//! exactly, including member order and stamped affinity.

pub mod paths;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use stubgen_types::{Affinity, ClassDef, Schema};

pub use paths::{snapshot_file_name, snapshot_path};

/// Bumped whenever the descriptor JSON shape changes.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Pipeline stage that produced a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extracted,
    Reconciled,
}

#[derive(Serialize)]
struct SnapshotOut<'a> {
    schema_version: u32,
    affinity: Affinity,
    stage: Stage,
    classes: &'a [ClassDef],
}

#[derive(Deserialize)]
struct SnapshotIn {
    schema_version: u32,
    affinity: Affinity,
    stage: Stage,
    #[serde(default)]
    classes: Vec<ClassDef>,
}

/// Snapshot directory holding up to one file per collection.
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Open (creating if needed) a snapshot directory.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)
            .map_err(|e| anyhow!("Failed to create snapshot dir {}: {}", root.display(), e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn has(&self, affinity: Affinity) -> bool {
        snapshot_path(&self.root, affinity).exists()
    }

    /// Persist `schema` under its own affinity, replacing any previous snapshot.
    pub fn save(&self, schema: &Schema, stage: Stage) -> Result<PathBuf> {
        let path = snapshot_path(&self.root, schema.affinity());
        let envelope = SnapshotOut {
            schema_version: SNAPSHOT_VERSION,
            affinity: schema.affinity(),
            stage,
            classes: schema.classes(),
        };
        paths::atomic_write_json(&path, &envelope)
            .with_context(|| format!("failed to save {} snapshot", schema.affinity()))?;
        Ok(path)
    }

    /// Remove a collection's snapshot if present.
    pub fn remove(&self, affinity: Affinity) -> Result<bool> {
        let path = snapshot_path(&self.root, affinity);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .map_err(|e| anyhow!("Failed to remove snapshot {}: {}", path.display(), e))?;
        Ok(true)
    }

    pub fn load(&self, affinity: Affinity) -> Result<Schema> {
        self.load_with_stage(affinity).map(|(schema, _)| schema)
    }

    pub fn load_with_stage(&self, affinity: Affinity) -> Result<(Schema, Stage)> {
        let path = snapshot_path(&self.root, affinity);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot: SnapshotIn = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse snapshot {}", path.display()))?;

        if snapshot.schema_version != SNAPSHOT_VERSION {
            return Err(anyhow!(
                "snapshot {} has format version {}, expected {}",
                path.display(),
                snapshot.schema_version,
                SNAPSHOT_VERSION
            ));
        }
        if snapshot.affinity != affinity {
            return Err(anyhow!(
                "snapshot {} holds the {} collection, expected {}",
                path.display(),
                snapshot.affinity,
                affinity
            ));
        }
        Ok((
            Schema::with_classes(affinity, snapshot.classes),
            snapshot.stage,
        ))
    }
}
