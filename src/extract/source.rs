//! Sources of raw reflection records.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use stubgen_types::Affinity;

use super::raw::RawClass;

/// Anything that can hand over the raw classes of one variant.
pub trait ReflectionSource {
    /// The variant these records were walked from. Never [`Affinity::Common`].
    fn variant(&self) -> Affinity;

    fn classes(&self) -> &[RawClass];
}

/// On-disk dump written by the in-engine walker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpFile {
    /// Variant recorded by the walker, if it knew.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Affinity>,
    pub classes: Vec<RawClass>,
}

/// A JSON reflection dump loaded into memory.
#[derive(Debug, Clone)]
pub struct JsonDumpSource {
    variant: Affinity,
    classes: Vec<RawClass>,
    path: Option<PathBuf>,
}

impl JsonDumpSource {
    pub fn new(variant: Affinity, classes: Vec<RawClass>) -> Result<Self> {
        if variant.is_common() {
            return Err(anyhow!("a reflection dump must belong to variant a or b"));
        }
        Ok(Self {
            variant,
            classes,
            path: None,
        })
    }

    /// Parse a dump, checking it against the variant it is being loaded as.
    pub fn from_json(json: &str, variant: Affinity) -> Result<Self> {
        let dump: DumpFile =
            serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse reflection dump: {}", e))?;
        if let Some(recorded) = dump.variant {
            if recorded != variant {
                return Err(anyhow!(
                    "dump was recorded for {} but is being loaded as {}",
                    recorded,
                    variant
                ));
            }
        }
        Self::new(variant, dump.classes)
    }

    pub fn open<P: AsRef<Path>>(path: P, variant: Affinity) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read reflection dump {}", path.display()))?;
        let mut source = Self::from_json(&json, variant)
            .with_context(|| format!("invalid reflection dump {}", path.display()))?;
        source.path = Some(path.to_path_buf());
        Ok(source)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ReflectionSource for JsonDumpSource {
    fn variant(&self) -> Affinity {
        self.variant
    }

    fn classes(&self) -> &[RawClass] {
        &self.classes
    }
}
