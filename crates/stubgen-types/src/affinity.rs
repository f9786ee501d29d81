//! Variant affinity and namespace tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which collection a declaration belongs to, or a reference resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affinity {
    VariantA,
    VariantB,
    Common,
}

impl Affinity {
    /// The two source variants, in reconciliation order.
    pub const VARIANTS: [Affinity; 2] = [Affinity::VariantA, Affinity::VariantB];

    pub fn is_common(self) -> bool {
        self == Affinity::Common
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Affinity::VariantA => "variant_a",
            Affinity::VariantB => "variant_b",
            Affinity::Common => "common",
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Affinity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "variant_a" | "variant-a" => Ok(Affinity::VariantA),
            "b" | "variant_b" | "variant-b" => Ok(Affinity::VariantB),
            "common" => Ok(Affinity::Common),
            other => Err(format!(
                "unknown affinity '{}' (expected a, b or common)",
                other
            )),
        }
    }
}

/// Namespace tokens prefixed onto rendered references, one per affinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    pub common: String,
    pub variant_a: String,
    pub variant_b: String,
}

impl Namespaces {
    pub fn new(
        common: impl Into<String>,
        variant_a: impl Into<String>,
        variant_b: impl Into<String>,
    ) -> Self {
        Self {
            common: common.into(),
            variant_a: variant_a.into(),
            variant_b: variant_b.into(),
        }
    }

    pub fn token(&self, affinity: Affinity) -> &str {
        match affinity {
            Affinity::VariantA => &self.variant_a,
            Affinity::VariantB => &self.variant_b,
            Affinity::Common => &self.common,
        }
    }
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new("common", "game_a", "game_b")
    }
}
