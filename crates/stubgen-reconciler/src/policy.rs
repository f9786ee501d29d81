//! Reconciliation options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with a class present in both variants whose supertype lists differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommonizationPolicy {
    /// Keep the class variant-specific in both outputs; no member is shared.
    #[default]
    Veto,
    /// Share identical members anyway; the common class keeps only the supertypes
    /// both variants agree on.
    MemberLevel,
}

impl CommonizationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CommonizationPolicy::Veto => "veto",
            CommonizationPolicy::MemberLevel => "member-level",
        }
    }
}

impl fmt::Display for CommonizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommonizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "veto" => Ok(CommonizationPolicy::Veto),
            "member-level" | "member_level" | "members" => Ok(CommonizationPolicy::MemberLevel),
            other => Err(format!(
                "unknown commonization policy '{}' (expected veto or member-level)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub policy: CommonizationPolicy,
    /// Merge class pairs and stamp collections on the rayon pool. Ignored without the
    /// `parallel` feature.
    pub parallel: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            policy: CommonizationPolicy::Veto,
            parallel: true,
        }
    }
}

impl ReconcileOptions {
    pub fn with_policy(mut self, policy: CommonizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
