//! `stubgen reconcile`

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use variant_stubgen::pipeline::reconcile_snapshots;
use variant_stubgen::{PassSummary, StubgenConfig};

#[derive(Parser, Debug)]
pub struct ReconcileCmd {
    /// Snapshot directory holding both extracted variants
    #[arg(long, value_name = "DIR")]
    pub snapshots: PathBuf,
}

impl ReconcileCmd {
    pub fn execute(&self, config: &StubgenConfig) -> Result<PassSummary> {
        reconcile_snapshots(&self.snapshots, config)
    }
}
