//! `stubgen render`

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use variant_stubgen::pipeline::render_snapshots;
use variant_stubgen::{PassSummary, StubgenConfig};

#[derive(Parser, Debug)]
pub struct RenderCmd {
    /// Snapshot directory holding the three reconciled collections
    #[arg(long, value_name = "DIR")]
    pub snapshots: PathBuf,

    /// Root of the stub tree
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Remove previously written namespaces before writing
    #[arg(long, default_value_t = false)]
    pub clean: bool,
}

impl RenderCmd {
    pub fn execute(&self, config: &StubgenConfig) -> Result<PassSummary> {
        render_snapshots(&self.snapshots, &self.out, self.clean, config)
    }
}
