//! `stubgen generate`

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use variant_stubgen::{generate, GenerateRequest, PassSummary, StubgenConfig};

#[derive(Parser, Debug)]
pub struct GenerateCmd {
    /// Raw reflection dump of variant A
    #[arg(long, value_name = "PATH")]
    pub dump_a: PathBuf,

    /// Raw reflection dump of variant B
    #[arg(long, value_name = "PATH")]
    pub dump_b: PathBuf,

    /// Root of the stub tree
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Also keep the reconciled snapshots in this directory
    #[arg(long, value_name = "DIR")]
    pub snapshots: Option<PathBuf>,

    /// Remove previously written namespaces before writing
    #[arg(long, default_value_t = false)]
    pub clean: bool,
}

impl GenerateCmd {
    pub fn execute(&self, config: &StubgenConfig) -> Result<PassSummary> {
        let request = GenerateRequest {
            dump_a: &self.dump_a,
            dump_b: &self.dump_b,
            out: &self.out,
            clean: self.clean,
            snapshots: self.snapshots.as_deref(),
        };
        generate(&request, config)
    }
}
