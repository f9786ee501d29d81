//! `stubgen extract`

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use variant_stubgen::pipeline::extract_to_snapshots;
use variant_stubgen::types::Affinity;
use variant_stubgen::PassSummary;

#[derive(Parser, Debug)]
pub struct ExtractCmd {
    /// Raw reflection dump (JSON) walked from one variant
    #[arg(long, value_name = "PATH")]
    pub dump: PathBuf,

    /// Variant the dump belongs to: a | b
    #[arg(long, value_name = "VARIANT")]
    pub variant: Affinity,

    /// Snapshot directory to write the variant collection into
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,
}

impl ExtractCmd {
    pub fn execute(&self) -> Result<PassSummary> {
        extract_to_snapshots(&self.dump, self.variant, &self.out)
    }
}
