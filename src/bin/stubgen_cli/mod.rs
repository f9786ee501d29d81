//! CLI subcommand implementations for stubgen

pub mod extract;
pub mod generate;
pub mod output;
pub mod reconcile;
pub mod render;
