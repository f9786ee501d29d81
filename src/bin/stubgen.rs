//! stubgen: typed stubs for two variants of one reflected engine
//!
//! ## Features
//!
//! - **extract**: Convert a raw reflection dump into a variant snapshot
//! - **reconcile**: Compute the common collection and stamp both variants
//! - **render**: Write the stub tree from reconciled snapshots
//! - **generate**: All of the above in one pass
//!
//! ## Example Usage
//!
//! ```bash
//! # Stage by stage
//! stubgen extract --dump bl2.json --variant a --out snapshots/
//! stubgen extract --dump tps.json --variant b --out snapshots/
//! stubgen reconcile --snapshots snapshots/
//! stubgen render --snapshots snapshots/ --out stubs/ --clean
//!
//! # Single pass, machine-readable summary
//! stubgen generate --dump-a bl2.json --dump-b tps.json --out stubs/ --json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use variant_stubgen::{ConfigArgs, StubgenConfig};

mod stubgen_cli;

use stubgen_cli::{
    extract::ExtractCmd, generate::GenerateCmd, reconcile::ReconcileCmd, render::RenderCmd,
};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "STUBGEN_LOG";

#[derive(Parser)]
#[command(
    name = "stubgen",
    author,
    version,
    about = "Reconciled type stubs for two engine variants",
    long_about = "Converts reflection dumps of two variants of one engine into .pyi stubs.\n\n\
                  Declarations both variants agree on go to a shared namespace; the rest \
                  stays in per-variant namespaces."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    config: ConfigArgs,

    /// Output the summary as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw reflection dump into a variant snapshot
    Extract(ExtractCmd),

    /// Reconcile both variant snapshots into common and stamped variants
    Reconcile(ReconcileCmd),

    /// Render reconciled snapshots into a stub tree
    Render(RenderCmd),

    /// Extract, reconcile and render in one pass
    Generate(GenerateCmd),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Extract(_) => "extract",
            Commands::Reconcile(_) => "reconcile",
            Commands::Render(_) => "render",
            Commands::Generate(_) => "generate",
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let Cli {
        command,
        config,
        json,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let config = StubgenConfig::resolve(&config);
    let command_name = command.name();
    tracing::debug!(command = command_name, ?config, "resolved configuration");

    let result = match command {
        Commands::Extract(cmd) => cmd.execute(),
        Commands::Reconcile(cmd) => cmd.execute(&config),
        Commands::Render(cmd) => cmd.execute(&config),
        Commands::Generate(cmd) => cmd.execute(&config),
    };

    match result {
        Ok(summary) => stubgen_cli::output::print_summary(command_name, &summary, json),
        Err(err) => {
            if json {
                stubgen_cli::output::print_error(command_name, &err)?;
            }
            Err(err)
        }
    }
}
