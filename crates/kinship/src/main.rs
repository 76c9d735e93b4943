use anyhow::Result;
use clap::Parser;

use kinship::cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Parse {
            input,
            output,
            lineage,
            pretty,
            no_spouse_pairing,
        } => kinship::cli::parse::run(
            &input,
            output.as_deref(),
            lineage.as_deref(),
            pretty,
            no_spouse_pairing,
        ),
        Commands::Stats { input } => kinship::cli::stats::run(&input),
        Commands::Geocode { input, cache } => kinship::cli::geocode::run(&input, cache.as_deref()),
    }
}
