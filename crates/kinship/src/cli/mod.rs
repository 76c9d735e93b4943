pub mod geocode;
pub mod parse;
pub mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kin",
    version,
    about = "Turn a narrative genealogy document into cross-referenced person records"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a narrative document and emit the profile dataset as JSON
    Parse {
        /// Plain-text source document; each line is one paragraph
        input: PathBuf,
        /// Write the dataset here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Lineage label stamped onto every profile
        #[arg(long)]
        lineage: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Disable structural spouse inference for datasets whose
        /// numbering carries no pairing convention
        #[arg(long)]
        no_spouse_pairing: bool,
    },
    /// Run the pipeline and print the stage counters
    Stats {
        input: PathBuf,
    },
    /// Resolve every distinct vital-record location to coordinates
    Geocode {
        input: PathBuf,
        /// Geocode cache file (defaults to the user cache directory)
        #[arg(long)]
        cache: Option<PathBuf>,
    },
}
