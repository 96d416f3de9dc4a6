//! Command-line interface for ref-fetch.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **query**: Print the bases of one or more regions
//! - **contigs**: List the contigs declared by a FASTA index
//! - **dump**: Stream every record of a FASTA file
//!
//! ## Usage
//!
//! ```text
//! # Fetch a region (1-based, inclusive, samtools style)
//! ref-fetch query GRCh38.fa chrM:2-6
//!
//! # Several regions from a BGZF reference, as JSON
//! ref-fetch query GRCh38.fa.gz chr1:10,001-10,100 chrM --format json
//!
//! # List contigs
//! ref-fetch contigs GRCh38.fa --format tsv
//!
//! # Re-wrap a reference at 80 columns without an index
//! ref-fetch dump input.fa --unindexed --line-width 80
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::reader::{ReaderOptions, DEFAULT_CACHE_SIZE};

pub mod contigs;
pub mod dump;
pub mod query;

#[derive(Parser)]
#[command(name = "ref-fetch")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Random access to subsequences of indexed FASTA references")]
#[command(
    long_about = "ref-fetch extracts bases from reference genomes stored as FASTA.\n\nWith a .fai index (and a .gzi for BGZF-compressed files) any region is read directly without scanning the file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the bases of one or more regions
    Query(query::QueryArgs),

    /// List the contigs of an indexed FASTA
    Contigs(contigs::ContigsArgs),

    /// Print every record of a FASTA file
    Dump(dump::DumpArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Index and cache flags shared by commands that open an indexed reader
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Path to the .fai index [default: <FASTA>.fai]
    #[arg(long)]
    pub fai: Option<PathBuf>,

    /// Path to the .gzi block index [default: <FASTA>.gzi]
    #[arg(long)]
    pub gzi: Option<PathBuf>,

    /// Number of decoded blocks to cache (0 disables caching)
    #[arg(long, default_value_t = DEFAULT_CACHE_SIZE)]
    pub cache_size: usize,

    /// Convert bases to upper case
    #[arg(long)]
    pub uppercase: bool,
}

impl IndexArgs {
    #[must_use]
    pub fn to_options(&self) -> ReaderOptions {
        let mut options = ReaderOptions::default()
            .with_cache_size(self.cache_size)
            .with_uppercase(self.uppercase);
        if let Some(fai) = &self.fai {
            options = options.with_index_path(fai);
        }
        if let Some(gzi) = &self.gzi {
            options = options.with_gzi_path(gzi);
        }
        options
    }
}

/// Write `bases` as FASTA sequence lines of at most `line_width` characters;
/// 0 writes a single line
pub(crate) fn print_wrapped(bases: &str, line_width: usize) {
    if line_width == 0 || bases.len() <= line_width {
        println!("{bases}");
        return;
    }
    for line in bases.as_bytes().chunks(line_width) {
        println!("{}", String::from_utf8_lossy(line));
    }
}
