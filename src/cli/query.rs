use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::cli::{print_wrapped, IndexArgs, OutputFormat};
use crate::core::range::Range;
use crate::reader::IndexedReader;

#[derive(Args)]
pub struct QueryArgs {
    /// Indexed FASTA file, plain or BGZF-compressed
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Regions as `name`, `name:beg` or `name:beg-end` (1-based, inclusive)
    #[arg(required = true)]
    pub regions: Vec<String>,

    #[command(flatten)]
    pub index: IndexArgs,

    /// Wrap sequence lines in text output at this width (0 for no wrapping)
    #[arg(long, default_value = "60")]
    pub line_width: usize,
}

#[derive(Serialize)]
struct QueryResult {
    region: String,
    contig: String,
    start: i64,
    end: i64,
    bases: String,
}

pub fn run(args: QueryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut reader = IndexedReader::open_with(&args.fasta, &args.index.to_options())?;

    if verbose {
        eprintln!("Opened {reader}");
    }

    let mut results = Vec::with_capacity(args.regions.len());
    for region in &args.regions {
        let range = Range::parse_region(region, reader.header())?;
        let bases = reader.query(&range)?;
        results.push(QueryResult {
            region: region.clone(),
            contig: range.contig,
            start: range.start,
            end: range.end,
            bases,
        });
    }

    if verbose {
        let stats = reader.cache_stats();
        eprintln!(
            "Cache: {} hits, {} misses, {} evictions",
            stats.hits, stats.misses, stats.evictions
        );
    }

    match format {
        OutputFormat::Text => {
            for result in &results {
                println!(">{}", result.region);
                print_wrapped(&result.bases, args.line_width);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        OutputFormat::Tsv => {
            println!("region\tcontig\tstart\tend\tbases");
            for r in &results {
                println!("{}\t{}\t{}\t{}\t{}", r.region, r.contig, r.start, r.end, r.bases);
            }
        }
    }

    Ok(())
}
