use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::fai::FaiIndex;
use crate::reader::ReaderOptions;

#[derive(Args)]
pub struct ContigsArgs {
    /// FASTA file whose index should be listed
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Path to the .fai index [default: <FASTA>.fai]
    #[arg(long)]
    pub fai: Option<PathBuf>,
}

pub fn run(args: ContigsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut options = ReaderOptions::default();
    if let Some(fai) = &args.fai {
        options = options.with_index_path(fai);
    }
    let index_path = options.index_path_for(&args.fasta);
    let header = FaiIndex::from_path(&index_path)?.to_header()?;

    if verbose {
        eprintln!(
            "Loaded {} contigs ({} bp) from {}",
            header.len(),
            header.total_bases(),
            index_path.display()
        );
    }

    match format {
        OutputFormat::Text => {
            println!("{:<25} {:>15} {:>8}", "Name", "Length", "Position");
            println!("{}", "-".repeat(50));
            for contig in &header.contigs {
                println!(
                    "{:<25} {:>15} {:>8}",
                    contig.name, contig.n_bases, contig.pos_in_fasta
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&header)?);
        }
        OutputFormat::Tsv => {
            println!("name\tlength\tposition");
            for contig in &header.contigs {
                println!("{}\t{}\t{}", contig.name, contig.n_bases, contig.pos_in_fasta);
            }
        }
    }

    Ok(())
}
