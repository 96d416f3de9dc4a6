use std::path::PathBuf;

use clap::Args;

use crate::cli::{print_wrapped, IndexArgs, OutputFormat};
use crate::reader::{IndexedReader, SequenceReader, UnindexedReader};

#[derive(Args)]
pub struct DumpArgs {
    /// FASTA file, optionally gzip or BGZF-compressed
    #[arg(required = true)]
    pub fasta: PathBuf,

    /// Scan the file sequentially instead of reading through its index
    #[arg(long)]
    pub unindexed: bool,

    #[command(flatten)]
    pub index: IndexArgs,

    /// Wrap sequence lines in text output at this width (0 for no wrapping)
    #[arg(long, default_value = "60")]
    pub line_width: usize,
}

pub fn run(args: DumpArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let options = args.index.to_options();
    let mut reader: Box<dyn SequenceReader> = if args.unindexed {
        Box::new(UnindexedReader::open_with(&args.fasta, &options)?)
    } else {
        Box::new(IndexedReader::open_with(&args.fasta, &options)?)
    };

    if verbose {
        eprintln!(
            "Reading {} {}",
            args.fasta.display(),
            if args.unindexed { "sequentially" } else { "through its index" }
        );
    }

    let mut json_records = Vec::new();
    if matches!(format, OutputFormat::Tsv) {
        println!("name\tlength\tbases");
    }

    let mut count = 0usize;
    for record in reader.iterate()? {
        let (name, bases) = record?;
        count += 1;
        match format {
            OutputFormat::Text => {
                println!(">{name}");
                print_wrapped(&bases, args.line_width);
            }
            OutputFormat::Tsv => println!("{name}\t{}\t{bases}", bases.len()),
            OutputFormat::Json => json_records.push(serde_json::json!({
                "name": name,
                "length": bases.len(),
                "bases": bases,
            })),
        }
    }

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&json_records)?);
    }
    if verbose {
        eprintln!("Wrote {count} records");
    }

    Ok(())
}
