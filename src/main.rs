use clap::Parser;
use tracing_subscriber::EnvFilter;

use ref_fetch::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("ref_fetch=debug,info")
    } else {
        EnvFilter::new("ref_fetch=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Query(args) => {
            cli::query::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Contigs(args) => {
            cli::contigs::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Dump(args) => {
            cli::dump::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
