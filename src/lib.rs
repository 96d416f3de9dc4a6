//! # ref-fetch
//!
//! Random access to subsequences of reference genomes stored as FASTA.
//!
//! Given a FASTA file and its `.fai` index (plus a `.gzi` block index when the
//! file is BGZF-compressed), `ref-fetch` returns the bases of any half-open,
//! 0-based range without scanning the file. Three readers share one contract:
//!
//! - **Indexed**: seeks directly to the bytes of a range, with an LRU cache of
//!   decoded blocks
//! - **Unindexed**: sequential iteration only
//! - **In-memory**: sequences held in memory, optionally as fragments that
//!   start part way into a contig
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_fetch::{IndexedReader, Range, ReaderOptions};
//!
//! let options = ReaderOptions::default().with_cache_size(32);
//! let mut reader = IndexedReader::open_with("GRCh38.fa.gz", &options).unwrap();
//!
//! // The second through sixth bases of chrM
//! let bases = reader.query(&Range::new("chrM", 1, 6)).unwrap();
//! println!("{bases}");
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contigs, headers and ranges
//! - [`parsing`]: `.fai`, `.gzi` and sequential FASTA parsing
//! - [`reader`]: The reader implementations and their block cache
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod error;
pub mod parsing;
pub mod reader;

// Re-export commonly used types for convenience
pub use core::contig::Contig;
pub use core::header::Header;
pub use core::range::Range;
pub use error::ReaderError;
pub use reader::{InMemoryReader, IndexedReader, ReaderOptions, SequenceReader, UnindexedReader};
