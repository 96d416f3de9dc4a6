//! Core value types shared by every reader.
//!
//! - [`Contig`](contig::Contig): a single named sequence with its declared length and position
//! - [`Header`](header::Header): the ordered set of contigs a reader exposes
//! - [`Range`](range::Range): a half-open, 0-based interval on a contig
//!
//! ## Coordinates
//!
//! All library coordinates are 0-based and half-open, so `[0, 1)` is the first
//! base of a contig and `[n - 1, n)` the last. Only [`Range::parse_region`](range::Range::parse_region)
//! accepts the 1-based, inclusive samtools notation used on the command line.

pub mod contig;
pub mod header;
pub mod range;
