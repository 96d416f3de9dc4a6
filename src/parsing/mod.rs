//! Parsers for the files that back a reference reader.
//!
//! This module provides parsers for:
//!
//! - **FASTA index (.fai) files**: per-contig length, offset and line geometry
//! - **BGZF block index (.gzi) files**: compressed/uncompressed block offsets
//! - **FASTA files**: sequential record parsing, plain or gzip/bgzip compressed
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_fetch::parsing::fai::FaiIndex;
//! use std::path::Path;
//!
//! let index = FaiIndex::from_path(Path::new("reference.fa.fai")).unwrap();
//! let chr1 = index.lookup("chr1").unwrap();
//! println!("chr1 has {} bases starting at byte {}", chr1.total_length, chr1.file_offset);
//! ```

pub mod fai;
pub mod fasta;
pub mod gzi;
