//! Reference readers sharing one query contract.
//!
//! - [`IndexedReader`]: random access into a plain or BGZF FASTA via its `.fai`
//! - [`UnindexedReader`]: sequential iteration only; random access is refused
//! - [`InMemoryReader`]: fully materialized sequences, no backing file
//!
//! All three implement [`SequenceReader`], so callers can swap one for another
//! and cross-check their results.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ref_fetch::{IndexedReader, InMemoryReader, Range, SequenceReader};
//!
//! let mut reader = IndexedReader::open("reference.fa").unwrap();
//! let bases = reader.query(&Range::new("chrM", 1, 6)).unwrap();
//!
//! // Materialize the whole reference and query it without touching the file
//! let in_memory = InMemoryReader::load(&mut reader).unwrap();
//! assert_eq!(in_memory.query(&Range::new("chrM", 1, 6)).unwrap(), bases);
//! ```

use std::path::{Path, PathBuf};

use crate::core::contig::Contig;
use crate::core::header::Header;
use crate::core::range::Range;
use crate::error::ReaderError;

pub mod cache;
pub mod codec;
pub mod in_memory;
pub mod indexed;
pub mod unindexed;

pub use cache::{CacheStats, DEFAULT_CACHE_SIZE};
pub use in_memory::InMemoryReader;
pub use indexed::IndexedReader;
pub use unindexed::UnindexedReader;

/// A lazy sequence of `(contig name, bases)` pairs
pub type Records<'a> = Box<dyn Iterator<Item = Result<(String, String), ReaderError>> + 'a>;

/// The capability shared by every reader.
///
/// Readers that cannot support an operation return
/// `ReaderError::UnsupportedOperation` rather than omitting it.
pub trait SequenceReader {
    /// The contigs this reader exposes, in declaration order
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnsupportedOperation` for readers that only learn
    /// their contigs by scanning.
    fn header(&self) -> Result<&Header, ReaderError>;

    /// Look up a contig by name
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` if the name is not in the header.
    fn contig(&self, name: &str) -> Result<&Contig, ReaderError> {
        self.header()?.contig(name)
    }

    /// Whether `range` names a known contig and satisfies
    /// `0 <= start <= end <= n_bases`. Never fails.
    fn is_valid(&self, range: &Range) -> bool {
        self.header()
            .ok()
            .and_then(|h| h.get(&range.contig))
            .is_some_and(|c| c.contains(range.start, range.end))
    }

    /// The bases in `range`
    ///
    /// # Errors
    ///
    /// Returns `ReaderError::UnknownContig` or `ReaderError::InvalidRange` for
    /// bad requests, plus reader-specific I/O and data errors.
    fn query(&mut self, range: &Range) -> Result<String, ReaderError>;

    /// A fresh pass over every contig. Each call starts again from the first
    /// contig.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan cannot be started.
    fn iterate(&mut self) -> Result<Records<'_>, ReaderError>;
}

/// Options for file-backed readers
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Explicit `.fai` path; defaults to `<fasta>.fai`
    pub index_path: Option<PathBuf>,

    /// Explicit `.gzi` path; defaults to `<fasta>.gzi`
    pub gzi_path: Option<PathBuf>,

    /// Number of decoded blocks to cache; 0 disables caching
    pub cache_size: usize,

    /// Convert returned bases to upper case
    pub uppercase: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            index_path: None,
            gzi_path: None,
            cache_size: DEFAULT_CACHE_SIZE,
            uppercase: false,
        }
    }
}

impl ReaderOptions {
    #[must_use]
    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_gzi_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.gzi_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    #[must_use]
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// The `.fai` path to use for `fasta`
    #[must_use]
    pub fn index_path_for(&self, fasta: &Path) -> PathBuf {
        self.index_path
            .clone()
            .unwrap_or_else(|| with_appended_extension(fasta, "fai"))
    }

    /// The `.gzi` path to use for `fasta`
    #[must_use]
    pub fn gzi_path_for(&self, fasta: &Path) -> PathBuf {
        self.gzi_path
            .clone()
            .unwrap_or_else(|| with_appended_extension(fasta, "gzi"))
    }
}

/// `ref.fa` -> `ref.fa.fai`, `ref.fa.gz` -> `ref.fa.gz.gzi`
fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}
