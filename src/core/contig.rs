use serde::{Deserialize, Serialize};

/// A single contig/sequence in a reference genome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contig {
    /// Sequence name (first word of the FASTA definition line)
    pub name: String,

    /// Declared sequence length in bases
    pub n_bases: u64,

    /// Position of this contig among all contigs, in declaration order
    pub pos_in_fasta: usize,

    /// Numeric identifier, stable for the lifetime of the reader
    pub id: usize,
}

impl Contig {
    pub fn new(name: impl Into<String>, n_bases: u64, pos_in_fasta: usize) -> Self {
        Self {
            name: name.into(),
            n_bases,
            pos_in_fasta,
            id: pos_in_fasta,
        }
    }

    /// Check whether `[start, end)` lies within this contig
    #[must_use]
    pub fn contains(&self, start: i64, end: i64) -> bool {
        match (u64::try_from(start), u64::try_from(end)) {
            (Ok(start), Ok(end)) => start <= end && end <= self.n_bases,
            _ => false,
        }
    }
}

impl std::fmt::Display for Contig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} bp)", self.name, self.n_bases)
    }
}
